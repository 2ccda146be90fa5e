//! Benchmarks for parsing and projecting ontologies.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use ontoscope::projection;
use ontoscope::rdf::{self, DEFAULT_BASE_IRI, Graph, Statement, Term, vocab};

/// A class hierarchy with one labelled individual per class.
fn synthetic_graph(classes: usize) -> Graph {
    let ex = |kind: &str, i: usize| Term::named(format!("http://example.org/#{kind}{i}"));
    let mut graph = Graph::new();
    for i in 0..classes {
        let class = ex("Class", i);
        let individual = ex("item", i);
        graph.push(Statement::new(class.clone(), Term::named(vocab::RDF_TYPE), Term::named(vocab::OWL_CLASS)));
        if i > 0 {
            graph.push(Statement::new(
                class.clone(),
                Term::named(format!("{}subClassOf", vocab::RDFS_NS)),
                ex("Class", i / 2),
            ));
        }
        graph.push(Statement::new(individual.clone(), Term::named(vocab::RDF_TYPE), class));
        graph.push(Statement::new(
            individual,
            Term::named(vocab::RDFS_LABEL),
            Term::literal(format!("item {i}")),
        ));
    }
    graph
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_build");
    for classes in [100, 1_000] {
        let graph = synthetic_graph(classes);
        group.bench_with_input(BenchmarkId::from_parameter(classes), &graph, |b, g| {
            b.iter(|| black_box(projection::build(g)))
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let text = rdf::serialize(&synthetic_graph(1_000), DEFAULT_BASE_IRI).unwrap();
    c.bench_function("parse_rdfxml_1k_classes", |b| {
        b.iter(|| black_box(rdf::parse(&text, DEFAULT_BASE_IRI).unwrap()))
    });
}

criterion_group!(benches, bench_build, bench_parse);
criterion_main!(benches);
