use std::collections::{BTreeSet, HashSet};

use ontoscope::projection::{self, NodeGroup};
use ontoscope::rdf::{self, DEFAULT_BASE_IRI, Graph, Statement, Term, vocab};
use proptest::prelude::*;

const MAX_STATEMENTS: usize = 40;
const MAX_RESOURCE_ID: u32 = 12;
const MAX_PREDICATE_ID: u32 = 5;

const TYPES: [&str; 4] = [
    vocab::OWL_CLASS,
    vocab::OWL_OBJECT_PROPERTY,
    vocab::OWL_DATATYPE_PROPERTY,
    "http://example.org/#Thing",
];

fn resource(blank_nodes: bool) -> impl Strategy<Value = Term> {
    let named = (0u32..=MAX_RESOURCE_ID).prop_map(|n| Term::named(format!("http://example.org/#n{n}")));
    if blank_nodes {
        prop_oneof![
            4 => named,
            1 => (0u32..=3).prop_map(|n| Term::blank(format!("b{n}"))),
        ]
        .boxed()
    } else {
        named.boxed()
    }
}

fn statement(blank_nodes: bool) -> impl Strategy<Value = Statement> {
    let predicate = (0u32..=MAX_PREDICATE_ID).prop_map(|n| format!("http://example.org/#p{n}"));
    let typed = (resource(blank_nodes), prop::sample::select(TYPES.to_vec()))
        .prop_map(|(s, ty)| Statement::new(s, Term::named(vocab::RDF_TYPE), Term::named(ty)));
    let linked = (resource(blank_nodes), predicate.clone(), resource(blank_nodes))
        .prop_map(|(s, p, o)| Statement::new(s, Term::named(p), o));
    let valued = (resource(blank_nodes), predicate, "[a-zA-Z0-9]{1,10}")
        .prop_map(|(s, p, v)| Statement::new(s, Term::named(p), Term::literal(v)));

    prop_oneof![2 => typed, 3 => linked, 2 => valued]
}

fn graph_strategy(blank_nodes: bool) -> impl Strategy<Value = Graph> {
    prop::collection::vec(statement(blank_nodes), 0..=MAX_STATEMENTS).prop_map(Graph::from_statements)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn every_edge_endpoint_is_a_node(graph in graph_strategy(true)) {
        let view = projection::build(&graph);
        let ids: HashSet<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &view.edges {
            prop_assert!(ids.contains(edge.from.as_str()), "dangling from {}", edge.from);
            prop_assert!(ids.contains(edge.to.as_str()), "dangling to {}", edge.to);
        }
    }

    #[test]
    fn node_ids_are_unique(graph in graph_strategy(true)) {
        let view = projection::build(&graph);
        let ids: HashSet<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(ids.len(), view.nodes.len());
    }

    #[test]
    fn literals_never_become_nodes(graph in graph_strategy(true)) {
        let view = projection::build(&graph);
        let resources: HashSet<&str> = graph
            .iter()
            .flat_map(|s| [&s.subject, &s.object])
            .filter(|t| t.is_resource())
            .map(Term::value)
            .collect();
        for node in &view.nodes {
            prop_assert!(node.group != NodeGroup::Literal);
            prop_assert!(resources.contains(node.id.as_str()));
        }
    }

    #[test]
    fn type_statements_are_never_edges(graph in graph_strategy(true)) {
        let view = projection::build(&graph);
        let non_type_links = graph
            .iter()
            .filter(|s| !s.predicate.is_iri(vocab::RDF_TYPE) && s.object.is_resource())
            .count();
        prop_assert!(view.edges.iter().all(|e| e.label != "type"));
        prop_assert_eq!(view.edges.len(), non_type_links);
    }

    #[test]
    fn class_type_wins_over_other_types(graph in graph_strategy(true)) {
        let view = projection::build(&graph);
        for node in &view.nodes {
            let term = graph
                .iter()
                .flat_map(|s| [&s.subject, &s.object])
                .find(|t| t.is_resource() && t.value() == node.id)
                .cloned()
                .unwrap();
            let expected = if graph.holds(&term, vocab::RDF_TYPE, vocab::OWL_CLASS) {
                NodeGroup::Class
            } else if graph.holds(&term, vocab::RDF_TYPE, vocab::OWL_OBJECT_PROPERTY)
                || graph.holds(&term, vocab::RDF_TYPE, vocab::OWL_DATATYPE_PROPERTY)
            {
                NodeGroup::Property
            } else if term.is_blank() {
                NodeGroup::BlankNode
            } else {
                NodeGroup::Individual
            };
            prop_assert_eq!(node.group, expected, "node {}", node.id);
        }
    }

    #[test]
    fn serialize_then_parse_keeps_statement_set(graph in graph_strategy(false)) {
        let text = rdf::serialize(&graph, DEFAULT_BASE_IRI).unwrap();
        let reparsed = rdf::parse(&text, DEFAULT_BASE_IRI).unwrap();

        let before: BTreeSet<Statement> = graph.into_statements().into_iter().collect();
        let after: BTreeSet<Statement> = reparsed.into_statements().into_iter().collect();
        prop_assert_eq!(before, after);
    }
}
