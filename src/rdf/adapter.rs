//! RDF/XML boundary backed by oxigraph.
//!
//! Converts between RDF/XML text and the crate's own [`Graph`] model. Parsing
//! and serialization are delegated to `oxigraph::io`; this module only maps
//! terms across the boundary.

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{BlankNode, Literal, NamedNode, Term as OxTerm, Triple};

use crate::error::{RdfError, RdfResult};

use super::{Graph, Statement, Term, vocab};

/// Placeholder namespace used to resolve relative IRIs.
pub const DEFAULT_BASE_IRI: &str = "http://example.org/";

/// Prefixes declared on serialized documents.
const PREFIXES: &[(&str, &str)] = &[
    ("rdf", vocab::RDF_NS),
    ("rdfs", vocab::RDFS_NS),
    ("owl", vocab::OWL_NS),
    ("xsd", vocab::XSD_NS),
];

/// Parse RDF/XML text into a fresh graph.
pub fn parse(text: &str, base_iri: &str) -> RdfResult<Graph> {
    let parser = RdfParser::from_format(RdfFormat::RdfXml)
        .with_base_iri(base_iri)
        .map_err(|e| RdfError::InvalidBaseIri {
            iri: base_iri.to_string(),
            message: e.to_string(),
        })?;

    let mut statements = Vec::new();
    for quad in parser.for_reader(text.as_bytes()) {
        let quad = quad.map_err(|e| RdfError::Parse {
            message: e.to_string(),
        })?;
        statements.push(Statement::new(
            term_from_oxigraph(OxTerm::from(quad.subject)),
            Term::NamedNode(quad.predicate.into_string()),
            term_from_oxigraph(quad.object),
        ));
    }

    tracing::debug!(statements = statements.len(), "parsed RDF/XML");
    Ok(Graph::from_statements(statements))
}

/// Serialize a graph as RDF/XML.
///
/// Statement order follows the graph; nothing else about the output layout is stable.
/// IRIs are written absolute, so `base_iri` is only checked for validity.
pub fn serialize(graph: &Graph, base_iri: &str) -> RdfResult<String> {
    check_iri(base_iri).map_err(|_| RdfError::InvalidBaseIri {
        iri: base_iri.to_string(),
        message: "not an absolute IRI".into(),
    })?;

    let mut serializer = RdfSerializer::from_format(RdfFormat::RdfXml);
    for (prefix, iri) in PREFIXES {
        serializer = serializer
            .with_prefix(*prefix, *iri)
            .map_err(|e| RdfError::Serialize {
                message: format!("prefix {prefix}: {e}"),
            })?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for statement in graph {
        let triple = triple_to_oxigraph(statement)?;
        writer
            .serialize_triple(&triple)
            .map_err(|e| RdfError::Serialize {
                message: e.to_string(),
            })?;
    }
    let bytes = writer.finish().map_err(|e| RdfError::Serialize {
        message: e.to_string(),
    })?;

    String::from_utf8(bytes).map_err(|e| RdfError::Serialize {
        message: format!("serializer produced invalid UTF-8: {e}"),
    })
}

/// Append statements to a graph. Duplicates are kept.
pub fn add_statements(mut graph: Graph, statements: Vec<Statement>) -> Graph {
    graph.extend(statements);
    graph
}

/// Check that `iri` is an absolute IRI.
pub fn check_iri(iri: &str) -> RdfResult<()> {
    named_node(iri).map(|_| ())
}

fn term_from_oxigraph(term: OxTerm) -> Term {
    match term {
        OxTerm::NamedNode(node) => Term::NamedNode(node.into_string()),
        OxTerm::BlankNode(node) => Term::BlankNode(node.as_str().to_owned()),
        OxTerm::Literal(literal) => {
            let language = literal.language().map(str::to_owned);
            let datatype = literal.datatype().as_str();
            let datatype = if language.is_some()
                || datatype == vocab::XSD_STRING
                || datatype == vocab::RDF_LANG_STRING
            {
                None
            } else {
                Some(datatype.to_owned())
            };
            Term::Literal {
                value: literal.value().to_owned(),
                datatype,
                language,
            }
        }
        // Quoted triples only appear with RDF 1.2 enabled; keep their text form.
        #[allow(unreachable_patterns)]
        other => Term::literal(other.to_string()),
    }
}

fn named_node(iri: &str) -> RdfResult<NamedNode> {
    NamedNode::new(iri).map_err(|e| RdfError::InvalidTerm {
        term: iri.to_string(),
        message: e.to_string(),
    })
}

fn blank_node(id: &str) -> RdfResult<BlankNode> {
    BlankNode::new(id).map_err(|e| RdfError::InvalidTerm {
        term: format!("_:{id}"),
        message: e.to_string(),
    })
}

fn object_to_oxigraph(term: &Term) -> RdfResult<OxTerm> {
    Ok(match term {
        Term::NamedNode(iri) => named_node(iri)?.into(),
        Term::BlankNode(id) => blank_node(id)?.into(),
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let literal = match (language, datatype) {
                (Some(lang), _) => Literal::new_language_tagged_literal(value.as_str(), lang.as_str())
                    .map_err(|e| RdfError::InvalidTerm {
                        term: format!("\"{value}\"@{lang}"),
                        message: e.to_string(),
                    })?,
                (None, Some(dt)) => Literal::new_typed_literal(value.as_str(), named_node(dt)?),
                (None, None) => Literal::new_simple_literal(value.as_str()),
            };
            literal.into()
        }
    })
}

fn triple_to_oxigraph(statement: &Statement) -> RdfResult<Triple> {
    let predicate = match &statement.predicate {
        Term::NamedNode(iri) => named_node(iri)?,
        other => {
            return Err(RdfError::InvalidTerm {
                term: other.to_string(),
                message: "predicate must be an IRI".into(),
            });
        }
    };
    let object = object_to_oxigraph(&statement.object)?;

    match &statement.subject {
        Term::NamedNode(iri) => Ok(Triple::new(named_node(iri)?, predicate, object)),
        Term::BlankNode(id) => Ok(Triple::new(blank_node(id)?, predicate, object)),
        literal @ Term::Literal { .. } => Err(RdfError::InvalidTerm {
            term: literal.to_string(),
            message: "subject must be an IRI or a blank node".into(),
        }),
    }
}
