//! RDF data model: terms, statements, and the parsed graph.
//!
//! The graph holds plain [`Statement`]s with owned [`Term`]s. It is rebuilt from
//! the ontology text on every parse and never updated incrementally.
//!
//! - **Adapter** ([`adapter`]): RDF/XML parsing and serialization via `oxigraph::io`
//! - **Vocabulary** ([`vocab`]): the handful of RDF, RDFS and OWL IRIs the projection relies on

pub mod adapter;

pub use adapter::{DEFAULT_BASE_IRI, add_statements, check_iri, parse, serialize};

/// Well-known IRIs.
pub mod vocab {
    pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
    pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// A resource identified by an IRI.
    NamedNode(String),
    /// A document-scoped anonymous resource.
    BlankNode(String),
    /// A value. `datatype` is `None` for plain and language-tagged strings.
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    pub fn named(iri: impl Into<String>) -> Self {
        Term::NamedNode(iri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::BlankNode(id.into())
    }

    /// A plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// The lexical value: the IRI, the blank node id, or the literal text.
    pub fn value(&self) -> &str {
        match self {
            Term::NamedNode(iri) => iri,
            Term::BlankNode(id) => id,
            Term::Literal { value, .. } => value,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Whether the term can be a graph node (IRI or blank node).
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    /// Whether this is the named node `iri`.
    pub fn is_iri(&self, iri: &str) -> bool {
        matches!(self, Term::NamedNode(own) if own == iri)
    }

    /// Human-readable short name derived from the value.
    pub fn short_name(&self) -> &str {
        short_name(self.value())
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::NamedNode(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(id) => write!(f, "_:{id}"),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "{value:?}")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{dt}>")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Fragment after `#`, else the last non-empty path segment after `/`, else the input.
pub fn short_name(iri: &str) -> &str {
    if let Some((_, fragment)) = iri.split_once('#') {
        return fragment;
    }
    match iri.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => iri,
    }
}

/// A subject-predicate-object assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// An unordered collection of statements, in parser order.
///
/// No set semantics are enforced here: duplicates survive [`Graph::extend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    statements: Vec<Statement>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statements(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn extend(&mut self, statements: impl IntoIterator<Item = Statement>) {
        self.statements.extend(statements);
    }

    /// Objects of every statement `(subject, predicate, ?)`.
    pub fn objects_of<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.statements
            .iter()
            .filter(move |s| &s.subject == subject && s.predicate.is_iri(predicate))
            .map(|s| &s.object)
    }

    /// Whether `(subject, predicate, object_iri)` is asserted.
    pub fn holds(&self, subject: &Term, predicate: &str, object_iri: &str) -> bool {
        self.objects_of(subject, predicate)
            .any(|o| o.is_iri(object_iri))
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_prefers_fragment() {
        assert_eq!(short_name("http://example.org/zoo#Cat"), "Cat");
        assert_eq!(short_name("http://example.org/zoo/Dog"), "Dog");
        assert_eq!(short_name("http://example.org/zoo/"), "http://example.org/zoo/");
        assert_eq!(short_name("urn:x"), "urn:x");
    }

    #[test]
    fn objects_of_matches_subject_and_predicate() {
        let cat = Term::named("http://example.org/#Cat");
        let graph = Graph::from_statements(vec![
            Statement::new(
                cat.clone(),
                Term::named(vocab::RDF_TYPE),
                Term::named(vocab::OWL_CLASS),
            ),
            Statement::new(
                cat.clone(),
                Term::named(vocab::RDFS_LABEL),
                Term::literal("Кіт"),
            ),
        ]);

        let labels: Vec<_> = graph.objects_of(&cat, vocab::RDFS_LABEL).collect();
        assert_eq!(labels, vec![&Term::literal("Кіт")]);
        assert!(graph.holds(&cat, vocab::RDF_TYPE, vocab::OWL_CLASS));
        assert!(!graph.holds(&cat, vocab::RDF_TYPE, vocab::OWL_OBJECT_PROPERTY));
    }

    #[test]
    fn extend_keeps_duplicates() {
        let s = Statement::new(
            Term::named("http://example.org/a"),
            Term::named("http://example.org/p"),
            Term::named("http://example.org/b"),
        );
        let mut graph = Graph::from_statements(vec![s.clone()]);
        graph.extend(vec![s]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn display_renders_ntriples_like_terms() {
        let s = Statement::new(
            Term::blank("b0"),
            Term::named(vocab::RDFS_LABEL),
            Term::Literal {
                value: "cat".into(),
                datatype: None,
                language: Some("en".into()),
            },
        );
        assert_eq!(
            s.to_string(),
            "_:b0 <http://www.w3.org/2000/01/rdf-schema#label> \"cat\"@en ."
        );
    }
}
