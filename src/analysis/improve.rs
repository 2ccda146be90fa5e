//! Applies model-proposed triples to an ontology document.
//!
//! The merge is all or nothing: the original text is re-parsed, every proposed
//! triple must convert cleanly, and only then is the extended graph serialized.

use crate::error::ImproveError;
use crate::llm::ModelClient;
use crate::prompt::{self, PromptKind};
use crate::rdf::{self, Statement, Term};

use super::orchestrator::Analyzer;
use super::schema;
use super::types::{AnalysisResult, ObjectType, UpdatedTriple, UpdatedTripleSet};

impl<M: ModelClient> Analyzer<M> {
    /// Ask the model for updated triples and merge them into `ontology_text`.
    ///
    /// Returns `None` on any failure; the log carries the cause.
    pub fn improve(&self, ontology_text: &str, analyses: &AnalysisResult) -> Option<String> {
        match self.try_improve(ontology_text, analyses) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "ontology improvement failed, keeping original");
                None
            }
        }
    }

    /// Like [`Analyzer::improve`], but reports why the improvement failed.
    pub fn try_improve(
        &self,
        ontology_text: &str,
        analyses: &AnalysisResult,
    ) -> Result<String, ImproveError> {
        tracing::info!(
            model = %self.model.describe(),
            sections = analyses.section_count(),
            "requesting ontology improvement"
        );

        let prompt = prompt::generate_prompt_with_base(
            ontology_text,
            &self.base_iri,
            PromptKind::Improvement,
            Some(analyses),
        )?;
        let update: UpdatedTripleSet =
            super::request(&self.model, &prompt, schema::UPDATED_ONTOLOGY)?;

        if update.updated_ontology.is_empty() {
            return Err(ImproveError::EmptyUpdate);
        }
        let additions = to_statements(&update.updated_ontology)?;
        let added = additions.len();

        let graph = rdf::parse(ontology_text, &self.base_iri)?;
        let merged = rdf::add_statements(graph, additions);
        let text = rdf::serialize(&merged, &self.base_iri)?;

        tracing::info!(added, total = merged.len(), "ontology improved");
        Ok(text)
    }
}

/// Convert proposed triples into statements.
///
/// Subjects and predicates must be absolute IRIs, as must `uri` objects.
/// `literal` objects become plain string literals.
pub fn to_statements(triples: &[UpdatedTriple]) -> Result<Vec<Statement>, ImproveError> {
    triples
        .iter()
        .enumerate()
        .map(|(index, t)| {
            let invalid = |e: crate::error::RdfError| ImproveError::InvalidTriple {
                index,
                message: e.to_string(),
            };
            rdf::check_iri(&t.subject).map_err(invalid)?;
            rdf::check_iri(&t.predicate).map_err(invalid)?;
            let object = match t.object_type {
                ObjectType::Uri => {
                    rdf::check_iri(&t.object).map_err(invalid)?;
                    Term::named(t.object.as_str())
                }
                ObjectType::Literal => Term::literal(t.object.as_str()),
            };
            Ok(Statement::new(
                Term::named(t.subject.as_str()),
                Term::named(t.predicate.as_str()),
                object,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::StructuralAnalysis;
    use crate::llm::CannedModel;
    use crate::rdf::vocab;
    use serde_json::json;

    const ZOO: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://example.org/#Animal"/>
</rdf:RDF>"#;

    fn structural_only() -> AnalysisResult {
        AnalysisResult {
            structural: Some(
                serde_json::from_value::<StructuralAnalysis>(schema::STRUCTURAL.example())
                    .unwrap(),
            ),
            ..Default::default()
        }
    }

    fn updating(entries: serde_json::Value) -> CannedModel {
        CannedModel::new().respond(schema::UPDATED_ONTOLOGY.name, json!({ "updatedOntology": entries }))
    }

    #[test]
    fn merges_proposed_triples_into_document() {
        let model = updating(json!([
            {
                "subject": "http://example.org/#Cat",
                "predicate": vocab::RDF_TYPE,
                "object": vocab::OWL_CLASS,
                "objectType": "uri"
            },
            {
                "subject": "http://example.org/#Cat",
                "predicate": vocab::RDFS_LABEL,
                "object": "Кіт",
                "objectType": "literal"
            }
        ]));
        let analyzer = Analyzer::new(model);
        let text = analyzer.improve(ZOO, &structural_only()).unwrap();

        let graph = rdf::parse(&text, rdf::DEFAULT_BASE_IRI).unwrap();
        assert_eq!(graph.len(), 3);
        let cat = Term::named("http://example.org/#Cat");
        assert!(graph.holds(&cat, vocab::RDF_TYPE, vocab::OWL_CLASS));
        assert!(graph.holds(
            &Term::named("http://example.org/#Animal"),
            vocab::RDF_TYPE,
            vocab::OWL_CLASS
        ));
        let labels: Vec<_> = graph.objects_of(&cat, vocab::RDFS_LABEL).collect();
        assert_eq!(labels, [&Term::literal("Кіт")]);
    }

    #[test]
    fn partial_analysis_is_embedded_in_prompt() {
        let analyzer = Analyzer::new(updating(json!([])));
        let _ = analyzer.improve(ZOO, &structural_only());

        let calls = analyzer.model().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].schema, "updated_ontology");
        assert!(calls[0].prompt.contains("\"classHierarchyAnalysis\""));
    }

    #[test]
    fn empty_update_is_failure() {
        let analyzer = Analyzer::new(updating(json!([])));
        assert!(matches!(
            analyzer.try_improve(ZOO, &structural_only()),
            Err(ImproveError::EmptyUpdate)
        ));
        assert!(analyzer.improve(ZOO, &structural_only()).is_none());
    }

    #[test]
    fn one_bad_iri_discards_the_whole_update() {
        let analyzer = Analyzer::new(updating(json!([
            {
                "subject": "http://example.org/#Cat",
                "predicate": vocab::RDFS_LABEL,
                "object": "Кіт",
                "objectType": "literal"
            },
            {
                "subject": "Cat",
                "predicate": vocab::RDF_TYPE,
                "object": vocab::OWL_CLASS,
                "objectType": "uri"
            }
        ])));
        let err = analyzer.try_improve(ZOO, &structural_only()).unwrap_err();
        assert!(matches!(err, ImproveError::InvalidTriple { index: 1, .. }));
    }

    #[test]
    fn model_failure_yields_none() {
        let analyzer = Analyzer::new(
            CannedModel::new().fail(schema::UPDATED_ONTOLOGY.name, "timeout"),
        );
        assert!(analyzer.improve(ZOO, &structural_only()).is_none());
    }

    #[test]
    fn unparsable_original_yields_none() {
        let analyzer = Analyzer::new(CannedModel::with_examples());
        assert!(matches!(
            analyzer.try_improve("<broken", &structural_only()),
            Err(ImproveError::Prompt(_))
        ));
    }

    #[test]
    fn literal_objects_stay_literals() {
        let statements = to_statements(&[UpdatedTriple {
            subject: "http://example.org/#Cat".into(),
            predicate: vocab::RDFS_LABEL.into(),
            object: "http://not-a-link.example".into(),
            object_type: ObjectType::Literal,
        }])
        .unwrap();
        assert!(statements[0].object.is_literal());
    }
}
