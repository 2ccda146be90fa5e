//! Runs the four analysis requests and collects whatever succeeds.

use serde::de::DeserializeOwned;

use crate::error::OntoResult;
use crate::llm::ModelClient;
use crate::prompt::{self, PromptKind};
use crate::rdf::DEFAULT_BASE_IRI;

use super::types::AnalysisResult;

/// Analysis and improvement front-end over a model client.
#[derive(Debug)]
pub struct Analyzer<M> {
    pub(super) model: M,
    pub(super) base_iri: String,
}

impl<M: ModelClient> Analyzer<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            base_iri: DEFAULT_BASE_IRI.to_string(),
        }
    }

    /// Resolve relative IRIs against `base_iri` instead of the default.
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = base_iri.into();
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn base_iri(&self) -> &str {
        &self.base_iri
    }

    /// Run the structural, semantic, logical and recommendations analyses.
    ///
    /// Sections whose request fails are left `None`; this never fails as a whole.
    pub fn analyze(&self, ontology_text: &str) -> AnalysisResult {
        tracing::info!(model = %self.model.describe(), "starting ontology analysis");

        let mut result = AnalysisResult::default();
        self.run_section(ontology_text, PromptKind::Structural, &mut result, |r, s| {
            r.structural = Some(s)
        });
        self.run_section(ontology_text, PromptKind::Semantic, &mut result, |r, s| {
            r.semantic = Some(s)
        });
        self.run_section(ontology_text, PromptKind::Logical, &mut result, |r, s| {
            r.logical = Some(s)
        });
        self.run_section(
            ontology_text,
            PromptKind::Recommendations,
            &mut result,
            |r, s| r.recommendations = Some(s),
        );

        tracing::info!(
            sections = result.section_count(),
            "ontology analysis finished"
        );
        result
    }

    /// One isolated analysis step: a failure is logged and leaves `result` untouched.
    fn run_section<T, F>(&self, ontology_text: &str, kind: PromptKind, result: &mut AnalysisResult, set: F)
    where
        T: DeserializeOwned,
        F: FnOnce(&mut AnalysisResult, T),
    {
        match self.request_section::<T>(ontology_text, kind) {
            Ok(section) => {
                tracing::info!(kind = %kind, "analysis section completed");
                set(result, section);
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = %kind, "analysis section failed, continuing");
            }
        }
    }

    fn request_section<T: DeserializeOwned>(
        &self,
        ontology_text: &str,
        kind: PromptKind,
    ) -> OntoResult<T> {
        let prompt = prompt::generate_prompt_with_base(ontology_text, &self.base_iri, kind, None)?;
        Ok(super::request(&self.model, &prompt, kind.schema())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema;
    use crate::llm::CannedModel;

    const ZOO: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://example.org/#Animal"/>
</rdf:RDF>"#;

    #[test]
    fn all_sections_present_when_every_call_succeeds() {
        let analyzer = Analyzer::new(CannedModel::with_examples());
        let result = analyzer.analyze(ZOO);
        assert_eq!(result.section_count(), 4);

        let order: Vec<_> = analyzer
            .model()
            .calls()
            .into_iter()
            .map(|c| c.schema)
            .collect();
        assert_eq!(
            order,
            [
                "structural_analysis",
                "semantic_analysis",
                "logical_analysis",
                "recommendations"
            ]
        );
    }

    #[test]
    fn failed_logical_call_leaves_other_sections() {
        let model = CannedModel::with_examples().fail(schema::LOGICAL.name, "connection reset");
        let result = Analyzer::new(model).analyze(ZOO);
        assert!(result.structural.is_some());
        assert!(result.semantic.is_some());
        assert!(result.logical.is_none());
        assert!(result.recommendations.is_some());
    }

    #[test]
    fn schema_mismatch_drops_only_that_section() {
        let model = CannedModel::with_examples()
            .respond(schema::SEMANTIC.name, serde_json::json!({ "naming": [] }));
        let result = Analyzer::new(model).analyze(ZOO);
        assert!(result.semantic.is_none());
        assert_eq!(result.section_count(), 3);
    }

    #[test]
    fn unparsable_ontology_yields_empty_result_without_calls() {
        let analyzer = Analyzer::new(CannedModel::with_examples());
        let result = analyzer.analyze("not rdf at all");
        assert!(result.is_empty());
        assert!(analyzer.model().calls().is_empty());
    }

    #[test]
    fn every_call_failing_is_still_a_result() {
        let result = Analyzer::new(CannedModel::new()).analyze(ZOO);
        assert!(result.is_empty());
    }
}
