//! Model-driven ontology analysis and improvement.
//!
//! [`Analyzer`] owns a [`ModelClient`] and runs the four analysis requests
//! ([`Analyzer::analyze`]) or the improvement request ([`Analyzer::improve`]).

pub mod improve;
pub mod orchestrator;
pub mod schema;
pub mod types;

use serde::de::DeserializeOwned;

use crate::llm::{ModelClient, ModelError, ModelRequest};
use crate::prompt::SYSTEM_PROMPT;

pub use orchestrator::Analyzer;
pub use schema::SchemaDef;
pub use types::{
    AnalysisResult, LogicalAnalysis, ObjectType, RecommendationsAnalysis, SemanticAnalysis,
    StructuralAnalysis, UpdatedTriple, UpdatedTripleSet,
};

/// Submit `prompt` under `schema` and validate the answer into `T`.
///
/// A response that does not deserialize is rejected as a whole with
/// [`ModelError::SchemaValidation`].
pub fn request<T, M>(model: &M, prompt: &str, schema: SchemaDef) -> Result<T, ModelError>
where
    T: DeserializeOwned,
    M: ModelClient + ?Sized,
{
    let format = schema.response_format();
    let value = model.submit(&ModelRequest {
        system: SYSTEM_PROMPT,
        prompt,
        format: &format,
    })?;

    serde_json::from_value(value).map_err(|e| ModelError::SchemaValidation {
        schema: schema.name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CannedModel;

    #[test]
    fn request_validates_against_schema() {
        let model = CannedModel::new().respond(
            schema::LOGICAL.name,
            serde_json::json!({ "logicalAnalysis": "fine" }),
        );
        let err = request::<LogicalAnalysis, _>(&model, "p", schema::LOGICAL).unwrap_err();
        assert!(
            matches!(err, ModelError::SchemaValidation { ref schema, .. } if schema == "logical_analysis")
        );
    }

    #[test]
    fn undeclared_fields_fail_validation() {
        let mut root_extra = schema::LOGICAL.example();
        root_extra["bogus"] = serde_json::json!(true);
        let mut nested_extra = schema::LOGICAL.example();
        nested_extra["axiomAnalysis"]["extra"] = serde_json::json!("x");

        for reply in [root_extra, nested_extra] {
            let model = CannedModel::new().respond(schema::LOGICAL.name, reply);
            let err = request::<LogicalAnalysis, _>(&model, "p", schema::LOGICAL).unwrap_err();
            assert!(matches!(err, ModelError::SchemaValidation { .. }), "{err}");
        }

        let mut triple_extra = schema::UPDATED_ONTOLOGY.example();
        triple_extra["updatedOntology"][0]["confidence"] = serde_json::json!(0.9);
        let model = CannedModel::new().respond(schema::UPDATED_ONTOLOGY.name, triple_extra);
        assert!(request::<UpdatedTripleSet, _>(&model, "p", schema::UPDATED_ONTOLOGY).is_err());
    }

    #[test]
    fn request_returns_typed_record() {
        let model = CannedModel::with_examples();
        let update: UpdatedTripleSet = request(&model, "p", schema::UPDATED_ONTOLOGY).unwrap();
        assert_eq!(update.updated_ontology[0].object_type, ObjectType::Uri);
    }
}
