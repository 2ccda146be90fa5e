//! Typed records for model responses.
//!
//! The response schemas in [`super::schema`] are derived from these records.
//! Every field is required and unknown fields are rejected, so deserializing
//! is the schema validation step.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Structural analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StructuralAnalysis {
    pub class_hierarchy_analysis: ClassHierarchyAnalysis,
    pub property_analysis: PropertyAnalysis,
    pub relationship_analysis: RelationshipAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassHierarchyAnalysis {
    pub completeness: String,
    pub missing_elements: Vec<String>,
    pub structural_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyAnalysis {
    pub distribution: PropertyDistribution,
    pub inheritance_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyDistribution {
    pub well_distributed: Vec<String>,
    pub underutilized: Vec<String>,
    pub overloaded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelationshipAnalysis {
    pub patterns: RelationshipPatterns,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelationshipPatterns {
    pub common: Vec<String>,
    pub unusual: Vec<String>,
}

// ---------------------------------------------------------------------------
// Semantic analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SemanticAnalysis {
    pub naming_analysis: NamingAnalysis,
    pub conceptual_analysis: ConceptualAnalysis,
    pub domain_alignment: DomainAlignment,
    pub semantic_relationships: SemanticRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NamingAnalysis {
    pub conventions: NamingConventions,
    pub terminology: Terminology,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NamingConventions {
    pub status: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Terminology {
    pub consistency: String,
    pub problems: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConceptualAnalysis {
    pub completeness: String,
    pub gaps: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DomainAlignment {
    pub coverage: String,
    pub missing_concepts: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SemanticRelationships {
    pub consistency: String,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Logical analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogicalAnalysis {
    pub logical_analysis: LogicalStructure,
    pub consistency_check: ConsistencyCheck,
    pub axiom_analysis: AxiomAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogicalStructure {
    pub contradictions: Vec<String>,
    pub circular_dependencies: Vec<String>,
    pub constraint_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConsistencyCheck {
    pub domain_range_issues: Vec<String>,
    pub cardinality_problems: Vec<String>,
    pub disjointness_violations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AxiomAnalysis {
    pub correctness: String,
    pub completeness: String,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecommendationsAnalysis {
    pub improvements: Improvements,
    pub implementation_guide: ImplementationGuide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Improvements {
    pub critical: CriticalImprovements,
    pub recommended: RecommendedImprovements,
    pub optional: OptionalImprovements,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CriticalImprovements {
    pub structural: Vec<String>,
    pub semantic: Vec<String>,
    pub logical: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecommendedImprovements {
    pub structural: Vec<String>,
    pub semantic: Vec<String>,
    pub documentation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionalImprovements {
    pub enhancements: Vec<String>,
    pub optimizations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImplementationGuide {
    pub priority_order: Vec<String>,
    pub potential_impact: Vec<String>,
    pub estimated_effort: String,
}

// ---------------------------------------------------------------------------
// Aggregate result
// ---------------------------------------------------------------------------

/// The four analysis sections; each is present only if its request succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural: Option<StructuralAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical: Option<LogicalAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<RecommendationsAnalysis>,
}

impl AnalysisResult {
    /// Number of sections present.
    pub fn section_count(&self) -> usize {
        [
            self.structural.is_some(),
            self.semantic.is_some(),
            self.logical.is_some(),
            self.recommendations.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.section_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Improvement
// ---------------------------------------------------------------------------

/// How the object of an [`UpdatedTriple`] is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Uri,
    Literal,
}

/// A triple proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatedTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub object_type: ObjectType,
}

/// Wire envelope of the improvement response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatedTripleSet {
    pub updated_ontology: Vec<UpdatedTriple>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_fails_validation() {
        let value = serde_json::json!({
            "logicalAnalysis": {
                "contradictions": [],
                "circularDependencies": []
            },
            "consistencyCheck": {
                "domainRangeIssues": [],
                "cardinalityProblems": [],
                "disjointnessViolations": []
            },
            "axiomAnalysis": {
                "correctness": "ok",
                "completeness": "ok",
                "issues": [],
                "recommendations": []
            }
        });
        let err = serde_json::from_value::<LogicalAnalysis>(value).unwrap_err();
        assert!(err.to_string().contains("constraintIssues"));
    }

    #[test]
    fn absent_sections_are_omitted_from_json() {
        let result = AnalysisResult::default();
        assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
        assert!(result.is_empty());
    }

    #[test]
    fn object_type_uses_lowercase_wire_names() {
        let triple: UpdatedTriple = serde_json::from_str(
            r#"{"subject":"http://example.org/#Cat","predicate":"http://www.w3.org/2000/01/rdf-schema#comment","object":"Домашня тварина","objectType":"literal"}"#,
        )
        .unwrap();
        assert_eq!(triple.object_type, ObjectType::Literal);
        assert!(serde_json::from_str::<ObjectType>("\"bnode\"").is_err());
    }
}
