//! Instruction text for the external model.
//!
//! A prompt embeds the ontology as a flat JSON list of string triples, a
//! checklist of what to look at, and the required output shape. The shape
//! text comes from the same [`SchemaDef`] that produces the response-format
//! schema, so the prompt and the schema cannot disagree.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::schema::{self, SchemaDef};
use crate::analysis::types::AnalysisResult;
use crate::error::PromptError;
use crate::rdf::{self, DEFAULT_BASE_IRI, Graph};

/// Fixed system instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "\
You are an expert system specialized in ontology analysis with deep understanding of semantic web \
technologies, knowledge representation, and ontology engineering principles. Your task is to perform \
comprehensive analysis of ontologies while maintaining strict adherence to established ontological \
principles and best practices in knowledge engineering.
Your responses should be:
1. Detailed but concise
2. Technically precise
3. Well-structured
4. Focused on practical improvements
5. Based on established ontology design patterns
Always provide your analysis in the specified JSON format while ensuring semantic accuracy and logical \
consistency in your recommendations.
All answers must be in ukrainian language.";

/// Which template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Structural,
    Semantic,
    Logical,
    Recommendations,
    Improvement,
}

impl PromptKind {
    /// The four analysis kinds, in the order they are requested.
    pub const ANALYSES: [PromptKind; 4] = [
        PromptKind::Structural,
        PromptKind::Semantic,
        PromptKind::Logical,
        PromptKind::Recommendations,
    ];

    pub const ALL: [PromptKind; 5] = [
        PromptKind::Structural,
        PromptKind::Semantic,
        PromptKind::Logical,
        PromptKind::Recommendations,
        PromptKind::Improvement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PromptKind::Structural => "structural",
            PromptKind::Semantic => "semantic",
            PromptKind::Logical => "logical",
            PromptKind::Recommendations => "recommendations",
            PromptKind::Improvement => "improvement",
        }
    }

    /// Response schema the model must follow for this kind.
    pub fn schema(self) -> SchemaDef {
        match self {
            PromptKind::Structural => schema::STRUCTURAL,
            PromptKind::Semantic => schema::SEMANTIC,
            PromptKind::Logical => schema::LOGICAL,
            PromptKind::Recommendations => schema::RECOMMENDATIONS,
            PromptKind::Improvement => schema::UPDATED_ONTOLOGY,
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown prompt kind \"{s}\" (expected structural, semantic, logical, \
                     recommendations or improvement)"
                )
            })
    }
}

/// A triple with every term reduced to its string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Flatten a graph for embedding; term kinds are dropped.
pub fn flatten(graph: &Graph) -> Vec<FlatTriple> {
    graph
        .iter()
        .map(|st| FlatTriple {
            subject: st.subject.value().to_string(),
            predicate: st.predicate.value().to_string(),
            object: st.object.value().to_string(),
        })
        .collect()
}

/// Render the `kind` prompt for `rdf_text`, parsed against the default base IRI.
pub fn generate_prompt(
    rdf_text: &str,
    kind: PromptKind,
    analyses: Option<&AnalysisResult>,
) -> Result<String, PromptError> {
    generate_prompt_with_base(rdf_text, DEFAULT_BASE_IRI, kind, analyses)
}

/// Render the `kind` prompt for `rdf_text`, resolving relative IRIs against `base_iri`.
pub fn generate_prompt_with_base(
    rdf_text: &str,
    base_iri: &str,
    kind: PromptKind,
    analyses: Option<&AnalysisResult>,
) -> Result<String, PromptError> {
    // Checked before parsing so a missing context is reported as such.
    if kind == PromptKind::Improvement && analyses.is_none() {
        return Err(PromptError::MissingAnalyses);
    }

    let graph = rdf::parse(rdf_text, base_iri).map_err(|source| PromptError::Rdf { source })?;
    let ontology = to_pretty_json(&flatten(&graph))?;
    let shape = kind.schema().describe();

    let prompt = match analysis_template(kind) {
        Some(template) => template.render(&ontology, &shape),
        None => {
            let analyses = analyses.ok_or(PromptError::MissingAnalyses)?;
            improvement_template(&ontology, &to_pretty_json(analyses)?, &shape)
        }
    };

    tracing::debug!(kind = %kind, triples = graph.len(), chars = prompt.len(), "prompt generated");
    Ok(prompt)
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, PromptError> {
    serde_json::to_string_pretty(value).map_err(|e| PromptError::Encode {
        message: e.to_string(),
    })
}

struct AnalysisTemplate {
    intro: &'static str,
    checklist: &'static str,
    shape_lead: &'static str,
}

impl AnalysisTemplate {
    fn render(&self, ontology: &str, shape: &str) -> String {
        format!(
            "{}\n{}\n\nOntology in JSON format:\n```\n{ontology}\n```\n\n{}\n{shape}\n",
            self.intro, self.checklist, self.shape_lead
        )
    }
}

const STRUCTURAL: AnalysisTemplate = AnalysisTemplate {
    intro: "Analyze the structure of the provided ontology focusing on the following aspects:",
    checklist: "\
1. Class Hierarchy Analysis:
   1. Evaluate the completeness of class hierarchy
   2. Identify potential missing classes or relationships
   3. Check for structural anomalies
   4. Assess the balance and depth of the hierarchy
2. Property Distribution:
   1. Analyze the distribution of properties across classes
   2. Identify underutilized or overloaded classes
   3. Check for property inheritance patterns
   4. Evaluate property restrictions and constraints
3. Relationship Patterns:
   1. Examine the types and patterns of relationships
   2. Identify potential redundant or missing relationships
   3. Analyze the connectivity between concepts
   4. Check for isolated components or dead-ends",
    shape_lead: "Provide your analysis in the following JSON structure:",
};

const SEMANTIC: AnalysisTemplate = AnalysisTemplate {
    intro: "Perform a detailed semantic analysis of the ontology with focus on:",
    checklist: "\
1. Naming and Labeling:
   1. Consistency of naming conventions
   2. Clarity and meaningfulness of labels
   3. Appropriate use of terminology
   4. Language consistency
2. Concept Definitions:
   1. Completeness of concept definitions
   2. Clarity of class descriptions
   3. Appropriate use of annotations
   4. Semantic precision
3. Domain Alignment:
   1. Alignment with domain terminology
   2. Coverage of domain concepts
   3. Semantic gaps
   4. Conceptual accuracy
4. Semantic Relationships:
   1. Meaningfulness of relationships
   2. Semantic consistency
   3. Relationship appropriateness
   4. Conceptual integrity",
    shape_lead: "Return analysis in this JSON format:",
};

const LOGICAL: AnalysisTemplate = AnalysisTemplate {
    intro: "Analyze the logical consistency of the ontology focusing on:",
    checklist: "\
1. Logical Structure:
   1. Identify logical contradictions
   2. Check for circular dependencies
   3. Validate logical constraints
   4. Evaluate inference patterns
2. Consistency Rules:
   1. Domain and range constraints
   2. Cardinality restrictions
   3. Disjointness assertions
   4. Property characteristics
3. Formal Axioms:
   1. Correctness of axiom definitions
   2. Completeness of logical rules
   3. Consistency of restrictions
   4. Inference implications",
    shape_lead: "Provide analysis in the following structure:",
};

const RECOMMENDATIONS: AnalysisTemplate = AnalysisTemplate {
    intro: "Based on the analysis of the ontology, provide comprehensive recommendations for \
             improvement focusing on:",
    checklist: "\
1. Structural Improvements:
   1. Class hierarchy optimization
   2. Property organization
   3. Relationship enhancement
   4. Structural patterns
2. Semantic Enhancements:
   1. Naming improvements
   2. Definition clarity
   3. Semantic precision
   4. Domain coverage
3. Quality Improvements:
   1. Documentation enhancement
   2. Reusability improvements
   3. Maintainability suggestions
   4. Best practices alignment",
    shape_lead: "Format recommendations as:",
};

/// `None` for the improvement kind, which has its own template.
fn analysis_template(kind: PromptKind) -> Option<&'static AnalysisTemplate> {
    match kind {
        PromptKind::Structural => Some(&STRUCTURAL),
        PromptKind::Semantic => Some(&SEMANTIC),
        PromptKind::Logical => Some(&LOGICAL),
        PromptKind::Recommendations => Some(&RECOMMENDATIONS),
        PromptKind::Improvement => None,
    }
}

fn improvement_template(ontology: &str, analyses: &str, shape: &str) -> String {
    format!(
        "\
As an expert ontology engineer, your task is to update the provided ontology to resolve the \
identified issues and implement the recommended improvements from the analyses below. The updated \
ontology should adhere to best practices in ontology engineering, maintain logical consistency, and \
enhance overall quality.

**Instructions:**

1. **Review the Provided Ontology:**
   - Carefully examine the ontology given in JSON format.

2. **Consider the Analyses and Recommendations:**
   - Analyze the issues and recommendations from the structural, semantic, logical analyses, and \
overall recommendations that are present below.

3. **Update the Ontology:**
   - Modify or add ontology elements to address each identified issue.
   - Implement the suggested improvements thoroughly.
   - Ensure that changes do not introduce new inconsistencies or errors.
   - Follow established ontology design patterns and best practices.

4. **Prepare the Updated Ontology Elements:**
   - Provide only the modified or newly added ontology elements.
   - Ensure that the output can be seamlessly merged with the existing ontology.

**Ontology in JSON format:**
```
{ontology}
```

**Analyses and Recommendations:**
```
{analyses}
```

**Provide the updated ontology elements in the following JSON format:**
```
{shape}
```

**Important Notes:**

- Do not include the entire ontology; only provide the updated or new elements.
- Subjects, predicates and objects of type \"uri\" must be absolute IRIs.
- Ensure that all URIs and literals are correctly formatted.
- Maintain consistency of namespaces and prefixes.
- The updated ontology should be compatible with standard RDF formats.
- Double-check for logical consistency and adherence to best practices.
"
    )
}
