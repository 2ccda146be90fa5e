//! Analysis reports.
//!
//! An [`AnalysisResult`] is first laid out as a flat list of [`Block`]s, then
//! rendered as a Word document ([`docx`]) or as Markdown. Sections that are
//! absent from the result are skipped entirely.

pub mod docx;

use std::path::Path;

use crate::analysis::types::{
    AnalysisResult, LogicalAnalysis, RecommendationsAnalysis, SemanticAnalysis,
    StructuralAnalysis,
};
use crate::error::ReportError;

/// Text shown in place of an empty list.
pub const DEFAULT_PLACEHOLDER: &str = "Не знайдено";

/// One paragraph of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading, level 1 to 3.
    Heading { level: u8, text: String },
    Paragraph(String),
    /// Bold title introducing a list.
    ListTitle(String),
    Bullet(String),
    /// Stands in for a list with no items.
    Placeholder(String),
}

/// A laid-out report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub blocks: Vec<Block>,
}

impl Report {
    /// Lay out `result` with the default empty-list placeholder.
    pub fn from_analysis(result: &AnalysisResult) -> Self {
        Self::from_analysis_with(result, DEFAULT_PLACEHOLDER)
    }

    pub fn from_analysis_with(result: &AnalysisResult, placeholder: &str) -> Self {
        let mut b = Builder {
            blocks: Vec::new(),
            placeholder,
        };
        if let Some(s) = &result.structural {
            b.heading(1, "Structural Analysis");
            b.structural(s);
        }
        if let Some(s) = &result.semantic {
            b.heading(1, "Semantic Analysis");
            b.semantic(s);
        }
        if let Some(l) = &result.logical {
            b.heading(1, "Logical Analysis");
            b.logical(l);
        }
        if let Some(r) = &result.recommendations {
            b.heading(1, "Recommendations");
            b.recommendations(r);
        }
        Report { blocks: b.blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Markdown rendition of the same blocks.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<&Block> = None;
        for block in &self.blocks {
            // Blank line between a list and whatever follows it.
            let in_list = matches!(block, Block::Bullet(_));
            let after_list = matches!(prev, Some(Block::Bullet(_)));
            if prev.is_some() && !(in_list && after_list) {
                out.push('\n');
            }
            match block {
                Block::Heading { level, text } => {
                    out.push_str(&"#".repeat(usize::from(*level)));
                    out.push(' ');
                    out.push_str(text);
                }
                Block::Paragraph(text) => out.push_str(text),
                Block::ListTitle(text) => {
                    out.push_str("**");
                    out.push_str(text);
                    out.push_str("**");
                }
                Block::Bullet(text) => {
                    out.push_str("- ");
                    out.push_str(text);
                }
                Block::Placeholder(text) => {
                    out.push('_');
                    out.push_str(text);
                    out.push('_');
                }
            }
            out.push('\n');
            prev = Some(block);
        }
        out
    }

    /// Write the report to `path`; `.md` selects Markdown, anything else `.docx`.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        if self.is_empty() {
            return Err(ReportError::Empty);
        }
        let bytes = match path.extension().and_then(|e| e.to_str()) {
            Some("md") | Some("markdown") => self.to_markdown().into_bytes(),
            _ => docx::to_bytes(self)?,
        };
        std::fs::write(path, bytes).map_err(|source| ReportError::Io { source })?;
        tracing::info!(path = %path.display(), blocks = self.blocks.len(), "report written");
        Ok(())
    }
}

struct Builder<'a> {
    blocks: Vec<Block>,
    placeholder: &'a str,
}

impl Builder<'_> {
    fn heading(&mut self, level: u8, text: &str) {
        self.blocks.push(Block::Heading {
            level,
            text: text.to_string(),
        });
    }

    fn para(&mut self, text: String) {
        self.blocks.push(Block::Paragraph(text));
    }

    fn list(&mut self, title: &str, items: &[String]) {
        self.blocks.push(Block::ListTitle(title.to_string()));
        if items.is_empty() {
            self.blocks
                .push(Block::Placeholder(self.placeholder.to_string()));
        } else {
            self.blocks
                .extend(items.iter().cloned().map(Block::Bullet));
        }
    }

    fn structural(&mut self, s: &StructuralAnalysis) {
        let hierarchy = &s.class_hierarchy_analysis;
        self.heading(2, "Class Hierarchy Analysis");
        self.para(format!("Completeness: {}", hierarchy.completeness));
        self.list("Missing Elements", &hierarchy.missing_elements);
        self.list("Structural Issues", &hierarchy.structural_issues);
        self.list("Recommendations", &hierarchy.recommendations);

        let properties = &s.property_analysis;
        self.heading(2, "Property Analysis");
        self.heading(3, "Distribution");
        self.list("Well Distributed", &properties.distribution.well_distributed);
        self.list("Underutilized", &properties.distribution.underutilized);
        self.list("Overloaded", &properties.distribution.overloaded);
        self.list("Inheritance Issues", &properties.inheritance_issues);
        self.list("Recommendations", &properties.recommendations);

        let relationships = &s.relationship_analysis;
        self.heading(2, "Relationship Analysis");
        self.heading(3, "Patterns");
        self.list("Common", &relationships.patterns.common);
        self.list("Unusual", &relationships.patterns.unusual);
        self.list("Gaps", &relationships.gaps);
        self.list("Recommendations", &relationships.recommendations);
    }

    fn semantic(&mut self, s: &SemanticAnalysis) {
        let naming = &s.naming_analysis;
        self.heading(2, "Naming Analysis");
        self.para(format!("Conventions Status: {}", naming.conventions.status));
        self.list("Conventions Issues", &naming.conventions.issues);
        self.para(format!(
            "Terminology Consistency: {}",
            naming.terminology.consistency
        ));
        self.list("Terminology Problems", &naming.terminology.problems);
        self.list("Recommendations", &naming.recommendations);

        self.heading(2, "Conceptual Analysis");
        self.para(format!("Completeness: {}", s.conceptual_analysis.completeness));
        self.list("Gaps", &s.conceptual_analysis.gaps);
        self.list("Improvements", &s.conceptual_analysis.improvements);

        self.heading(2, "Domain Alignment");
        self.para(format!("Coverage: {}", s.domain_alignment.coverage));
        self.list("Missing Concepts", &s.domain_alignment.missing_concepts);
        self.list("Recommendations", &s.domain_alignment.recommendations);

        self.heading(2, "Semantic Relationships");
        self.para(format!(
            "Consistency: {}",
            s.semantic_relationships.consistency
        ));
        self.list("Issues", &s.semantic_relationships.issues);
        self.list("Suggestions", &s.semantic_relationships.suggestions);
    }

    fn logical(&mut self, l: &LogicalAnalysis) {
        self.heading(2, "Logical Analysis");
        self.list("Contradictions", &l.logical_analysis.contradictions);
        self.list(
            "Circular Dependencies",
            &l.logical_analysis.circular_dependencies,
        );
        self.list("Constraint Issues", &l.logical_analysis.constraint_issues);

        self.heading(2, "Consistency Check");
        self.list("Domain Range Issues", &l.consistency_check.domain_range_issues);
        self.list(
            "Cardinality Problems",
            &l.consistency_check.cardinality_problems,
        );
        self.list(
            "Disjointness Violations",
            &l.consistency_check.disjointness_violations,
        );

        self.heading(2, "Axiom Analysis");
        self.para(format!("Correctness: {}", l.axiom_analysis.correctness));
        self.para(format!("Completeness: {}", l.axiom_analysis.completeness));
        self.list("Issues", &l.axiom_analysis.issues);
        self.list("Recommendations", &l.axiom_analysis.recommendations);
    }

    fn recommendations(&mut self, r: &RecommendationsAnalysis) {
        let improvements = &r.improvements;
        self.heading(2, "Improvements");
        self.heading(3, "Critical");
        self.list("Structural", &improvements.critical.structural);
        self.list("Semantic", &improvements.critical.semantic);
        self.list("Logical", &improvements.critical.logical);
        self.heading(3, "Recommended");
        self.list("Structural", &improvements.recommended.structural);
        self.list("Semantic", &improvements.recommended.semantic);
        self.list("Documentation", &improvements.recommended.documentation);
        self.heading(3, "Optional");
        self.list("Enhancements", &improvements.optional.enhancements);
        self.list("Optimizations", &improvements.optional.optimizations);

        let guide = &r.implementation_guide;
        self.heading(2, "Implementation Guide");
        self.list("Priority Order", &guide.priority_order);
        self.list("Potential Impact", &guide.potential_impact);
        self.para(format!("Estimated Effort: {}", guide.estimated_effort));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema;

    fn logical_with_one_contradiction() -> AnalysisResult {
        let mut logical: LogicalAnalysis =
            serde_json::from_value(schema::LOGICAL.example()).unwrap();
        logical.logical_analysis.contradictions = vec!["Cat ⊑ ¬Animal".into()];
        logical.logical_analysis.circular_dependencies.clear();
        AnalysisResult {
            logical: Some(logical),
            ..Default::default()
        }
    }

    #[test]
    fn absent_sections_are_skipped() {
        let report = Report::from_analysis(&logical_with_one_contradiction());
        let level_one: Vec<_> = report
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading { level: 1, text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(level_one, ["Logical Analysis"]);
    }

    #[test]
    fn empty_list_gets_placeholder() {
        let report = Report::from_analysis(&logical_with_one_contradiction());
        let pos = report
            .blocks
            .iter()
            .position(|b| *b == Block::ListTitle("Circular Dependencies".into()))
            .unwrap();
        assert_eq!(
            report.blocks[pos + 1],
            Block::Placeholder("Не знайдено".into())
        );
    }

    #[test]
    fn custom_placeholder_is_used() {
        let report = Report::from_analysis_with(&logical_with_one_contradiction(), "None found");
        assert!(report
            .blocks
            .contains(&Block::Placeholder("None found".into())));
    }

    #[test]
    fn markdown_rendering() {
        let md = Report::from_analysis(&logical_with_one_contradiction()).to_markdown();
        assert!(md.starts_with("# Logical Analysis\n\n## Logical Analysis\n"));
        assert!(md.contains("**Contradictions**\n\n- Cat ⊑ ¬Animal\n"));
        assert!(md.contains("**Circular Dependencies**\n\n_Не знайдено_\n"));
        assert!(md.contains("Correctness: приклад"));
    }

    #[test]
    fn empty_result_cannot_be_saved() {
        let dir = tempfile::tempdir().unwrap();
        let err = Report::from_analysis(&AnalysisResult::default())
            .save(&dir.path().join("r.docx"))
            .unwrap_err();
        assert!(matches!(err, ReportError::Empty));
    }

    #[test]
    fn save_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::from_analysis(&logical_with_one_contradiction());

        let md_path = dir.path().join("report.md");
        report.save(&md_path).unwrap();
        assert!(std::fs::read_to_string(&md_path)
            .unwrap()
            .starts_with("# Logical Analysis"));

        let docx_path = dir.path().join("report.docx");
        report.save(&docx_path).unwrap();
        assert_eq!(&std::fs::read(&docx_path).unwrap()[..2], b"PK");
    }
}
