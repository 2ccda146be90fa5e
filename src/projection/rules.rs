//! Ordered rule tables for node grouping and edge coloring.
//!
//! Both tables are evaluated top to bottom and the first match wins, so a
//! node typed both `owl:Class` and `owl:ObjectProperty` is a class.

use serde::{Deserialize, Serialize};

use crate::rdf::{Term, vocab};

use super::NodeGroup;

/// What a grouping rule tests about a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCondition {
    /// The graph asserts `(node, rdf:type, iri)`.
    HasType(&'static str),
    /// The node is a blank node.
    IsBlankNode,
}

impl GroupCondition {
    /// `types` are the `rdf:type` objects asserted about `node`.
    pub fn matches(&self, node: &Term, types: &[&Term]) -> bool {
        match self {
            GroupCondition::HasType(iri) => types.iter().any(|t| t.is_iri(iri)),
            GroupCondition::IsBlankNode => node.is_blank(),
        }
    }
}

/// One `(condition, group)` entry of the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRule {
    pub condition: GroupCondition,
    pub group: NodeGroup,
}

/// Classification table in priority order.
pub const GROUP_RULES: &[GroupRule] = &[
    GroupRule {
        condition: GroupCondition::HasType(vocab::OWL_CLASS),
        group: NodeGroup::Class,
    },
    GroupRule {
        condition: GroupCondition::HasType(vocab::OWL_OBJECT_PROPERTY),
        group: NodeGroup::Property,
    },
    GroupRule {
        condition: GroupCondition::HasType(vocab::OWL_DATATYPE_PROPERTY),
        group: NodeGroup::Property,
    },
    GroupRule {
        condition: GroupCondition::IsBlankNode,
        group: NodeGroup::BlankNode,
    },
];

/// Group assigned when no rule matches.
pub const DEFAULT_GROUP: NodeGroup = NodeGroup::Individual;

/// First matching rule's group, or [`DEFAULT_GROUP`].
pub fn classify(node: &Term, types: &[&Term], rules: &[GroupRule]) -> NodeGroup {
    rules
        .iter()
        .find(|rule| rule.condition.matches(node, types))
        .map(|rule| rule.group)
        .unwrap_or(DEFAULT_GROUP)
}

/// Colors edges whose predicate IRI contains any of `contains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeColorRule {
    pub contains: Vec<String>,
    pub color: String,
}

impl EdgeColorRule {
    pub fn new(contains: &[&str], color: &str) -> Self {
        Self {
            contains: contains.iter().map(|s| s.to_string()).collect(),
            color: color.to_string(),
        }
    }

    pub fn matches(&self, predicate_iri: &str) -> bool {
        self.contains.iter().any(|needle| predicate_iri.contains(needle.as_str()))
    }
}

/// Edge palette: ordered substring rules plus the neutral fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePalette {
    #[serde(default = "default_edge_rules")]
    pub rules: Vec<EdgeColorRule>,
    #[serde(default = "default_edge_color")]
    pub default_color: String,
}

fn default_edge_rules() -> Vec<EdgeColorRule> {
    vec![
        EdgeColorRule::new(&["predatorOf", "preyOf"], "#FF0000"),
        EdgeColorRule::new(&["relatedTo"], "#0000FF"),
    ]
}

fn default_edge_color() -> String {
    "#848484".into()
}

impl Default for EdgePalette {
    fn default() -> Self {
        Self {
            rules: default_edge_rules(),
            default_color: default_edge_color(),
        }
    }
}

impl EdgePalette {
    pub fn color_for(&self, predicate_iri: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(predicate_iri))
            .map(|rule| rule.color.as_str())
            .unwrap_or(&self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owl(local: &str) -> Term {
        Term::named(format!("{}{local}", vocab::OWL_NS))
    }

    #[test]
    fn class_outranks_property() {
        let node = Term::named("http://example.org/#Both");
        let class = owl("Class");
        let prop = owl("ObjectProperty");
        assert_eq!(
            classify(&node, &[&prop, &class], GROUP_RULES),
            NodeGroup::Class
        );
    }

    #[test]
    fn typed_blank_node_follows_type_rules_first() {
        let node = Term::blank("b1");
        let class = owl("Class");
        let restriction = owl("Restriction");
        assert_eq!(classify(&node, &[&class], GROUP_RULES), NodeGroup::Class);
        assert_eq!(
            classify(&node, &[&restriction], GROUP_RULES),
            NodeGroup::BlankNode
        );
    }

    #[test]
    fn untyped_named_node_is_individual() {
        let node = Term::named("http://example.org/#Tom");
        assert_eq!(classify(&node, &[], GROUP_RULES), NodeGroup::Individual);
    }

    #[test]
    fn datatype_property_is_property() {
        let node = Term::named("http://example.org/#age");
        let dt = owl("DatatypeProperty");
        assert_eq!(classify(&node, &[&dt], GROUP_RULES), NodeGroup::Property);
    }

    #[test]
    fn palette_uses_first_matching_rule() {
        let palette = EdgePalette::default();
        assert_eq!(palette.color_for("http://example.org/#predatorOf"), "#FF0000");
        assert_eq!(palette.color_for("http://example.org/#isPreyOf"), "#848484");
        assert_eq!(palette.color_for("http://example.org/#preyOf"), "#FF0000");
        assert_eq!(palette.color_for("http://example.org/#relatedTo"), "#0000FF");
        assert_eq!(palette.color_for("http://example.org/#eats"), "#848484");
    }
}
