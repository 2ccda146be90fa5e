//! Node/edge projection of a parsed ontology graph.
//!
//! The projection is what the graph view renders: one [`VisualNode`] per IRI or
//! blank node, literals folded into their subject's datatype properties, and one
//! [`VisualEdge`] per object-valued statement except `rdf:type`, which decides
//! the node group instead.
//!
//! A projection is derived and disposable. Rebuild it whenever the graph changes.

pub mod html;
pub mod rules;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::rdf::{Graph, Term, vocab};

use rules::{EdgePalette, GROUP_RULES};

/// Label placeholder for an untyped blank node without `rdfs:label`.
pub const ANONYMOUS_NODE_LABEL: &str = "[Анонімний вузол]";

/// Visual category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeGroup {
    Class,
    Individual,
    Property,
    BlankNode,
    /// Part of the renderer vocabulary; the builder never emits literal nodes.
    Literal,
}

impl NodeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeGroup::Class => "class",
            NodeGroup::Individual => "individual",
            NodeGroup::Property => "property",
            NodeGroup::BlankNode => "blankNode",
            NodeGroup::Literal => "literal",
        }
    }
}

impl std::fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    /// IRI or blank node id.
    pub id: String,
    /// Display label, with one `name: value` line per datatype property.
    pub label: String,
    pub group: NodeGroup,
    pub datatype_properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl Projection {
    /// No nodes to draw. Callers show a "no data" state rather than an error.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Node counts per group, in first-seen order of groups.
    pub fn group_counts(&self) -> Vec<(NodeGroup, usize)> {
        let mut counts: Vec<(NodeGroup, usize)> = Vec::new();
        for node in &self.nodes {
            match counts.iter_mut().find(|(g, _)| *g == node.group) {
                Some((_, n)) => *n += 1,
                None => counts.push((node.group, 1)),
            }
        }
        counts
    }
}

/// Build the projection with the default edge palette.
pub fn build(graph: &Graph) -> Projection {
    build_with(graph, &EdgePalette::default())
}

/// Build the projection, coloring edges with `palette`.
pub fn build_with(graph: &Graph, palette: &EdgePalette) -> Projection {
    let mut types: HashMap<&Term, Vec<&Term>> = HashMap::new();
    let mut labels: HashMap<&Term, &str> = HashMap::new();
    for statement in graph {
        if statement.predicate.is_iri(vocab::RDF_TYPE) {
            types.entry(&statement.subject).or_default().push(&statement.object);
        } else if statement.predicate.is_iri(vocab::RDFS_LABEL) {
            labels
                .entry(&statement.subject)
                .or_insert(statement.object.value());
        }
    }

    let mut index: HashMap<&Term, usize> = HashMap::new();
    let mut drafts: Vec<(&Term, NodeGroup, BTreeMap<String, String>)> = Vec::new();
    let mut edges = Vec::new();

    for statement in graph {
        for term in [&statement.subject, &statement.object] {
            if term.is_resource() && !index.contains_key(term) {
                let node_types = types.get(term).map(Vec::as_slice).unwrap_or(&[]);
                let group = rules::classify(term, node_types, GROUP_RULES);
                index.insert(term, drafts.len());
                drafts.push((term, group, BTreeMap::new()));
            }
        }

        if !statement.subject.is_resource() {
            continue;
        }

        if statement.object.is_literal() {
            let slot = index[&statement.subject];
            drafts[slot].2.insert(
                statement.predicate.short_name().to_string(),
                statement.object.value().to_string(),
            );
        } else if !statement.predicate.is_iri(vocab::RDF_TYPE) {
            edges.push(VisualEdge {
                from: statement.subject.value().to_string(),
                to: statement.object.value().to_string(),
                label: statement.predicate.short_name().to_string(),
                color: palette.color_for(statement.predicate.value()).to_string(),
            });
        }
    }

    let nodes = drafts
        .into_iter()
        .map(|(term, group, datatype_properties)| {
            let mut label = base_label(term, &labels, &types);
            for (name, value) in &datatype_properties {
                label.push('\n');
                label.push_str(name);
                label.push_str(": ");
                label.push_str(value);
            }
            VisualNode {
                id: term.value().to_string(),
                label,
                group,
                datatype_properties,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "built projection");
    Projection { nodes, edges }
}

fn base_label(
    term: &Term,
    labels: &HashMap<&Term, &str>,
    types: &HashMap<&Term, Vec<&Term>>,
) -> String {
    if let Some(label) = labels.get(term) {
        return label.to_string();
    }
    if term.is_blank() {
        return match types.get(term).and_then(|t| t.first()) {
            Some(ty) => format!("[{}]", ty.short_name()),
            None => ANONYMOUS_NODE_LABEL.to_string(),
        };
    }
    term.short_name().to_string()
}
