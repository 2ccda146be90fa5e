//! Declared output shapes for model responses.
//!
//! Each schema is derived from its typed record in [`super::types`] with
//! `schemars`, then made strict for structured-output APIs. The JSON Schema
//! sent with the request, the shape text embedded in the prompt and the
//! canned example replies are all rendered from that one derived schema.

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

use super::types::{
    LogicalAnalysis, RecommendationsAnalysis, SemanticAnalysis, StructuralAnalysis,
    UpdatedTripleSet,
};
use crate::llm::ResponseFormat;

/// A named response schema bound to the record it deserializes into.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDef {
    pub name: &'static str,
    generate: fn() -> Value,
}

impl SchemaDef {
    /// Strict JSON Schema: references inlined, every property required,
    /// no additional properties.
    pub fn json_schema(&self) -> Value {
        (self.generate)()
    }

    pub fn response_format(&self) -> ResponseFormat {
        ResponseFormat {
            name: self.name.to_string(),
            schema: self.json_schema(),
        }
    }

    /// Shape notation used inside prompts, e.g. `"issues": string[]`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        describe_into(&self.json_schema(), &mut out, 1);
        out
    }

    /// A minimal instance that satisfies the schema.
    pub fn example(&self) -> Value {
        example_of(&self.json_schema())
    }
}

pub const STRUCTURAL: SchemaDef = SchemaDef {
    name: "structural_analysis",
    generate: strict_schema::<StructuralAnalysis>,
};

pub const SEMANTIC: SchemaDef = SchemaDef {
    name: "semantic_analysis",
    generate: strict_schema::<SemanticAnalysis>,
};

pub const LOGICAL: SchemaDef = SchemaDef {
    name: "logical_analysis",
    generate: strict_schema::<LogicalAnalysis>,
};

pub const RECOMMENDATIONS: SchemaDef = SchemaDef {
    name: "recommendations",
    generate: strict_schema::<RecommendationsAnalysis>,
};

pub const UPDATED_ONTOLOGY: SchemaDef = SchemaDef {
    name: "updated_ontology",
    generate: strict_schema::<UpdatedTripleSet>,
};

/// Every declared response schema.
pub const ALL: [SchemaDef; 5] = [STRUCTURAL, SEMANTIC, LOGICAL, RECOMMENDATIONS, UPDATED_ONTOLOGY];

/// Look a schema up by its wire name.
pub fn by_name(name: &str) -> Option<SchemaDef> {
    ALL.into_iter().find(|s| s.name == name)
}

fn strict_schema<T: JsonSchema>() -> Value {
    let mut root = schema_for!(T).to_value();
    let defs = root
        .as_object_mut()
        .and_then(|obj| {
            obj.remove("$schema");
            obj.remove("definitions");
            obj.remove("$defs")
        })
        .and_then(|defs| match defs {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();
    inline_refs(&mut root, &defs);
    make_strict(&mut root);
    root
}

/// Replace `$ref` pointers into the definitions table with the definitions.
fn inline_refs(value: &mut Value, defs: &Map<String, Value>) {
    let target = value
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| r.rsplit('/').next())
        .and_then(|name| defs.get(name));
    if let Some(target) = target {
        *value = target.clone();
    }

    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                inline_refs(child, defs);
            }
        }
        Value::Array(items) => {
            for child in items {
                inline_refs(child, defs);
            }
        }
        _ => {}
    }
}

/// Structured-output APIs require every property listed as required and
/// `additionalProperties: false` on every object.
fn make_strict(value: &mut Value) {
    if let Value::Object(map) = value {
        if let Some(Value::Object(properties)) = map.get("properties") {
            let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
            map.insert("required".into(), Value::Array(required));
            map.insert("additionalProperties".into(), Value::Bool(false));
        }
        for child in map.values_mut() {
            make_strict(child);
        }
    } else if let Value::Array(items) = value {
        for child in items {
            make_strict(child);
        }
    }
}

fn schema_type(schema: &Value) -> Option<&str> {
    schema.get("type").and_then(Value::as_str)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn describe_into(schema: &Value, out: &mut String, depth: usize) {
    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        let alternatives: Vec<String> = values.iter().map(Value::to_string).collect();
        out.push_str(&alternatives.join(" | "));
        return;
    }
    match schema_type(schema) {
        Some("object") => describe_object(schema, out, depth),
        Some("array") => {
            let items = &schema["items"];
            if schema_type(items) == Some("object") {
                out.push_str("[\n");
                out.push_str(&indent(depth));
                describe_object(items, out, depth + 1);
                out.push('\n');
                out.push_str(&indent(depth - 1));
                out.push(']');
            } else {
                describe_into(items, out, depth);
                out.push_str("[]");
            }
        }
        Some(other) => out.push_str(other),
        None => out.push_str("any"),
    }
}

fn describe_object(schema: &Value, out: &mut String, depth: usize) {
    out.push_str("{\n");
    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (i, (name, field)) in properties.iter().enumerate() {
            out.push_str(&indent(depth));
            out.push('"');
            out.push_str(name);
            out.push_str("\": ");
            describe_into(field, out, depth + 1);
            if i + 1 < properties.len() {
                out.push(',');
            }
            out.push('\n');
        }
    }
    out.push_str(&indent(depth - 1));
    out.push('}');
}

fn example_of(schema: &Value) -> Value {
    if let Some(first) = schema
        .get("enum")
        .and_then(Value::as_array)
        .and_then(|values| values.first())
    {
        return first.clone();
    }
    match schema_type(schema) {
        Some("object") => {
            let map = schema
                .get("properties")
                .and_then(Value::as_object)
                .map(|properties| {
                    properties
                        .iter()
                        .map(|(name, field)| (name.clone(), example_of(field)))
                        .collect()
                })
                .unwrap_or_default();
            Value::Object(map)
        }
        Some("array") => Value::Array(vec![example_of(&schema["items"])]),
        Some("string") => Value::String("приклад".into()),
        Some("integer") | Some("number") => Value::from(0),
        Some("boolean") => Value::Bool(false),
        _ => Value::Null,
    }
}
