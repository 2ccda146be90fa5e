//! Offline model that answers from canned replies keyed by schema name.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{ModelClient, ModelError, ModelRequest};
use crate::analysis::schema;

#[derive(Debug, Clone)]
enum Reply {
    Answer(Value),
    Fail(String),
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedCall {
    pub schema: String,
    pub prompt: String,
}

/// Replays fixed answers; unknown schemas fail with `RequestFailed`.
#[derive(Debug, Default)]
pub struct CannedModel {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<CannedCall>>,
}

impl CannedModel {
    /// A model with no replies: every request fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// A model answering every declared schema with its minimal example.
    pub fn with_examples() -> Self {
        schema::ALL
            .into_iter()
            .fold(Self::new(), |model, def| model.respond(def.name, def.example()))
    }

    /// Answer requests for `schema_name` with `value`.
    pub fn respond(mut self, schema_name: &str, value: Value) -> Self {
        self.replies
            .insert(schema_name.to_string(), Reply::Answer(value));
        self
    }

    /// Fail requests for `schema_name`.
    pub fn fail(mut self, schema_name: &str, message: &str) -> Self {
        self.replies
            .insert(schema_name.to_string(), Reply::Fail(message.to_string()));
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<CannedCall> {
        self.calls.lock().expect("canned call log poisoned").clone()
    }
}

impl ModelClient for CannedModel {
    fn submit(&self, request: &ModelRequest<'_>) -> Result<Value, ModelError> {
        let name = request.format.name.as_str();
        self.calls
            .lock()
            .expect("canned call log poisoned")
            .push(CannedCall {
                schema: name.to_string(),
                prompt: request.prompt.to_string(),
            });

        match self.replies.get(name) {
            Some(Reply::Answer(value)) => Ok(value.clone()),
            Some(Reply::Fail(message)) => Err(ModelError::RequestFailed {
                message: message.clone(),
            }),
            None => Err(ModelError::RequestFailed {
                message: format!("no canned reply for schema \"{name}\""),
            }),
        }
    }

    fn probe(&self) -> Result<(), ModelError> {
        Ok(())
    }

    fn describe(&self) -> String {
        "canned".into()
    }
}
