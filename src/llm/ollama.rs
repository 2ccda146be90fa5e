//! Ollama client for running the analyses against a local model.

use serde_json::{Value, json};

use super::{ModelClient, ModelError, ModelRequest, http_error, parse_content, post_json};

/// Configuration for the Ollama client.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model name to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3.2".into(),
            timeout_secs: 120,
        }
    }
}

/// Client for the Ollama REST API.
pub struct OllamaClient {
    config: OllamaConfig,
    agent: ureq::Agent,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    /// Get the model name being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Non-streaming chat body; `format` carries the JSON Schema.
    fn body(&self, request: &ModelRequest<'_>) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt },
            ],
            "format": request.format.schema,
            "stream": false,
            "options": { "temperature": 0 },
        })
    }

    /// Models available locally, from `/api/tags`.
    pub fn list_models(&self) -> Result<Vec<String>, ModelError> {
        let url = self.url("api/tags");
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(5))
            .build();

        let resp = agent.get(&url).call().map_err(|e| http_error(&url, e))?;
        let body = resp.into_string().map_err(|e| ModelError::ParseError {
            message: e.to_string(),
        })?;
        let json: Value = serde_json::from_str(&body).map_err(|e| ModelError::ParseError {
            message: e.to_string(),
        })?;

        Ok(model_names(&json))
    }
}

fn model_names(tags: &Value) -> Vec<String> {
    tags["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// `llama3.2` matches `llama3.2:latest`.
fn has_model(available: &[String], target: &str) -> bool {
    available
        .iter()
        .any(|m| m == target || m.split(':').next() == Some(target))
}

impl ModelClient for OllamaClient {
    fn submit(&self, request: &ModelRequest<'_>) -> Result<Value, ModelError> {
        let response = post_json(&self.agent, &self.url("api/chat"), None, &self.body(request))?;
        let content = response["message"]["content"]
            .as_str()
            .ok_or_else(|| ModelError::ParseError {
                message: "missing 'message.content' field".into(),
            })?;
        parse_content(content)
    }

    fn probe(&self) -> Result<(), ModelError> {
        let models = self.list_models()?;
        if has_model(&models, &self.config.model) {
            Ok(())
        } else {
            Err(ModelError::RequestFailed {
                message: format!(
                    "model \"{}\" is not pulled; run `ollama pull {}`",
                    self.config.model, self.config.model
                ),
            })
        }
    }

    fn describe(&self) -> String {
        format!("ollama:{}", self.config.model)
    }
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}
