//! OpenAI-compatible chat completions client with strict structured output.

use serde_json::{Value, json};

use super::{ModelClient, ModelError, ModelRequest, http_error, parse_content, post_json};

/// Configuration for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    /// Resolved key; `None` when the variable was not set.
    pub api_key: Option<String>,
    /// Variable the key was read from, for error messages.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".into(),
            timeout_secs: 120,
        }
    }
}

pub struct OpenAiClient {
    config: OpenAiConfig,
    agent: ureq::Agent,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    fn api_key(&self) -> Result<&str, ModelError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ModelError::MissingApiKey {
                var: self.config.api_key_env.clone(),
            })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Request body for one structured completion.
    fn body(&self, request: &ModelRequest<'_>) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.format.name,
                    "strict": true,
                    "schema": request.format.schema,
                },
            },
        })
    }
}

/// Pull the structured answer out of a completion response.
fn extract_answer(response: &Value) -> Result<Value, ModelError> {
    let message = &response["choices"][0]["message"];
    if message.is_null() {
        return Err(ModelError::ParseError {
            message: "missing 'choices[0].message' field".into(),
        });
    }
    if let Some(refusal) = message["refusal"].as_str() {
        return Err(ModelError::Refused {
            message: refusal.to_string(),
        });
    }
    let content = message["content"]
        .as_str()
        .ok_or_else(|| ModelError::ParseError {
            message: "missing 'content' field".into(),
        })?;
    parse_content(content)
}

impl ModelClient for OpenAiClient {
    fn submit(&self, request: &ModelRequest<'_>) -> Result<Value, ModelError> {
        let key = self.api_key()?;
        let response = post_json(
            &self.agent,
            &self.url("chat/completions"),
            Some(key),
            &self.body(request),
        )?;
        extract_answer(&response)
    }

    fn probe(&self) -> Result<(), ModelError> {
        let key = self.api_key()?;
        let url = self.url("models");
        self.agent
            .get(&url)
            .set("Authorization", &format!("Bearer {key}"))
            .call()
            .map_err(|e| http_error(&url, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("openai:{}", self.config.model)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &self.config.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ResponseFormat;

    fn format() -> ResponseFormat {
        ResponseFormat {
            name: "probe".into(),
            schema: json!({ "type": "object" }),
        }
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let client = OpenAiClient::new(OpenAiConfig::default());
        let format = format();
        let err = client
            .submit(&ModelRequest {
                system: "s",
                prompt: "p",
                format: &format,
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingApiKey { ref var } if var == "OPENAI_API_KEY"));
    }

    #[test]
    fn body_declares_strict_json_schema() {
        let client = OpenAiClient::new(OpenAiConfig::default());
        let format = format();
        let body = client.body(&ModelRequest {
            system: "sys",
            prompt: "user",
            format: &format,
        });
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "probe");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn extract_answer_reads_content_and_refusals() {
        let ok = json!({ "choices": [{ "message": { "content": "{\"x\": 1}", "refusal": null } }] });
        assert_eq!(extract_answer(&ok).unwrap()["x"], 1);

        let refused = json!({ "choices": [{ "message": { "content": null, "refusal": "no" } }] });
        assert!(matches!(
            extract_answer(&refused),
            Err(ModelError::Refused { .. })
        ));

        assert!(matches!(
            extract_answer(&json!({})),
            Err(ModelError::ParseError { .. })
        ));
    }

    #[test]
    fn unreachable_endpoint_is_unavailable() {
        let client = OpenAiClient::new(OpenAiConfig {
            base_url: "http://127.0.0.1:1/v1".into(), // unreachable port
            api_key: Some("test".into()),
            timeout_secs: 2,
            ..Default::default()
        });
        assert!(matches!(
            client.probe(),
            Err(ModelError::Unavailable { .. })
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let client = OpenAiClient::new(OpenAiConfig {
            api_key: Some("sk-secret".into()),
            ..Default::default()
        });
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
    }
}
