//! External language-model access.
//!
//! The rest of the crate sees the model only through [`ModelClient::submit`]:
//! a system instruction, a user prompt, and a declared JSON Schema in; a JSON
//! value out. Providers:
//!
//! - [`OpenAiClient`]: OpenAI-compatible `chat/completions` with strict `json_schema` output
//! - [`OllamaClient`]: local Ollama `/api/chat` with a `format` schema
//! - [`CannedModel`]: canned replies per schema name, for tests and dry runs

pub mod canned;
pub mod ollama;
pub mod openai;

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use crate::config::{ModelConfig, Provider};

pub use canned::CannedModel;
pub use ollama::{OllamaClient, OllamaConfig};
pub use openai::{OpenAiClient, OpenAiConfig};

/// Errors from the model subsystem.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("model service is not reachable at {url}: {message}")]
    #[diagnostic(
        code(ontoscope::llm::unavailable),
        help("Check the base URL and your network connection, or start the local server.")
    )]
    Unavailable { url: String, message: String },

    #[error("API key variable {var} is not set")]
    #[diagnostic(
        code(ontoscope::llm::missing_api_key),
        help("Export {var}=<your key> or point `model.api_key_env` at another variable.")
    )]
    MissingApiKey { var: String },

    #[error("model request failed: {message}")]
    #[diagnostic(
        code(ontoscope::llm::request_failed),
        help("Check that the service is running and the model name is correct.")
    )]
    RequestFailed { message: String },

    #[error("model service returned HTTP {status}: {body}")]
    #[diagnostic(
        code(ontoscope::llm::status),
        help("401/403 usually means a bad API key; 404 an unknown model; 429 a rate limit.")
    )]
    Status { status: u16, body: String },

    #[error("the model refused the request: {message}")]
    #[diagnostic(
        code(ontoscope::llm::refused),
        help("The model declined to answer. Retry, or try another model.")
    )]
    Refused { message: String },

    #[error("failed to parse model response: {message}")]
    #[diagnostic(
        code(ontoscope::llm::parse_error),
        help("The model returned an unexpected response format.")
    )]
    ParseError { message: String },

    #[error("response does not match schema \"{schema}\": {message}")]
    #[diagnostic(
        code(ontoscope::llm::schema_validation),
        help(
            "The structured response was rejected as a whole. \
             Models without strict structured-output support fail this more often."
        )
    )]
    SchemaValidation { schema: String, message: String },
}

/// A named JSON Schema the response must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: Value,
}

/// One structured-output request.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    /// Fixed system instruction.
    pub system: &'a str,
    /// User instruction.
    pub prompt: &'a str,
    pub format: &'a ResponseFormat,
}

/// The narrow capability the analysis pipeline depends on.
pub trait ModelClient {
    /// Submit a request and return the structured JSON answer.
    fn submit(&self, request: &ModelRequest<'_>) -> Result<Value, ModelError>;

    /// Lightweight reachability check.
    fn probe(&self) -> Result<(), ModelError>;

    /// `provider:model`, for logs.
    fn describe(&self) -> String;
}

impl<M: ModelClient + ?Sized> ModelClient for Box<M> {
    fn submit(&self, request: &ModelRequest<'_>) -> Result<Value, ModelError> {
        (**self).submit(request)
    }

    fn probe(&self) -> Result<(), ModelError> {
        (**self).probe()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<M: ModelClient + ?Sized> ModelClient for &M {
    fn submit(&self, request: &ModelRequest<'_>) -> Result<Value, ModelError> {
        (**self).submit(request)
    }

    fn probe(&self) -> Result<(), ModelError> {
        (**self).probe()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Build the client selected by `config`.
pub fn connect(config: &ModelConfig) -> Result<Box<dyn ModelClient>, ModelError> {
    match config.provider {
        Provider::OpenAi => {
            let api_key = std::env::var(&config.api_key_env).ok();
            Ok(Box::new(OpenAiClient::new(OpenAiConfig {
                base_url: config.base_url_or_default().to_string(),
                model: config.model_or_default().to_string(),
                api_key,
                api_key_env: config.api_key_env.clone(),
                timeout_secs: config.timeout_secs,
            })))
        }
        Provider::Ollama => Ok(Box::new(OllamaClient::new(OllamaConfig {
            base_url: config.base_url_or_default().to_string(),
            model: config.model_or_default().to_string(),
            timeout_secs: config.timeout_secs,
        }))),
        Provider::Canned => Ok(Box::new(CannedModel::with_examples())),
    }
}

/// POST a JSON body and return the decoded JSON response.
pub(crate) fn post_json(
    agent: &ureq::Agent,
    url: &str,
    bearer: Option<&str>,
    body: &Value,
) -> Result<Value, ModelError> {
    let body_str = serde_json::to_string(body).map_err(|e| ModelError::RequestFailed {
        message: format!("JSON serialize error: {e}"),
    })?;

    let mut request = agent.post(url).set("Content-Type", "application/json");
    if let Some(key) = bearer {
        request = request.set("Authorization", &format!("Bearer {key}"));
    }

    let resp = request
        .send_string(&body_str)
        .map_err(|e| http_error(url, e))?;

    let resp_str = resp.into_string().map_err(|e| ModelError::ParseError {
        message: e.to_string(),
    })?;

    serde_json::from_str(&resp_str).map_err(|e| ModelError::ParseError {
        message: e.to_string(),
    })
}

pub(crate) fn http_error(url: &str, err: ureq::Error) -> ModelError {
    match err {
        ureq::Error::Status(status, resp) => ModelError::Status {
            status,
            body: resp.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ModelError::Unavailable {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

/// Decode the JSON document a model returned as message text.
///
/// Tolerates a fenced ```json block around the document.
pub(crate) fn parse_content(content: &str) -> Result<Value, ModelError> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| ModelError::ParseError {
        message: format!("JSON parse error: {e}"),
    })
}
