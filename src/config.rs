//! Configuration, persisted as TOML in `$XDG_CONFIG_HOME/ontoscope/config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command-line flags are layered on top with [`Config::apply`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::projection::rules::EdgePalette;
use crate::rdf::{self, DEFAULT_BASE_IRI};
use crate::report::DEFAULT_PLACEHOLDER;

/// Errors from configuration handling.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(ontoscope::config::no_home),
        help("Set the HOME environment variable, or pass --config <path>.")
    )]
    NoHome,

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(ontoscope::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(ontoscope::config::parse),
        help("Check the TOML syntax; `ontoscope config` prints a valid example.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(ontoscope::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode config: {message}")]
    #[diagnostic(code(ontoscope::config::serialize))]
    Serialize { message: String },

    #[error("invalid base IRI \"{iri}\" in config: {message}")]
    #[diagnostic(
        code(ontoscope::config::base_iri),
        help("`base_iri` must be an absolute IRI such as \"http://example.org/\".")
    )]
    InvalidBaseIri { iri: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Which model backend to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
    /// Offline canned answers.
    Canned,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
            Provider::Canned => "canned",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            "canned" => Ok(Provider::Canned),
            other => Err(format!(
                "unknown provider \"{other}\" (expected openai, ollama or canned)"
            )),
        }
    }
}

/// `[model]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: Provider,
    /// API root; provider default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name; provider default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_base_iri() -> String {
    DEFAULT_BASE_IRI.into()
}
fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            base_url: None,
            model: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelConfig {
    pub fn base_url_or_default(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(match self.provider {
                Provider::OpenAi => "https://api.openai.com/v1",
                Provider::Ollama => "http://localhost:11434",
                Provider::Canned => "",
            })
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Ollama => "llama3.2",
            Provider::Canned => "canned",
        })
    }
}

/// `[report]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Shown in place of an empty list.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base IRI for resolving relative references in RDF/XML.
    #[serde(default = "default_base_iri")]
    pub base_iri: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub report: ReportConfig,
    /// Edge colors for the graph view.
    #[serde(default)]
    pub palette: EdgePalette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_iri: default_base_iri(),
            model: ModelConfig::default(),
            report: ReportConfig::default(),
            palette: EdgePalette::default(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub base_iri: Option<String>,
}

/// `$XDG_CONFIG_HOME/ontoscope/config.toml`, falling back to `~/.config`.
pub fn default_path() -> ConfigResult<PathBuf> {
    let config_dir = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .map_err(|_| ConfigError::NoHome)?,
    };
    Ok(config_dir.join("ontoscope").join("config.toml"))
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a TOML file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        rdf::check_iri(&self.base_iri).map_err(|e| ConfigError::InvalidBaseIri {
            iri: self.base_iri.clone(),
            message: e.to_string(),
        })
    }

    /// Layer command-line values over the loaded file.
    pub fn apply(&mut self, overrides: Overrides) -> ConfigResult<()> {
        if let Some(provider) = overrides.provider {
            // Provider-specific defaults apply again unless also overridden.
            if provider != self.model.provider {
                self.model.base_url = None;
                self.model.model = None;
            }
            self.model.provider = provider;
        }
        if let Some(model) = overrides.model {
            self.model.model = Some(model);
        }
        if let Some(base_url) = overrides.base_url {
            self.model.base_url = Some(base_url);
        }
        if let Some(base_iri) = overrides.base_iri {
            self.base_iri = base_iri;
        }
        self.validate()
    }
}
