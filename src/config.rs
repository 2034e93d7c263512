//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

/// Default Gemini model used for triage.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Organization the replies are signed for.
pub const DEFAULT_ORGANIZATION: &str = "Nexus Finanças";

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener on.
    pub host: String,
    pub port: u16,
    /// Gemini API key (`GEMINI_API_KEY`).
    pub api_key: SecretString,
    pub model: String,
    /// Base URL of the Gemini REST API.
    pub base_url: String,
    /// Upper bound on a single AI call.
    pub llm_timeout: Duration,
    /// Maximum accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Organization name injected into the policy prompt.
    pub organization: String,
}

impl ServerConfig {
    /// Build configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from `lookup`, which maps a variable name to its value.
    ///
    /// Only `GEMINI_API_KEY` is required. Unparseable numeric values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let defaults = Self::with_api_key(api_key);

        let host = lookup("MAIL_TRIAGE_HOST").unwrap_or(defaults.host);

        let port: u16 = lookup("MAIL_TRIAGE_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let model = lookup("MAIL_TRIAGE_MODEL").unwrap_or(defaults.model);

        let base_url = lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url);

        let llm_timeout = lookup("MAIL_TRIAGE_LLM_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.llm_timeout);

        let max_upload_bytes: usize = lookup("MAIL_TRIAGE_MAX_UPLOAD_BYTES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_upload_bytes);

        let organization = lookup("MAIL_TRIAGE_ORGANIZATION").unwrap_or(defaults.organization);

        Ok(Self {
            host,
            port,
            api_key: defaults.api_key,
            model,
            base_url,
            llm_timeout,
            max_upload_bytes,
            organization,
        })
    }

    /// Default configuration around the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            api_key: SecretString::from(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: crate::llm::gemini::DEFAULT_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(30),
            max_upload_bytes: 10 * 1024 * 1024,
            organization: DEFAULT_ORGANIZATION.to_string(),
        }
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// LLM provider settings derived from this configuration.
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            backend: LlmBackend::Gemini,
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: self.llm_timeout,
        }
    }
}
