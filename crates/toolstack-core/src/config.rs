//! Model service configuration.
//!
//! Read once when an orchestrator is built: defaults first, then
//! `MODEL_SERVICE_*` environment variables on top
//! (`MODEL_SERVICE_URL`, `MODEL_SERVICE_API_KEY`,
//! `MODEL_SERVICE_REQUEST_TIMEOUT_SECS`).

use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

/// Default model service endpoint.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8001";

/// Default instruction prompt given to every agent.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant with access to tools.";

/// Default name for agent sessions.
pub const DEFAULT_SESSION_NAME: &str = "tool_session";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

const ENV_PREFIX: &str = "MODEL_SERVICE";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    url: String,
    #[serde(default)]
    api_key: Option<String>,
    request_timeout_secs: u64,
    instructions: String,
    session_name: String,
}

/// Resolved model service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL of the model service.
    pub base_url: String,
    /// API key, sent as a bearer credential.
    pub api_key: Option<String>,
    /// Timeout applied to every remote call.
    pub request_timeout: Duration,
    /// Instruction prompt for created agents.
    pub instructions: String,
    /// Name given to created sessions.
    pub session_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL)
    }
}

impl ServiceConfig {
    /// Create a configuration for the given endpoint with default policy.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|k: &String| !k.is_empty());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from the process environment.
    ///
    /// # Errors
    /// Returns error if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = Config::builder()
            .set_default("url", DEFAULT_SERVICE_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("instructions", DEFAULT_INSTRUCTIONS)?
            .set_default("session_name", DEFAULT_SESSION_NAME)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            base_url: raw.url,
            api_key: raw.api_key.filter(|k| !k.is_empty()),
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            instructions: raw.instructions,
            session_name: raw.session_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> ServiceConfig {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServiceConfig::from_source(Environment::with_prefix(ENV_PREFIX).source(Some(map))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = load(&[]);
        assert_eq!(cfg, ServiceConfig::default());
        assert_eq!(cfg.base_url, "http://localhost:8001");
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let cfg = load(&[
            ("MODEL_SERVICE_URL", "http://stack:9000"),
            ("MODEL_SERVICE_API_KEY", "secret"),
            ("MODEL_SERVICE_REQUEST_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(cfg.base_url, "http://stack:9000");
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_api_key_is_unset() {
        let cfg = load(&[("MODEL_SERVICE_API_KEY", "")]);
        assert!(cfg.api_key.is_none());
        assert!(ServiceConfig::default().with_api_key("").api_key.is_none());
    }
}
