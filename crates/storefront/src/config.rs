//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COREX_ASSISTANT_URL` - Inference gateway endpoint URL
//! - `COREX_ASSISTANT_API_KEY` - Gateway API key
//!
//! ## Optional
//! - `COREX_ASSISTANT_TIMEOUT_SECS` - Gateway request timeout (default: 30)
//! - `COREX_CHAT_HISTORY` - Session snapshot path
//!   (default: corex-chat-history.json)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HISTORY_PATH: &str = "corex-chat-history.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Inference gateway configuration.
    pub assistant: AssistantConfig,
    /// Where the chat session snapshot is persisted.
    pub chat_history: PathBuf,
}

/// Inference gateway configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct AssistantConfig {
    /// Gateway endpoint URL.
    pub endpoint: Url,
    /// Gateway API key (sent as a bearer token).
    pub api_key: SecretString,
    /// Per-request timeout; an elapsed timeout is a transport failure.
    pub timeout: Duration,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let assistant = AssistantConfig::from_env()?;
        let chat_history =
            PathBuf::from(get_env_or_default("COREX_CHAT_HISTORY", DEFAULT_HISTORY_PATH));

        Ok(Self {
            assistant,
            chat_history,
        })
    }
}

impl AssistantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = get_required_env("COREX_ASSISTANT_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("COREX_ASSISTANT_URL".to_string(), e.to_string())
            })?;
        let api_key = SecretString::from(get_required_env("COREX_ASSISTANT_API_KEY")?);
        let timeout_secs = get_env_or_default(
            "COREX_ASSISTANT_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("COREX_ASSISTANT_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            endpoint,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
