use std::env;

use crate::classifier::{ClassifierError, HttpChatClient};

/// Application-level constants
pub const APP_NAME: &str = "uptitrate";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4.1";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Endpoint settings for the symptom-classifier chat client.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl ClassifierConfig {
    /// Read the configuration from `UPTITRATE_LLM_*` environment variables,
    /// falling back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("UPTITRATE_LLM_BASE_URL").unwrap_or(defaults.base_url),
            api_key: env::var("UPTITRATE_LLM_API_KEY").ok(),
            model: env::var("UPTITRATE_LLM_MODEL").unwrap_or(defaults.model),
            timeout_secs: env::var("UPTITRATE_LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Build the HTTP chat client described by this configuration.
    pub fn client(&self) -> Result<HttpChatClient, ClassifierError> {
        HttpChatClient::new(
            &self.base_url,
            self.api_key.clone(),
            &self.model,
            self.timeout_secs,
        )
    }
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info")
}

/// Install the fmt subscriber with the env-driven filter. Safe to call more
/// than once; later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .try_init();
}
