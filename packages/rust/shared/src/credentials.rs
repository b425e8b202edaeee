//! Credential holder for a future remote API integration.
//!
//! Nothing in the linking pipeline reads the key; it is carried so the CLI
//! can report whether a service key is configured.

use crate::config::ServiceConfig;

/// Value returned by [`ApiKeyHolder::get`] when no key has been set.
pub const DEFAULT_API_KEY: &str = "default_key";

/// A settable API key with a fallback default.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyHolder {
    key: Option<String>,
}

impl ApiKeyHolder {
    /// Create an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the key from the env var named in the `[service]` section.
    /// Empty values are treated as unset.
    pub fn from_service_config(config: &ServiceConfig) -> Self {
        let key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|v| !v.is_empty());
        Self { key }
    }

    /// Current key, or [`DEFAULT_API_KEY`] if none was set.
    pub fn get(&self) -> &str {
        self.key.as_deref().unwrap_or(DEFAULT_API_KEY)
    }

    /// Replace the stored key.
    pub fn set(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    /// Whether a real key (not the fallback) is present.
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }
}
