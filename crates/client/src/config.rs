use std::time::Duration;

use storefront_core::error::CoreError;
use validator::Validate;

/// Default base URL of the platform API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Storefront API client configuration loaded from environment variables.
#[derive(Debug, Clone, Validate)]
pub struct ClientConfig {
    /// Base URL of the platform API, without a trailing slash.
    #[validate(url)]
    pub api_url: String,
    /// Per-request timeout in seconds.
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `STOREFRONT_API_URL`          | `http://localhost:3000`  |
    /// | `STOREFRONT_API_TIMEOUT_SECS` | `30`                     |
    ///
    /// Unparseable timeouts fall back to the default; call
    /// [`ClientConfig::validated`] before use.
    pub fn from_env() -> Self {
        let api_url = std::env::var("STOREFRONT_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.into());

        let timeout_secs: u64 = std::env::var("STOREFRONT_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_url,
            timeout_secs,
        }
    }

    /// Return the config if it passes validation.
    pub fn validated(self) -> Result<Self, CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(format!("Invalid client configuration: {e}")))?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
