//! Configuration
//!
//! Layered configuration for the client: built-in defaults, the global config
//! file, an optional explicit file, then `CANOPY__*` environment variables.

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::views::ViewMode;
use serde::{Deserialize, Serialize};

/// Base URL of the file service used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://localhost:44396/api";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanopyConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote file service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL that endpoint paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts for failed GET requests (POSTs are never retried)
    #[serde(default = "default_get_retries")]
    pub get_retries: u32,

    /// Accept self-signed certificates (development servers)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_get_retries() -> u32 {
    1
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            get_retries: default_get_retries(),
            accept_invalid_certs: false,
        }
    }
}

impl ServiceConfig {
    /// Check that the base URL is an http(s) URL with a host.
    pub fn validate(&self) -> Result<(), String> {
        let base_url = self.base_url.trim();
        let Some(rest) = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"))
        else {
            return Err(format!(
                "Invalid base URL: {} (must start with http:// or https://)",
                self.base_url
            ));
        };

        if rest.chars().any(char::is_whitespace) {
            return Err(format!("Invalid base URL: {}", self.base_url));
        }

        let authority = rest.split('/').next().unwrap_or_default();
        let host = authority.rsplit('@').next().unwrap_or(authority);
        let host = host.split(':').next().unwrap_or_default();
        if host.is_empty() {
            return Err(format!("Invalid base URL: {} (missing host)", self.base_url));
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }

        Ok(())
    }
}

/// Presentation preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub view_mode: ViewMode,
}
