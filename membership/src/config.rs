//! Gateway configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8888/";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured base URL does not parse or cannot carry paths.
    #[error("invalid membership service base URL {value:?}: {reason}")]
    InvalidBaseUrl {
        /// Raw configured value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A zero timeout would fail every request immediately.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Settings for reaching the remote membership service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEMBERSHIP")]
pub struct GatewaySettings {
    /// Base URL every request path is resolved against.
    pub base_url: Option<String>,
    /// Bearer token attached to mutating requests.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
}

impl GatewaySettings {
    /// Return the configured base URL, falling back to the local default.
    ///
    /// A missing trailing slash is added so relative paths append to the
    /// configured prefix instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the value does not parse
    /// or cannot be a base for relative paths.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            value: raw.to_owned(),
            reason,
        };
        let mut url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_owned()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Configured bearer token, ignoring blank values.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Return the per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] for a zero-second timeout.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
