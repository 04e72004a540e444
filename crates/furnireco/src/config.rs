//! Client configuration
//!
//! The only moving part is where the backend lives and how long to wait for
//! it. Values come from CLI flags, which clap backs with the
//! `FURNIRECO_BACKEND_URL` and `FURNIRECO_TIMEOUT_SECS` environment variables.

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOP_K: usize = 5;

pub const BACKEND_URL_ENV: &str = "FURNIRECO_BACKEND_URL";
pub const TIMEOUT_SECS_ENV: &str = "FURNIRECO_TIMEOUT_SECS";
pub const TOP_K_ENV: &str = "FURNIRECO_TOP_K";

/// Configuration for the backend HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  /// Base URL of the recommendation backend, without a trailing slash
  pub base_url: String,
  /// Per-request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_BACKEND_URL.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS }
  }
}

impl ClientConfig {
  /// Validate and build a configuration.
  pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
    let trimmed = base_url.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed)
      .map_err(|e| ConfigError::InvalidUrl { url: base_url.to_string(), message: e.to_string() })?;

    match parsed.scheme() {
      "http" | "https" => {}
      other => {
        return Err(ConfigError::UnsupportedScheme {
          url: base_url.to_string(),
          scheme: other.to_string(),
        })
      }
    }

    if timeout_secs == 0 {
      return Err(ConfigError::ZeroTimeout);
    }

    Ok(Self { base_url: trimmed.to_string(), timeout_secs })
  }

  /// Full URL for a backend path such as `/recommend`.
  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }
}

pub fn validate_top_k(top_k: usize) -> Result<usize, ConfigError> {
  if top_k == 0 {
    Err(ConfigError::ZeroTopK)
  } else {
    Ok(top_k)
  }
}
