use thiserror::Error;

/// Why a backend request did not produce a usable body.
///
/// The pages do not branch on the variant; every one of these ends up as the
/// same "request failed" notice. The detail is kept for the diagnostic log.
#[derive(Debug, Error)]
pub enum RequestError {
  #[error("Request to {endpoint} failed: {message}")]
  Transport { endpoint: String, message: String },

  #[error("Request to {endpoint} timed out after {secs}s")]
  Timeout { endpoint: String, secs: u64 },

  #[error("{endpoint} returned HTTP {status}: {body}")]
  Status { endpoint: String, status: u16, body: String },

  #[error("Unexpected response body from {endpoint}: {message}")]
  Decode { endpoint: String, message: String },

  #[error("Backend reported an error on {endpoint}: {message}")]
  Backend { endpoint: String, message: String },
}

impl RequestError {
  pub fn endpoint(&self) -> &str {
    match self {
      RequestError::Transport { endpoint, .. }
      | RequestError::Timeout { endpoint, .. }
      | RequestError::Status { endpoint, .. }
      | RequestError::Decode { endpoint, .. }
      | RequestError::Backend { endpoint, .. } => endpoint,
    }
  }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error("Invalid backend URL '{url}': {message}")]
  InvalidUrl { url: String, message: String },

  #[error("Backend URL '{url}' must use http or https, not '{scheme}'")]
  UnsupportedScheme { url: String, scheme: String },

  #[error("Timeout must be at least one second")]
  ZeroTimeout,

  #[error("top_k must be at least 1")]
  ZeroTopK,
}
