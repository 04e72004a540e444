//! HTTP client for the recommendation backend
//!
//! A thin wrapper over reqwest. Every call collapses transport, status and
//! body problems into a [`RequestError`]; the pages decide what to show.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::types::{AnalyticsAggregate, RecommendRequest, RecommendResponse, StatusMessage};

pub const RECOMMEND_PATH: &str = "/recommend";
pub const ANALYTICS_PATH: &str = "/analytics";
pub const STATUS_PATH: &str = "/";

/// The two backend operations the pages depend on
#[async_trait]
pub trait RecommendationBackend: Send + Sync {
  async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse, RequestError>;

  async fn analytics(&self) -> Result<AnalyticsAggregate, RequestError>;
}

/// HTTP client for the FurniReco backend
pub struct RecoClient {
  client: Client,
  config: ClientConfig,
}

impl RecoClient {
  pub fn new(config: ClientConfig) -> Result<Self, RequestError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| RequestError::Transport {
        endpoint: config.base_url.clone(),
        message: format!("failed to create HTTP client: {e}"),
      })?;

    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  /// Ask the backend's root route whether it is alive
  pub async fn health_check(&self) -> Result<String, RequestError> {
    let url = self.config.endpoint(STATUS_PATH);
    let body = self.send(STATUS_PATH, self.client.get(&url)).await?;
    let status: StatusMessage = decode(STATUS_PATH, body)?;
    Ok(status.message.trim().to_string())
  }

  async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Value, RequestError> {
    let secs = self.config.timeout_secs;
    tracing::debug!(endpoint, base_url = %self.config.base_url, "sending backend request");

    let response = timeout(Duration::from_secs(secs), request.send())
      .await
      .map_err(|_| RequestError::Timeout { endpoint: endpoint.to_string(), secs })?
      .map_err(|e| transport_error(endpoint, secs, e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(RequestError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
      });
    }

    let body: Value = response.json().await.map_err(|e| {
      if e.is_timeout() {
        RequestError::Timeout { endpoint: endpoint.to_string(), secs }
      } else {
        RequestError::Decode { endpoint: endpoint.to_string(), message: e.to_string() }
      }
    })?;

    if let Some(message) = backend_error(&body) {
      return Err(RequestError::Backend { endpoint: endpoint.to_string(), message });
    }

    tracing::debug!(endpoint, status = status.as_u16(), "backend request succeeded");
    Ok(body)
  }
}

#[async_trait]
impl RecommendationBackend for RecoClient {
  async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse, RequestError> {
    let url = self.config.endpoint(RECOMMEND_PATH);
    let body = self.send(RECOMMEND_PATH, self.client.post(&url).json(request)).await?;
    decode(RECOMMEND_PATH, body)
  }

  async fn analytics(&self) -> Result<AnalyticsAggregate, RequestError> {
    let url = self.config.endpoint(ANALYTICS_PATH);
    let body = self.send(ANALYTICS_PATH, self.client.get(&url)).await?;
    decode(ANALYTICS_PATH, body)
  }
}

fn transport_error(endpoint: &str, secs: u64, err: reqwest::Error) -> RequestError {
  if err.is_timeout() {
    RequestError::Timeout { endpoint: endpoint.to_string(), secs }
  } else {
    RequestError::Transport { endpoint: endpoint.to_string(), message: err.to_string() }
  }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, RequestError> {
  serde_json::from_value(body)
    .map_err(|e| RequestError::Decode { endpoint: endpoint.to_string(), message: e.to_string() })
}

/// The backend reports its own failures as `{"error": "..."}` with a 2xx status.
pub fn backend_error(body: &Value) -> Option<String> {
  match body.get("error")? {
    Value::Null => None,
    Value::String(message) => Some(message.clone()),
    other => Some(other.to_string()),
  }
}
