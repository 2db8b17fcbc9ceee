use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;

use super::error::ApiError;

/// One authenticated round trip against the Botpanel backend.
///
/// Every tool operation goes through exactly one call to this trait. The
/// indirection exists so handler tests can run against a stub instead of a
/// live server.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Perform `method` against `endpoint` (leading slash, relative to the
    /// configured base URL) with an optional JSON body. Returns the decoded
    /// response body on any 2xx status.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;
}

/// Live HTTP client for the Botpanel REST API.
///
/// Bearer-token auth, JSON in and out, one attempt per call. No retries, no
/// caching, no timeout override.
pub struct ApiClient {
    http_client: reqwest::Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(Config::from_env()?))
    }

    fn build_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.config.api_token))
                .map_err(|e| ApiError::Config(format!("Invalid API token: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl Gateway for ApiClient {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .headers(self.build_headers()?);
        if let Some(ref body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let text = response.text().await.unwrap_or_default();
            warn!("{} {} -> {} {}", method, url, status.as_u16(), reason);
            return Err(ApiError::http(status.as_u16(), reason, &text));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// GET `endpoint` and decode the response into `T`.
pub async fn get_json<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    endpoint: &str,
) -> Result<T, ApiError> {
    let value = gateway.request(Method::GET, endpoint, None).await?;
    Ok(serde_json::from_value(value)?)
}

/// POST `body` to `endpoint` and decode the response into `T`.
pub async fn post_json<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    endpoint: &str,
    body: Option<Value>,
) -> Result<T, ApiError> {
    let value = gateway.request(Method::POST, endpoint, body).await?;
    Ok(serde_json::from_value(value)?)
}

/// PATCH `body` to `endpoint` and decode the response into `T`.
pub async fn patch_json<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    endpoint: &str,
    body: Value,
) -> Result<T, ApiError> {
    let value = gateway.request(Method::PATCH, endpoint, Some(body)).await?;
    Ok(serde_json::from_value(value)?)
}
