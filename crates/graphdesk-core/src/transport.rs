//! Async HTTP transport to the backend
//!
//! [`ApiTransport`] is the seam between the adapter and the network: the
//! production implementation wraps a shared `reqwest` client, tests substitute
//! an in-memory double. The transport performs no retries and no caching;
//! every failure propagates to the caller unchanged.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::GraphdeskError;

/// Query parameters as sent to the backend.
pub type Params = [(String, String)];

/// Minimal HTTP surface the adapter needs.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, path: &str, query: &Params) -> Result<JsonValue, GraphdeskError>;
    async fn post(
        &self,
        path: &str,
        query: &Params,
        body: &JsonValue,
    ) -> Result<JsonValue, GraphdeskError>;
    async fn put(
        &self,
        path: &str,
        query: &Params,
        body: &JsonValue,
    ) -> Result<JsonValue, GraphdeskError>;
    async fn delete(&self, path: &str, query: &Params) -> Result<JsonValue, GraphdeskError>;
}

/// `reqwest`-backed transport against a configured base URL.
pub struct HttpTransport {
    client: reqwest::Client,
    base: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, GraphdeskError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("graphdesk/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<JsonValue, GraphdeskError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            if text.trim().is_empty() {
                return Ok(JsonValue::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        // Error payloads carry a `detail` string by convention; anything else
        // falls back to a generic message at the view-model boundary.
        let detail = response
            .json::<JsonValue>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(JsonValue::as_str).map(String::from));
        warn!(status = status.as_u16(), detail = detail.as_deref(), "backend request failed");
        Err(GraphdeskError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, path: &str, query: &Params) -> Result<JsonValue, GraphdeskError> {
        let url = self.url(path);
        debug!(%url, "GET");
        self.dispatch(self.client.get(&url).query(query)).await
    }

    async fn post(
        &self,
        path: &str,
        query: &Params,
        body: &JsonValue,
    ) -> Result<JsonValue, GraphdeskError> {
        let url = self.url(path);
        debug!(%url, "POST");
        self.dispatch(self.client.post(&url).query(query).json(body))
            .await
    }

    async fn put(
        &self,
        path: &str,
        query: &Params,
        body: &JsonValue,
    ) -> Result<JsonValue, GraphdeskError> {
        let url = self.url(path);
        debug!(%url, "PUT");
        self.dispatch(self.client.put(&url).query(query).json(body))
            .await
    }

    async fn delete(&self, path: &str, query: &Params) -> Result<JsonValue, GraphdeskError> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        self.dispatch(self.client.delete(&url).query(query)).await
    }
}
