//! HTTP client helpers for tests.

use std::time::Duration;

use serde_json::Value;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn finish(resp: reqwest::Response) -> Result<(u16, Value), TestClientError> {
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        let value = serde_json::from_str(&body).unwrap_or(Value::Null);
        Ok((status, value))
    }

    pub async fn get(&self, path: &str) -> Result<(u16, Value), TestClientError> {
        Self::finish(self.client.get(self.url(path)).send().await?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(u16, Value), TestClientError> {
        Self::finish(self.client.delete(self.url(path)).send().await?).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<(u16, Value), TestClientError> {
        Self::finish(self.client.post(self.url(path)).json(body).send().await?).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<(u16, Value), TestClientError> {
        Self::finish(self.client.put(self.url(path)).json(body).send().await?).await
    }
}
