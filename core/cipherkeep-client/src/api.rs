//! HTTP client for the CipherKeep router.

use cipherkeep_types::{CipherRecord, CryptoMode};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Thin wrapper over the router's endpoints.
#[derive(Debug, Clone)]
pub struct RouterClient {
    base_url: String,
    client: Client,
}

impl RouterClient {
    /// Creates a client for the router at `base_url` (e.g.
    /// `http://127.0.0.1:3000`).
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Config(format!("not an http(s) URL: {base_url}")));
        }
        let client = Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /crypto`. Returns the engine's text, which may carry the
    /// `ERROR:` marker.
    pub async fn crypto(&self, mode: CryptoMode, password: &str, payload: &str) -> ClientResult<String> {
        let mut body = json!({
            "mode": mode.wire_name(),
            "password": password,
        });
        body[mode.payload_field()] = payload.into();
        self.post_text("/crypto", &body).await
    }

    /// `POST /save`. Returns the router's status message.
    pub async fn save(&self, label: &str, cipher: &str) -> ClientResult<String> {
        self.post_text("/save", &json!({ "label": label, "cipher": cipher }))
            .await
    }

    /// `POST /delete`. Returns the router's status message.
    pub async fn delete(&self, label: &str) -> ClientResult<String> {
        self.post_text("/delete", &json!({ "label": label })).await
    }

    /// `GET /records`.
    pub async fn records(&self) -> ClientResult<Vec<CipherRecord>> {
        let resp = self
            .client
            .get(format!("{}/records", self.base_url))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default().trim().to_string(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn post_text(&self, path: &str, body: &serde_json::Value) -> ClientResult<String> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?.trim().to_string();
        debug!(path, status = status.as_u16(), "router response");
        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }
}
