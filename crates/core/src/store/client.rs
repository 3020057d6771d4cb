//! Typed reqwest wrapper for one store's REST and identity-admin surfaces.

use reqwest::{RequestBuilder, Response};

use crate::config::StoreConfig;
use crate::error::{CutoverError, Result};

/// HTTP client for a single store, authorized with its service key.
pub struct StoreClient {
    pub(crate) http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StoreClient {
    /// Create a new client for the store at `base_url`.
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.url, &config.service_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn users_url(&self) -> String {
        format!("{}/auth/v1/admin/users", self.base_url)
    }

    pub(crate) fn user_url(&self, id: &str) -> String {
        format!("{}/auth/v1/admin/users/{}", self.base_url, id)
    }

    /// Attach the service key both as the gateway `apikey` and as the bearer token.
    pub(crate) fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

/// Send a request and turn transport failures and non-2xx statuses into
/// [`CutoverError::Store`], labelled with `what`.
pub(crate) async fn send_checked(req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = req
        .send()
        .await
        .map_err(|e| CutoverError::Store(format!("{what} request failed: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(CutoverError::Store(format!("{what} failed ({status}): {body}")));
    }

    Ok(resp)
}
