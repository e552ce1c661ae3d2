//! HTTP client for the shop backend's read endpoints.
//!
//! Wraps `reqwest` with base-URL handling, a bounded retry policy and typed
//! response decoding. The [`crate::ShopDataStore`] implementation on top of
//! this type is where transport errors become [`crate::DataUnavailable`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;

/// Client for the shop directory REST API.
///
/// Use [`ShopClient::from_app_config`] in binaries or
/// [`ShopClient::with_base_url`] to point at a mock server in tests.
pub struct ShopClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ShopClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if the configured URL is unusable.
    pub fn from_app_config(config: &seeker_core::AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Creates a client rooted at `base_url` (e.g. `http://localhost:8000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse or cannot carry a path.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Trailing slash so path segments append under the API root.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Builds `{base}/{segments...}?{params}` with percent-encoded values.
    pub(crate) fn build_url(&self, segments: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// GETs `url` with retries and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] for any non-2xx status.
    /// - [`ClientError::Http`] on network failure after retries.
    /// - [`ClientError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.get_json_once(url)
        })
        .await
    }

    /// Like [`Self::get_json`], but a 404 is `Ok(None)`.
    pub(crate) async fn get_json_optional<T: DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<Option<T>, ClientError> {
        match self.get_json(url).await {
            Ok(value) => Ok(Some(value)),
            Err(ClientError::UnexpectedStatus { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_json_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ClientError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
