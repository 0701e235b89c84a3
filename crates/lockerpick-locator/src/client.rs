//! HTTP client for the locker lookup endpoint.
//!
//! Posts a [`LockerLookupRequest`] to `{base}/api/shipping/lockers` and decodes
//! the locker list plus the map credential. Transport failures and non-2xx
//! statuses surface as lookup failures; an undecodable body surfaces as
//! [`LookupError::Deserialize`].

use std::time::Duration;

use async_trait::async_trait;
use lockerpick_core::{
    AppConfig, LockerLookupRequest, LockerLookupResponse, DEFAULT_USER_AGENT,
};
use reqwest::{Client, Url};

use crate::error::LookupError;
use crate::retry::retry_with_backoff;

const LOCKERS_PATH: &str = "api/shipping/lockers";

/// Source of lockers for a courier and address.
#[async_trait]
pub trait LockerLocator: Send + Sync {
    /// Looks up the lockers matching `request`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] on transport failure, non-2xx status or a
    /// malformed response body.
    async fn lookup(
        &self,
        request: &LockerLookupRequest,
    ) -> Result<LockerLookupResponse, LookupError>;
}

/// Client for the remote locker lookup service.
///
/// Use [`LocatorClient::from_config`] in binaries or
/// [`LocatorClient::with_base_url`] to point at a mock server in tests.
pub struct LocatorClient {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl LocatorClient {
    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`LookupError::InvalidBaseUrl`] for a malformed base URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Self::with_client(
            client,
            &config.locator_base_url,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Creates a client with a custom base URL and no retries (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`LookupError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Self::with_client(client, base_url, 0, 0)
    }

    /// Wraps an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_client(
        client: Client,
        base_url: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            client,
            endpoint: Self::endpoint_url(base_url)?,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Resolves the lockers endpoint against `base_url`.
    ///
    /// The base is normalised to end with exactly one slash so that a base
    /// with a path prefix (`https://host/shop`) keeps it.
    fn endpoint_url(base_url: &str) -> Result<Url, LookupError> {
        let invalid = |reason: String| LookupError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_string()));
        }
        base.join(LOCKERS_PATH).map_err(|e| invalid(e.to_string()))
    }

    /// The fully-resolved lookup URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_once(
        &self,
        request: &LockerLookupRequest,
    ) -> Result<LockerLookupResponse, LookupError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| LookupError::Deserialize {
            context: format!("lockers(courier={})", request.courier),
            source: e,
        })
    }
}

#[async_trait]
impl LockerLocator for LocatorClient {
    async fn lookup(
        &self,
        request: &LockerLookupRequest,
    ) -> Result<LockerLookupResponse, LookupError> {
        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.post_once(request)
        })
        .await?;
        tracing::debug!(
            courier = %request.courier,
            city = %request.city,
            lockers = response.lockers.len(),
            "locker lookup succeeded"
        );
        Ok(response)
    }
}
