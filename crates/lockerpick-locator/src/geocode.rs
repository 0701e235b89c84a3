//! Forward geocoding of a postal address into a map center.

use std::time::Duration;

use async_trait::async_trait;
use lockerpick_core::{AppConfig, Coordinate, DEFAULT_USER_AGENT};
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::retry::retry_with_backoff;
use crate::types::GeocodeResponse;

const GEOCODE_PATH: &str = "maps/api/geocode/json";

/// Converts free-text addresses into coordinates.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolves `address` to the provider's first match.
    ///
    /// `credential` is the map-provider key handed out by the locker lookup.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] when the provider reports no match, a non-`OK`
    /// status, or the request fails.
    async fn resolve(&self, address: &str, credential: &str) -> Result<Coordinate, GeocodeError>;
}

/// Client for the Google Geocoding API (or anything speaking its JSON shape).
pub struct GeocodingClient {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GeocodingClient {
    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`GeocodeError::InvalidBaseUrl`] for a malformed base URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Self::with_client(
            client,
            &config.geocoder_base_url,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Creates a client with a custom base URL and no retries (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`GeocodeError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
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
    /// Returns [`GeocodeError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_client(
        client: Client,
        base_url: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, GeocodeError> {
        let invalid = |reason: String| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(GEOCODE_PATH))
            .map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            max_retries,
            backoff_base_ms,
        })
    }

    fn build_url(&self, address: &str, credential: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", credential);
        url
    }

    async fn resolve_once(
        &self,
        address: &str,
        credential: &str,
    ) -> Result<Coordinate, GeocodeError> {
        let url = self.build_url(address, credential);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(GeocodeError::Deserialize)?;
        first_match(parsed, address)
    }
}

/// Picks the first result of an `OK` response.
fn first_match(response: GeocodeResponse, address: &str) -> Result<Coordinate, GeocodeError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => {
            return Err(GeocodeError::NoResults {
                address: address.to_string(),
            })
        }
        _ => {
            return Err(GeocodeError::Status {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            })
        }
    }
    response
        .results
        .into_iter()
        .next()
        .map(|r| Coordinate {
            lat: r.geometry.location.lat,
            lng: r.geometry.location.lng,
        })
        .ok_or_else(|| GeocodeError::NoResults {
            address: address.to_string(),
        })
}

#[async_trait]
impl AddressResolver for GeocodingClient {
    async fn resolve(&self, address: &str, credential: &str) -> Result<Coordinate, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::NoResults {
                address: address.to_string(),
            });
        }
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.resolve_once(address, credential)
        })
        .await
    }
}
