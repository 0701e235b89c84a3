use thiserror::Error;

/// Errors returned by the locker lookup client.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network, timeout or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The lockers endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be decoded into a lookup response.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl LookupError {
    /// `true` for a malformed response body, `false` for transport-level
    /// failures (network, timeout, status).
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, LookupError::Deserialize { .. })
    }
}

/// Errors returned by the forward geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from geocoder")]
    UnexpectedStatus { status: u16 },

    /// The provider answered but reported a non-`OK` status.
    #[error("geocoder status {status}: {message}")]
    Status { status: String, message: String },

    #[error("no geocoding match for \"{address}\"")]
    NoResults { address: String },

    #[error("JSON deserialization error for geocode response: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
