//! Retry with exponential back-off and jitter for the lookup and geocoding clients.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, timeouts, 5xx). Everything else is
//! returned immediately: a malformed body or a 4xx will not improve on retry.

use std::future::Future;
use std::time::Duration;

use crate::error::{GeocodeError, LookupError};

const MAX_DELAY_MS: u64 = 10_000;

/// Classifies an error as worth another attempt.
pub(crate) trait Retriable {
    fn is_retriable(&self) -> bool;
}

fn is_transient_http(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
}

impl Retriable for LookupError {
    fn is_retriable(&self) -> bool {
        match self {
            LookupError::Http(e) => is_transient_http(e),
            LookupError::UnexpectedStatus { status, .. } => *status >= 500,
            LookupError::Deserialize { .. } | LookupError::InvalidBaseUrl { .. } => false,
        }
    }
}

impl Retriable for GeocodeError {
    fn is_retriable(&self) -> bool {
        match self {
            GeocodeError::Http(e) => is_transient_http(e),
            GeocodeError::UnexpectedStatus { status } => *status >= 500,
            // Google reports transient overload as UNKNOWN_ERROR.
            GeocodeError::Status { status, .. } => status == "UNKNOWN_ERROR",
            GeocodeError::NoResults { .. }
            | GeocodeError::Deserialize(_)
            | GeocodeError::InvalidBaseUrl { .. } => false,
        }
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The sleep before retry `n` is `backoff_base_ms * 2^(n-1)` ± 25 % jitter,
/// capped at 10 s.
pub(crate) async fn retry_with_backoff<T, E, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, E>
where
    E: Retriable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retriable() || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
