//! One resolution cycle: lockers lookup followed by geocoding the map center.
//!
//! A [`PendingResolution`] owns everything it needs, so it can be awaited
//! in place or spawned. Its [`ResolutionResult`] carries the cycle token back
//! to the workflow, which drops results from superseded cycles.

use std::sync::Arc;

use lockerpick_core::{Coordinate, LockerLookupRequest, LockerLookupResponse};
use lockerpick_locator::{AddressResolver, GeocodeError, LockerLocator, LookupError};

use crate::state::ResolutionToken;

pub struct PendingResolution {
    pub(crate) token: ResolutionToken,
    pub(crate) request: LockerLookupRequest,
    pub(crate) address_text: String,
    pub(crate) locator: Arc<dyn LockerLocator>,
    pub(crate) resolver: Arc<dyn AddressResolver>,
}

impl PendingResolution {
    #[must_use]
    pub fn token(&self) -> ResolutionToken {
        self.token
    }

    #[must_use]
    pub fn request(&self) -> &LockerLookupRequest {
        &self.request
    }

    /// Performs the lookup and, when it succeeds, geocodes the shipping
    /// address once using the returned map credential.
    pub async fn run(self) -> ResolutionResult {
        let response = match self.locator.lookup(&self.request).await {
            Ok(response) => response,
            Err(err) => {
                return ResolutionResult {
                    token: self.token,
                    outcome: Err(err),
                }
            }
        };
        let center = self
            .resolver
            .resolve(&self.address_text, &response.map_api_key)
            .await;
        ResolutionResult {
            token: self.token,
            outcome: Ok(ResolvedLockers { response, center }),
        }
    }
}

impl std::fmt::Debug for PendingResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingResolution")
            .field("token", &self.token)
            .field("request", &self.request)
            .field("address_text", &self.address_text)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct ResolvedLockers {
    pub response: LockerLookupResponse,
    /// Geocoded shipping address, or why it could not be placed.
    pub center: Result<Coordinate, GeocodeError>,
}

/// Outcome of [`PendingResolution::run`], tagged with its cycle token.
#[derive(Debug)]
pub struct ResolutionResult {
    pub token: ResolutionToken,
    pub outcome: Result<ResolvedLockers, LookupError>,
}
