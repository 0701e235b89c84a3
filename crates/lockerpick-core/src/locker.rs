//! Locker lookup wire types and the locker snapshot itself.

use serde::{Deserialize, Serialize};

use crate::shipping::{ShippingAddress, ShippingOption, StoreConfig};

/// A pickup locker as returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locker {
    /// Unique within a single lookup response.
    pub id: String,
    #[serde(rename = "addressText")]
    pub address_text: String,
    pub lat: f64,
    pub long: f64,
}

impl Locker {
    #[must_use]
    pub fn position(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.long,
        }
    }
}

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = String;

    /// Parses `"lat,lng"`, e.g. `"-1.2884,36.8233"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lng\", got \"{s}\""))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid latitude: {e}"))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid longitude: {e}"))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("coordinate out of range: {lat},{lng}"));
        }
        Ok(Self { lat, lng })
    }
}

/// Body of `POST /api/shipping/lockers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerLookupRequest {
    pub store_hash: String,
    pub courier: String,
    pub city: String,
    pub county: String,
    pub country_code: String,
}

impl LockerLookupRequest {
    /// Builds the lookup for a locker-type option.
    ///
    /// Returns `None` when the option's service token is not `lockers`.
    #[must_use]
    pub fn for_option(
        option: &ShippingOption,
        address: &ShippingAddress,
        store: &StoreConfig,
    ) -> Option<Self> {
        if !option.is_locker_service() {
            return None;
        }
        let courier = option.courier()?;
        Some(Self {
            store_hash: store.store_hash.clone(),
            courier: courier.to_string(),
            city: address.city.clone(),
            county: address.state_or_province.clone(),
            country_code: address.country_code.clone(),
        })
    }
}

/// Successful lookup payload.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct LockerLookupResponse {
    /// Credential for the map provider. Passed through opaquely.
    #[serde(rename = "google_maps_api_key", alias = "api_key")]
    pub map_api_key: String,
    pub lockers: Vec<Locker>,
}

impl std::fmt::Debug for LockerLookupResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockerLookupResponse")
            .field("map_api_key", &"[redacted]")
            .field("lockers", &self.lockers)
            .finish()
    }
}
