//! Checkout-side inputs: shipping options, the shipping address and the store.

use serde::{Deserialize, Serialize};

/// Service token that marks a shipping option as requiring a locker pick.
pub const LOCKER_SERVICE_TOKEN: &str = "lockers";

/// A shipping method offered by the external catalog.
///
/// `description` carries a courier token and a service token separated by
/// whitespace, e.g. `"DHL Lockers"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: String,
    pub description: String,
}

impl ShippingOption {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }

    /// First whitespace-separated token of the description.
    #[must_use]
    pub fn courier(&self) -> Option<&str> {
        self.description.split_whitespace().next()
    }

    /// Second whitespace-separated token of the description.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.description.split_whitespace().nth(1)
    }

    /// Whether the service token equals `lockers`, ignoring ASCII case.
    #[must_use]
    pub fn is_locker_service(&self) -> bool {
        self.service()
            .is_some_and(|s| s.eq_ignore_ascii_case(LOCKER_SERVICE_TOKEN))
    }
}

/// Shipping address captured by the checkout flow. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub country_code: String,
    pub city: String,
    pub state_or_province: String,
    pub address1: String,
    pub address2: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// Single-line postal address suitable for forward geocoding.
    ///
    /// Empty parts are skipped so a sparse address does not produce
    /// dangling separators.
    #[must_use]
    pub fn to_address_text(&self) -> String {
        [
            self.address1.as_str(),
            self.address2.as_str(),
            self.city.as_str(),
            self.state_or_province.as_str(),
            self.postal_code.as_str(),
            self.country_code.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Tenant scope for locker lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub store_hash: String,
}
