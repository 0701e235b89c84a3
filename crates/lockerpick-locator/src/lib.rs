//! HTTP clients for locker lookup and address geocoding.

pub mod client;
pub mod error;
pub mod geocode;

mod retry;
mod types;

pub use client::{LockerLocator, LocatorClient};
pub use error::{GeocodeError, LookupError};
pub use geocode::{AddressResolver, GeocodingClient};
