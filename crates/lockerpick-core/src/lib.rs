//! Shared domain types and configuration for the locker pickup workflow.

pub mod app_config;
pub mod config;
pub mod error;
pub mod locker;
pub mod shipping;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_USER_AGENT};
pub use error::ConfigError;
pub use locker::{Coordinate, Locker, LockerLookupRequest, LockerLookupResponse};
pub use shipping::{ShippingAddress, ShippingOption, StoreConfig, LOCKER_SERVICE_TOKEN};
