use std::path::PathBuf;

use crate::locker::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub store_hash: String,
    pub env: Environment,
    pub log_level: String,
    pub locator_base_url: String,
    pub geocoder_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub selection_path: PathBuf,
    /// Map center used when the shipping address cannot be geocoded.
    pub default_center: Coordinate,
    pub map_zoom: u8,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store_hash", &"[redacted]")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("locator_base_url", &self.locator_base_url)
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("selection_path", &self.selection_path)
            .field("default_center", &self.default_center)
            .field("map_zoom", &self.map_zoom)
            .finish()
    }
}
