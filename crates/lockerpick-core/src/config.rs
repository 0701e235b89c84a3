use crate::app_config::{AppConfig, Environment};
use crate::locker::Coordinate;
use crate::ConfigError;

/// `User-Agent` sent by the HTTP clients unless `LOCKERPICK_USER_AGENT` overrides it.
pub const DEFAULT_USER_AGENT: &str = "lockerpick/0.1 (checkout-lockers)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u8>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_coordinate = |var: &str, default: &str| -> Result<Coordinate, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<Coordinate>()
            .map_err(|reason| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason,
            })
    };

    let store_hash = require("LOCKERPICK_STORE_HASH")?;

    let env = parse_environment(&or_default("LOCKERPICK_ENV", "development"))?;
    let log_level = or_default("LOCKERPICK_LOG_LEVEL", "info");

    let locator_base_url = or_default("LOCKERPICK_LOCATOR_BASE_URL", "http://localhost:3000");
    let geocoder_base_url =
        or_default("LOCKERPICK_GEOCODER_BASE_URL", "https://maps.googleapis.com");
    let request_timeout_secs = parse_u64("LOCKERPICK_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LOCKERPICK_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("LOCKERPICK_MAX_RETRIES", "1")?;
    let retry_backoff_base_ms = parse_u64("LOCKERPICK_RETRY_BACKOFF_BASE_MS", "250")?;

    let selection_path = PathBuf::from(or_default(
        "LOCKERPICK_SELECTION_PATH",
        "./.lockerpick/selection.json",
    ));
    let default_center = parse_coordinate("LOCKERPICK_DEFAULT_CENTER", "-1.2884,36.8233")?;
    let map_zoom = parse_u8("LOCKERPICK_MAP_ZOOM", "14")?;

    Ok(AppConfig {
        store_hash,
        env,
        log_level,
        locator_base_url,
        geocoder_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        selection_path,
        default_center,
        map_zoom,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOCKERPICK_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("LOCKERPICK_STORE_HASH", "S1");
        m
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(
            parse_environment("development").unwrap(),
            Environment::Development
        );
        assert_eq!(parse_environment("test").unwrap(), Environment::Test);
        assert_eq!(
            parse_environment("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn parse_environment_unknown_fails() {
        let err = parse_environment("staging").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "LOCKERPICK_ENV"));
    }

    #[test]
    fn build_app_config_fails_without_store_hash() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "LOCKERPICK_STORE_HASH"),
            "expected MissingEnvVar(LOCKERPICK_STORE_HASH), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_treats_blank_store_hash_as_missing() {
        let mut map = full_env();
        map.insert("LOCKERPICK_STORE_HASH", "   ");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.store_hash, "S1");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.locator_base_url, "http://localhost:3000");
        assert_eq!(cfg.geocoder_base_url, "https://maps.googleapis.com");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "lockerpick/0.1 (checkout-lockers)");
        assert_eq!(cfg.max_retries, 1);
        assert_eq!(cfg.retry_backoff_base_ms, 250);
        assert_eq!(
            cfg.selection_path.to_string_lossy(),
            "./.lockerpick/selection.json"
        );
        assert_eq!(
            cfg.default_center,
            Coordinate {
                lat: -1.2884,
                lng: 36.8233
            }
        );
        assert_eq!(cfg.map_zoom, 14);
    }

    #[test]
    fn request_timeout_override() {
        let mut map = full_env();
        map.insert("LOCKERPICK_REQUEST_TIMEOUT_SECS", "5");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 5);
    }

    #[test]
    fn request_timeout_invalid() {
        let mut map = full_env();
        map.insert("LOCKERPICK_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCKERPICK_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(LOCKERPICK_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn max_retries_invalid() {
        let mut map = full_env();
        map.insert("LOCKERPICK_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCKERPICK_MAX_RETRIES")
        );
    }

    #[test]
    fn default_center_override() {
        let mut map = full_env();
        map.insert("LOCKERPICK_DEFAULT_CENTER", "44.4268,26.1025");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.default_center,
            Coordinate {
                lat: 44.4268,
                lng: 26.1025
            }
        );
    }

    #[test]
    fn default_center_invalid() {
        let mut map = full_env();
        map.insert("LOCKERPICK_DEFAULT_CENTER", "somewhere");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCKERPICK_DEFAULT_CENTER")
        );
    }

    #[test]
    fn map_zoom_out_of_range_fails() {
        let mut map = full_env();
        map.insert("LOCKERPICK_MAP_ZOOM", "300");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LOCKERPICK_MAP_ZOOM")
        );
    }

    #[test]
    fn debug_redacts_store_hash() {
        let mut map = full_env();
        map.insert("LOCKERPICK_STORE_HASH", "very-secret-hash");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("very-secret-hash"));
        assert!(rendered.contains("[redacted]"));
    }
}
