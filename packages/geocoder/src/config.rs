//! Geocoder configuration.
//!
//! Service defaults are defined in `services/nominatim.toml`, embedded at
//! compile time. The environment supplies the mandatory user agent and
//! may override the endpoint and the request spacing.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the Nominatim user agent.
pub const USER_AGENT_ENV_VAR: &str = "NOMINATIM_USER_AGENT";
/// Environment variable overriding the search endpoint.
pub const BASE_URL_ENV_VAR: &str = "NOMINATIM_BASE_URL";
/// Environment variable overriding the minimum delay between requests.
pub const RATE_LIMIT_ENV_VAR: &str = "NOMINATIM_RATE_LIMIT_MS";

const SERVICE_TOML: &str = include_str!("../services/nominatim.toml");

/// Errors from reading geocoder configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("Please set the {var} environment variable.")]
    Missing {
        /// Name of the environment variable.
        var: &'static str,
    },

    /// A setting has a value that cannot be used.
    #[error("Invalid value for {var}: {value:?}")]
    Invalid {
        /// Name of the environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// A geocoding service definition loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint URL.
    pub base_url: String,
    /// Minimum delay between requests in milliseconds.
    pub rate_limit_ms: u64,
}

/// Returns the embedded Nominatim service definition.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the config is embedded).
#[must_use]
pub fn default_service() -> GeocodingService {
    toml::de::from_str(SERVICE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse geocoding service 'nominatim': {e}"))
}

/// Settings needed to build a [`crate::nominatim::NominatimGeocoder`] and
/// a [`crate::resolver::CoordinateResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    /// User agent identifying this client to the provider.
    pub user_agent: String,
    /// Search endpoint URL.
    pub base_url: String,
    /// Minimum spacing between provider requests.
    pub rate_limit: Duration,
}

impl GeocoderConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `NOMINATIM_USER_AGENT` is unset
    /// or blank, and [`ConfigError::Invalid`] if the rate limit override
    /// is not a whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let service = default_service();

        let user_agent = lookup(USER_AGENT_ENV_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing {
                var: USER_AGENT_ENV_VAR,
            })?;

        let base_url = lookup(BASE_URL_ENV_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(service.base_url);

        let rate_limit_ms = match lookup(RATE_LIMIT_ENV_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid {
                    var: RATE_LIMIT_ENV_VAR,
                    value,
                })?,
            None => service.rate_limit_ms,
        };

        log::debug!(
            "Geocoding via {} at {base_url} (min {rate_limit_ms}ms between requests)",
            service.name
        );

        Ok(Self {
            user_agent,
            base_url,
            rate_limit: Duration::from_millis(rate_limit_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn embedded_service_is_valid() {
        let service = default_service();
        assert_eq!(service.id, "nominatim");
        assert!(!service.name.is_empty());
        assert!(service.base_url.starts_with("https://"));
        assert!(service.rate_limit_ms >= 1000);
    }

    #[test]
    fn missing_user_agent_is_an_error() {
        let err = GeocoderConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { var } if var == USER_AGENT_ENV_VAR));
        assert!(err.to_string().contains(USER_AGENT_ENV_VAR));
    }

    #[test]
    fn blank_user_agent_is_an_error() {
        let result = GeocoderConfig::from_lookup(lookup(&[(USER_AGENT_ENV_VAR, "  ")]));
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn defaults_come_from_service_definition() {
        let config =
            GeocoderConfig::from_lookup(lookup(&[(USER_AGENT_ENV_VAR, "trips_map_test")]))
                .unwrap();
        let service = default_service();
        assert_eq!(config.user_agent, "trips_map_test");
        assert_eq!(config.base_url, service.base_url);
        assert_eq!(
            config.rate_limit,
            Duration::from_millis(service.rate_limit_ms)
        );
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = GeocoderConfig::from_lookup(lookup(&[
            (USER_AGENT_ENV_VAR, "trips_map_test"),
            (BASE_URL_ENV_VAR, "http://localhost:8088/search"),
            (RATE_LIMIT_ENV_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8088/search");
        assert_eq!(config.rate_limit, Duration::ZERO);
    }

    #[test]
    fn rejects_non_numeric_rate_limit() {
        let result = GeocoderConfig::from_lookup(lookup(&[
            (USER_AGENT_ENV_VAR, "trips_map_test"),
            (RATE_LIMIT_ENV_VAR, "fast"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
