#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City geocoding for the trips map.
//!
//! Resolves `(city, country)` name pairs to coordinates through a
//! [`Geocoder`] provider. The production provider is the public
//! Nominatim / `OpenStreetMap` instance ([`nominatim`]), which allows at
//! most one request per second. [`resolver::CoordinateResolver`] wraps a
//! provider with a per-process memo and enforces that spacing, so each
//! distinct pair is looked up at most once.

pub mod config;
pub mod nominatim;
pub mod progress;
pub mod resolver;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point on the map (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A geocoded city ready to be drawn as a map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMarker {
    /// City name, shown as the marker tooltip.
    pub city: String,
    /// Country the city was looked up in.
    pub country: String,
    /// Where to place the marker.
    pub coordinates: Coordinates,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider has no match for the city.
    #[error("Couldn't find coordinates for city \"{city}\".")]
    NotFound {
        /// City name that failed to resolve.
        city: String,
        /// Country the city was looked up in.
        country: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A geocoding provider.
///
/// Implementations perform exactly one upstream lookup per call; caching
/// and rate limiting are the caller's job (see
/// [`resolver::CoordinateResolver`]).
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up `city` in `country`.
    ///
    /// Returns `Ok(None)` when the provider has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn geocode(&self, city: &str, country: &str)
    -> Result<Option<Coordinates>, GeocodeError>;
}
