#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the trips map server.
//!
//! These types are serialized to JSON for the REST API. The map view
//! itself is served as the render crate's `MapView`; this crate only
//! holds the envelope types around it.

use serde::{Deserialize, Serialize};
use trips_map_trip_models::{CompanionOption, TripFilter, YearBounds};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Response to a trips file upload: what the filters can offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUploadSummary {
    /// Number of trips in the file.
    pub trip_count: usize,
    /// Range for the year slider; `null` when the file has no trips.
    pub year_bounds: Option<YearBounds>,
    /// Options for the companion multiselect.
    pub companion_options: Vec<CompanionOption>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description.
    pub error: String,
}

impl ApiError {
    /// Wraps any displayable error.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Query parameters for the map endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// Keep only trips from this year.
    pub year: Option<i64>,
    /// Comma-separated companion options; `(none)` selects trips without
    /// companions. Present but empty selects nothing. Names are split on
    /// every comma, so a companion whose name contains a comma can't be
    /// selected through this parameter.
    pub companions: Option<String>,
}

impl MapQueryParams {
    /// Converts the query into a trip filter.
    #[must_use]
    pub fn to_filter(&self) -> TripFilter {
        TripFilter {
            year: self.year,
            companions: self.companions.as_deref().map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(CompanionOption::from)
                    .collect()
            }),
        }
    }
}
