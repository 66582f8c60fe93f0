#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trips file parsing, filtering, and aggregation.
//!
//! The pipeline between an uploaded trips file and the map:
//!
//! 1. [`parse`] turns TOML text into a validated [`TripSet`].
//! 2. [`filter`] narrows the trips by year and travel companion.
//! 3. [`aggregate`] groups the visited cities by country.
//! 4. [`stats`] reduces the grouping to counts and table rows.
//!
//! [`TripSet`]: trips_map_trip_models::TripSet

pub mod aggregate;
pub mod filter;
pub mod parse;
pub mod stats;

use thiserror::Error;

/// Errors from reading a trips file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The payload is not valid TOML or does not match the trips schema.
    #[error("Error parsing TOML file: {0}")]
    Toml(#[from] toml::de::Error),

    /// The payload matches the schema but breaks a validation rule.
    #[error("Invalid trips file: {message}")]
    Invalid {
        /// Description of the violation.
        message: String,
    },
}
