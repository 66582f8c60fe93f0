//! The trips file currently loaded by a user.

use trips_map_trip::filter;
use trips_map_trip::parse::parse_trips;
use trips_map_trip_models::{CompanionOption, Trip, TripSet, YearBounds};

use crate::RenderError;

/// A parsed trips file plus the filter choices it offers.
///
/// Replaced wholesale whenever a new file is uploaded.
#[derive(Debug, Clone, Default)]
pub struct TripSession {
    trip_set: TripSet,
}

impl TripSession {
    /// Parses a trips file into a new session.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Parse`] if the file is malformed.
    pub fn from_toml(text: &str) -> Result<Self, RenderError> {
        let trip_set = parse_trips(text)?;
        log::info!("Loaded trips file with {} trips", trip_set.len());
        Ok(Self { trip_set })
    }

    /// All trips of the file, unfiltered.
    #[must_use]
    pub fn trips(&self) -> &[Trip] {
        &self.trip_set.trips
    }

    /// Range the year filter can select from; `None` for an empty file.
    #[must_use]
    pub fn year_bounds(&self) -> Option<YearBounds> {
        filter::year_bounds(self.trips())
    }

    /// Options for the companion filter.
    #[must_use]
    pub fn companion_options(&self) -> Vec<CompanionOption> {
        filter::companion_options(self.trips())
    }
}
