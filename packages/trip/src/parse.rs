//! Trips file parser.
//!
//! A trips file is TOML with one `[[trips]]` table per journey:
//!
//! ```toml
//! [[trips]]
//! year = 2020
//! description = "Spring break"
//! travel_companions = ["Alice"]
//!
//! [[trips.countries]]
//! name = "France"
//!
//! [[trips.countries.cities]]
//! name = "Paris"
//! ```
//!
//! Structural problems (missing keys, wrong types) are reported by the
//! TOML deserializer; blank names are caught by an extra validation pass
//! since they could never be matched against outlines or the geocoder.
//! A companion may not be named `(none)`, which is reserved for the
//! "no companions" filter option.

use trips_map_trip_models::{NO_COMPANION_LABEL, Trip, TripSet};

use crate::ParseError;

/// Parses and validates a trips file.
///
/// Either the whole file is accepted or nothing is returned.
///
/// # Errors
///
/// Returns [`ParseError::Toml`] if the text is not valid TOML or does not
/// match the trips schema, and [`ParseError::Invalid`] if a country or
/// city name is blank.
pub fn parse_trips(text: &str) -> Result<TripSet, ParseError> {
    let trip_set: TripSet = toml::from_str(text)?;
    validate(&trip_set)?;

    log::debug!("Parsed trips file with {} trips", trip_set.len());

    Ok(trip_set)
}

fn validate(trip_set: &TripSet) -> Result<(), ParseError> {
    for (trip_idx, trip) in trip_set.trips.iter().enumerate() {
        validate_trip(trip_idx + 1, trip)?;
    }
    Ok(())
}

fn validate_trip(position: usize, trip: &Trip) -> Result<(), ParseError> {
    if trip
        .travel_companions
        .iter()
        .flatten()
        .any(|c| c == NO_COMPANION_LABEL)
    {
        return Err(ParseError::Invalid {
            message: format!(
                "trip #{position} ({}): \"{NO_COMPANION_LABEL}\" is reserved and can't be used as a companion name",
                trip.year
            ),
        });
    }

    for (country_idx, country) in trip.countries.iter().enumerate() {
        if country.name.trim().is_empty() {
            return Err(ParseError::Invalid {
                message: format!(
                    "trip #{position} ({}): country #{} has an empty name",
                    trip.year,
                    country_idx + 1
                ),
            });
        }

        for (city_idx, city) in country.cities.iter().enumerate() {
            if city.name.trim().is_empty() {
                return Err(ParseError::Invalid {
                    message: format!(
                        "trip #{position} ({}): city #{} in \"{}\" has an empty name",
                        trip.year,
                        city_idx + 1,
                        country.name
                    ),
                });
            }
        }
    }

    Ok(())
}
