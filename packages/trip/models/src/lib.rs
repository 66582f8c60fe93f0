#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trip record types for the trips map.
//!
//! These types mirror the TOML schema of an uploaded travel log: a list of
//! trips, each visiting one or more countries, each of which lists the
//! cities seen there. Derived views (visited city index, summary stats,
//! table rows) live here too so that both the server and the CLI can
//! serialize them without depending on the aggregation code.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label of the filter option that selects trips without recorded
/// companions.
pub const NO_COMPANION_LABEL: &str = "(none)";

/// A visited city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// City name, used as part of the geocoding query.
    pub name: String,
}

/// A visited country and the cities seen there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Country name. Must match `properties.name` of a feature in the
    /// country outline dataset.
    pub name: String,
    /// Cities visited in this country. May be empty.
    pub cities: Vec<City>,
}

/// One logged journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Year the trip took place.
    pub year: i64,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// People who came along. `None` means nobody was recorded, which is
    /// distinct from an explicitly empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_companions: Option<Vec<String>>,
    /// Countries visited, in the order they were logged.
    pub countries: Vec<Country>,
}

/// A parsed trips file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSet {
    /// All trips in file order.
    pub trips: Vec<Trip>,
}

impl TripSet {
    /// Number of trips in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the set holds no trips.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Inclusive range of years covered by a trip set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    /// Earliest trip year.
    pub min: i64,
    /// Latest trip year.
    pub max: i64,
}

impl YearBounds {
    /// Whether `year` falls within the bounds.
    #[must_use]
    pub const fn contains(&self, year: i64) -> bool {
        year >= self.min && year <= self.max
    }
}

/// One entry of the companion filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompanionOption {
    /// Matches trips that have no companions recorded.
    NoCompanion,
    /// Matches trips that list this companion.
    Named(String),
}

impl fmt::Display for CompanionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCompanion => f.write_str(NO_COMPANION_LABEL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<String> for CompanionOption {
    fn from(value: String) -> Self {
        if value == NO_COMPANION_LABEL {
            Self::NoCompanion
        } else {
            Self::Named(value)
        }
    }
}

impl From<&str> for CompanionOption {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CompanionOption> for String {
    fn from(value: CompanionOption) -> Self {
        match value {
            CompanionOption::NoCompanion => NO_COMPANION_LABEL.to_string(),
            CompanionOption::Named(name) => name,
        }
    }
}

/// The user's current filter selection.
///
/// `None` fields mean the corresponding filter is switched off. A
/// `Some(vec![])` companion selection is switched on with nothing
/// selected, which matches no trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFilter {
    /// Keep only trips from this year.
    pub year: Option<i64>,
    /// Keep only trips matching at least one of these options.
    pub companions: Option<Vec<CompanionOption>>,
}

/// Visited cities grouped by country name.
///
/// Keys are country names, values the distinct city names seen in that
/// country. Both levels are ordered, so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitedCityIndex(BTreeMap<String, BTreeSet<String>>);

impl VisitedCityIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Registers a country with no cities (yet).
    pub fn add_country(&mut self, country: &str) -> &mut BTreeSet<String> {
        self.0.entry(country.to_string()).or_default()
    }

    /// Registers a city under its country.
    pub fn add_city(&mut self, country: &str, city: &str) {
        self.add_country(country).insert(city.to_string());
    }

    /// Cities visited in `country`, if it was visited at all.
    #[must_use]
    pub fn cities(&self, country: &str) -> Option<&BTreeSet<String>> {
        self.0.get(country)
    }

    /// Visited country names in sorted order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates `(country, cities)` pairs in sorted country order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of visited countries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no country was visited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct `(country, city)` entries.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }
}

/// Cities seen in one country, as shown in the stats table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryCities {
    /// Country name.
    pub country: String,
    /// Sorted city names.
    pub cities: Vec<String>,
}

/// Summary statistics over a visited city index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    /// Number of distinct countries.
    pub num_visited_countries: usize,
    /// Number of distinct cities, counted per country.
    pub num_visited_cities: usize,
    /// Sorted country names.
    pub visited_countries: Vec<String>,
    /// Sorted `(country, cities)` rows.
    pub visited_cities: Vec<CountryCities>,
}

/// One row of the trips table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRow {
    /// Trip year as display text.
    pub year: String,
    /// Countries in logged order.
    pub countries: Vec<String>,
    /// All cities of the trip, flattened across countries.
    pub cities: Vec<String>,
    /// Companions, if any were recorded.
    pub travel_companions: Option<Vec<String>>,
    /// Description, if any.
    pub description: Option<String>,
}
