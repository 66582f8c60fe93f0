//! Year and travel companion filters.
//!
//! Every filter takes a slice and returns a new `Vec` in input order, so
//! filters compose by applying one to the output of another.

use std::collections::BTreeSet;

use trips_map_trip_models::{CompanionOption, Trip, TripFilter, YearBounds};

/// Range of years the year filter can select from.
///
/// Returns `None` for an empty trip list, in which case the year filter
/// has nothing to offer.
#[must_use]
pub fn year_bounds(trips: &[Trip]) -> Option<YearBounds> {
    let min = trips.iter().map(|t| t.year).min()?;
    let max = trips.iter().map(|t| t.year).max()?;
    Some(YearBounds { min, max })
}

/// Keeps the trips taken in `year`.
#[must_use]
pub fn filter_by_year(trips: &[Trip], year: i64) -> Vec<Trip> {
    trips.iter().filter(|t| t.year == year).cloned().collect()
}

/// Options for the companion filter.
///
/// All companions across all trips in sorted order, preceded by
/// [`CompanionOption::NoCompanion`] when at least one trip has no
/// companions recorded.
#[must_use]
pub fn companion_options(trips: &[Trip]) -> Vec<CompanionOption> {
    let names: BTreeSet<&str> = trips
        .iter()
        .filter_map(|t| t.travel_companions.as_deref())
        .flatten()
        .map(String::as_str)
        .collect();

    let mut options = Vec::with_capacity(names.len() + 1);

    if trips.iter().any(|t| t.travel_companions.is_none()) {
        options.push(CompanionOption::NoCompanion);
    }

    options.extend(names.into_iter().map(|n| CompanionOption::Named(n.to_string())));
    options
}

/// Keeps the trips matching at least one selected companion option.
///
/// A trip without recorded companions matches [`CompanionOption::NoCompanion`];
/// a trip with companions matches when any of them is selected. An empty
/// selection matches nothing.
#[must_use]
pub fn filter_by_companions(trips: &[Trip], selected: &[CompanionOption]) -> Vec<Trip> {
    let include_unaccompanied = selected.contains(&CompanionOption::NoCompanion);
    let names: BTreeSet<&str> = selected
        .iter()
        .filter_map(|option| match option {
            CompanionOption::Named(name) => Some(name.as_str()),
            CompanionOption::NoCompanion => None,
        })
        .collect();

    trips
        .iter()
        .filter(|trip| match &trip.travel_companions {
            None => include_unaccompanied,
            Some(companions) => companions.iter().any(|c| names.contains(c.as_str())),
        })
        .cloned()
        .collect()
}

/// Applies every enabled filter of `filter` in turn.
#[must_use]
pub fn apply(trips: &[Trip], filter: &TripFilter) -> Vec<Trip> {
    let mut filtered = trips.to_vec();

    if let Some(year) = filter.year {
        filtered = filter_by_year(&filtered, year);
    }

    if let Some(selected) = &filter.companions {
        filtered = filter_by_companions(&filtered, selected);
    }

    log::debug!(
        "Filter {filter:?} kept {} of {} trips",
        filtered.len(),
        trips.len()
    );

    filtered
}
