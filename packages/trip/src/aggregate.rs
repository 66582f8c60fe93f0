//! Groups visited cities by country.

use trips_map_trip_models::{Trip, VisitedCityIndex};

/// Builds the visited city index for `trips`.
///
/// Every country of every trip becomes a key, even when no city was
/// logged for it. Cities are unioned per country name (exact,
/// case-sensitive match), so the result does not depend on trip order.
#[must_use]
pub fn group_cities_by_country(trips: &[Trip]) -> VisitedCityIndex {
    let mut index = VisitedCityIndex::new();

    for trip in trips {
        for country in &trip.countries {
            let cities = index.add_country(&country.name);
            cities.extend(country.cities.iter().map(|c| c.name.clone()));
        }
    }

    index
}
