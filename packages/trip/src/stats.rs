//! Summary statistics and table projections.

use trips_map_trip_models::{CountryCities, Trip, TripRow, TripStats, VisitedCityIndex};

/// Reduces a visited city index to counts and sorted tables.
///
/// Cities are counted per country, so two different cities that share a
/// name in different countries count twice.
#[must_use]
pub fn summarize(index: &VisitedCityIndex) -> TripStats {
    TripStats {
        num_visited_countries: index.len(),
        num_visited_cities: index.city_count(),
        visited_countries: index.countries().map(ToString::to_string).collect(),
        visited_cities: index
            .iter()
            .map(|(country, cities)| CountryCities {
                country: country.to_string(),
                cities: cities.iter().cloned().collect(),
            })
            .collect(),
    }
}

/// Projects trips into table rows, one per trip, in input order.
#[must_use]
pub fn trip_rows(trips: &[Trip]) -> Vec<TripRow> {
    trips
        .iter()
        .map(|trip| TripRow {
            year: trip.year.to_string(),
            countries: trip.countries.iter().map(|c| c.name.clone()).collect(),
            cities: trip
                .countries
                .iter()
                .flat_map(|c| c.cities.iter().map(|city| city.name.clone()))
                .collect(),
            travel_companions: trip.travel_companions.clone(),
            description: trip.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::group_cities_by_country;
    use crate::filter::filter_by_year;
    use crate::fixtures::{country, trip};

    #[test]
    fn summarizes_example_index() {
        let mut index = VisitedCityIndex::new();
        index.add_city("Spain", "Madrid");
        index.add_city("France", "Paris");
        index.add_city("France", "Lyon");

        let stats = summarize(&index);
        assert_eq!(stats.num_visited_countries, 2);
        assert_eq!(stats.num_visited_cities, 3);
        assert_eq!(stats.visited_countries, vec!["France", "Spain"]);
        assert_eq!(
            stats.visited_cities,
            vec![
                CountryCities {
                    country: "France".to_string(),
                    cities: vec!["Lyon".to_string(), "Paris".to_string()],
                },
                CountryCities {
                    country: "Spain".to_string(),
                    cities: vec!["Madrid".to_string()],
                },
            ]
        );
    }

    #[test]
    fn empty_index_yields_zero_counts() {
        assert_eq!(summarize(&VisitedCityIndex::new()), TripStats::default());
    }

    #[test]
    fn two_trip_scenario() {
        let trips = vec![
            trip(2020, None, vec![country("France", &["Paris"])]),
            trip(2021, Some(&["Alice"]), vec![country("Spain", &["Madrid"])]),
        ];

        let only_2020 = filter_by_year(&trips, 2020);
        assert_eq!(only_2020, vec![trips[0].clone()]);

        let stats = summarize(&group_cities_by_country(&trips));
        assert_eq!(stats.num_visited_countries, 2);
        assert_eq!(stats.num_visited_cities, 2);
    }

    #[test]
    fn trip_rows_flatten_cities() {
        let mut t = trip(
            2019,
            Some(&["Bob"]),
            vec![
                country("Spain", &["Madrid", "Seville"]),
                country("Portugal", &["Lisbon"]),
            ],
        );
        t.description = Some("Iberia".to_string());

        let rows = trip_rows(&[t]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, "2019");
        assert_eq!(rows[0].countries, vec!["Spain", "Portugal"]);
        assert_eq!(rows[0].cities, vec!["Madrid", "Seville", "Lisbon"]);
        assert_eq!(rows[0].travel_companions, Some(vec!["Bob".to_string()]));
        assert_eq!(rows[0].description.as_deref(), Some("Iberia"));
    }
}
