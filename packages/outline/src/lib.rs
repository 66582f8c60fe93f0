#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Country outline loading and matching.
//!
//! Loads a reference `GeoJSON` `FeatureCollection` of country borders once
//! at startup and picks out the outlines of the countries named in a trips
//! file. Features are joined on their `properties.name` value by exact
//! string match.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trips_map_trip_models::Trip;

/// Property holding the country name in the reference dataset.
pub const NAME_PROPERTY: &str = "name";

/// Errors from loading or matching country outlines.
#[derive(Debug, Error)]
pub enum OutlineError {
    /// A trip names a country that has no outline.
    #[error("Couldn't find outline for country \"{country}\".")]
    UnresolvedCountry {
        /// The country name as written in the trips file.
        country: String,
    },

    /// Reading the outline asset failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The asset is valid `GeoJSON` but not a feature collection.
    #[error("Invalid outline asset: {message}")]
    Invalid {
        /// Description of the problem.
        message: String,
    },
}

/// Geographic extent of a set of outlines, in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    /// Westernmost longitude.
    pub west: f64,
    /// Southernmost latitude.
    pub south: f64,
    /// Easternmost longitude.
    pub east: f64,
    /// Northernmost latitude.
    pub north: f64,
}

impl MapBounds {
    fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }
}

/// Reference country outlines keyed by country name.
///
/// Constructed once per process and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct CountryOutlines {
    features: BTreeMap<String, Feature>,
}

impl CountryOutlines {
    /// Loads outlines from a `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError`] if the file cannot be read or is not a
    /// `GeoJSON` feature collection.
    pub fn load(path: &Path) -> Result<Self, OutlineError> {
        log::info!("Loading country outlines from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&text)
    }

    /// Parses outlines from `GeoJSON` text.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError`] if the text is not a `GeoJSON` feature
    /// collection.
    pub fn from_geojson_str(text: &str) -> Result<Self, OutlineError> {
        match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => Ok(Self::from_feature_collection(collection)),
            GeoJson::Feature(_) => Err(OutlineError::Invalid {
                message: "expected a FeatureCollection, found a single Feature".to_string(),
            }),
            GeoJson::Geometry(_) => Err(OutlineError::Invalid {
                message: "expected a FeatureCollection, found a bare Geometry".to_string(),
            }),
        }
    }

    /// Indexes the features of `collection` by their name property.
    ///
    /// Features without a string name are skipped. When two features
    /// share a name the first one wins.
    #[must_use]
    pub fn from_feature_collection(collection: FeatureCollection) -> Self {
        let mut features = BTreeMap::new();

        for feature in collection.features {
            let Some(name) = feature_name(&feature) else {
                log::warn!(
                    "Skipping outline feature {:?} without a \"{NAME_PROPERTY}\" property",
                    feature.id
                );
                continue;
            };

            if features.contains_key(&name) {
                log::warn!("Duplicate outline for country \"{name}\", keeping the first");
                continue;
            }

            features.insert(name, feature);
        }

        log::info!("Loaded {} country outlines", features.len());

        Self { features }
    }

    /// Number of named outlines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether no outline was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Whether an outline exists for `country`.
    #[must_use]
    pub fn contains(&self, country: &str) -> bool {
        self.features.contains_key(country)
    }

    /// The outline feature for `country`.
    #[must_use]
    pub fn get(&self, country: &str) -> Option<&Feature> {
        self.features.get(country)
    }

    /// Outlines of every country visited in `trips`.
    ///
    /// Pass the full trip set, not a filtered view: the map always shows
    /// every country in the file. Each visited country appears exactly
    /// once, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`OutlineError::UnresolvedCountry`] for the first visited
    /// country (in name order) that has no outline.
    pub fn resolve_visited(&self, trips: &[Trip]) -> Result<FeatureCollection, OutlineError> {
        let visited: BTreeSet<&str> = trips
            .iter()
            .flat_map(|t| t.countries.iter().map(|c| c.name.as_str()))
            .collect();

        let features = visited
            .into_iter()
            .map(|name| {
                self.features
                    .get(name)
                    .cloned()
                    .ok_or_else(|| OutlineError::UnresolvedCountry {
                        country: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Resolved {} visited country outlines", features.len());

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }
}

/// Extent covering every geometry in `collection`.
///
/// Returns `None` when the collection has no convertible geometry.
#[must_use]
pub fn bounds(collection: &FeatureCollection) -> Option<MapBounds> {
    collection
        .features
        .iter()
        .filter_map(feature_bounds)
        .reduce(MapBounds::union)
}

fn feature_bounds(feature: &Feature) -> Option<MapBounds> {
    let geometry: geo::Geometry<f64> = feature.geometry.clone()?.try_into().ok()?;
    let rect = geometry.bounding_rect()?;

    Some(MapBounds {
        west: rect.min().x,
        south: rect.min().y,
        east: rect.max().x,
        north: rect.max().y,
    })
}

fn feature_name(feature: &Feature) -> Option<String> {
    feature
        .property(NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trips_map_trip_models::{City, Country};

    const SAMPLE: &str = include_str!("../fixtures/countries_sample.geo.json");

    fn outlines() -> CountryOutlines {
        CountryOutlines::from_geojson_str(SAMPLE).unwrap()
    }

    fn trip(countries: &[&str]) -> Trip {
        Trip {
            year: 2020,
            description: None,
            travel_companions: None,
            countries: countries
                .iter()
                .map(|name| Country {
                    name: (*name).to_string(),
                    cities: vec![City {
                        name: "Somewhere".to_string(),
                    }],
                })
                .collect(),
        }
    }

    fn names(collection: &FeatureCollection) -> Vec<String> {
        collection
            .features
            .iter()
            .filter_map(feature_name)
            .collect()
    }

    #[test]
    fn indexes_named_features_only() {
        let outlines = outlines();
        assert_eq!(outlines.len(), 3);
        assert!(outlines.contains("France"));
        assert!(outlines.contains("Italy"));
        assert!(!outlines.contains("Unnamed territory"));
    }

    #[test]
    fn resolves_each_country_once() {
        let trips = vec![
            trip(&["France", "Spain"]),
            trip(&["Spain"]),
            trip(&["France", "France"]),
        ];
        let resolved = outlines().resolve_visited(&trips).unwrap();
        assert_eq!(names(&resolved), vec!["France", "Spain"]);
    }

    #[test]
    fn unknown_country_is_an_error() {
        let trips = vec![trip(&["France"]), trip(&["Atlantis"])];
        let err = outlines().resolve_visited(&trips).unwrap_err();
        assert!(
            matches!(&err, OutlineError::UnresolvedCountry { country } if country == "Atlantis")
        );
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let err = outlines().resolve_visited(&[trip(&["france"])]).unwrap_err();
        assert!(matches!(err, OutlineError::UnresolvedCountry { .. }));
    }

    #[test]
    fn no_trips_resolve_to_empty_collection() {
        let resolved = outlines().resolve_visited(&[]).unwrap();
        assert!(resolved.features.is_empty());
        assert_eq!(bounds(&resolved), None);
    }

    #[test]
    fn duplicate_names_keep_first_feature() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":"a","properties":{"name":"X"},"geometry":null},
            {"type":"Feature","id":"b","properties":{"name":"X"},"geometry":null}
        ]}"#;
        let outlines = CountryOutlines::from_geojson_str(text).unwrap();
        assert_eq!(outlines.len(), 1);
        assert_eq!(
            outlines.get("X").unwrap().id,
            Some(geojson::feature::Id::String("a".to_string()))
        );
    }

    #[test]
    fn rejects_non_collection_geojson() {
        let text = r#"{"type":"Point","coordinates":[1.0,2.0]}"#;
        assert!(matches!(
            CountryOutlines::from_geojson_str(text),
            Err(OutlineError::Invalid { .. })
        ));
        assert!(CountryOutlines::from_geojson_str("not json").is_err());
    }

    #[test]
    fn bounds_cover_polygons_and_multipolygons() {
        let resolved = outlines()
            .resolve_visited(&[trip(&["France", "Spain"])])
            .unwrap();
        let b = bounds(&resolved).unwrap();
        assert!((b.west - -9.4).abs() < 1e-9);
        assert!((b.south - 36.0).abs() < 1e-9);
        assert!((b.east - 8.2).abs() < 1e-9);
        assert!((b.north - 51.1).abs() < 1e-9);
    }
}
