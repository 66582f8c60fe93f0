#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map view pipeline for the trips map.
//!
//! Runs one interaction end to end: filter the uploaded trips, pick the
//! outlines of every visited country, geocode the cities of the filtered
//! trips, and summarize them. Both the HTTP server and the CLI render
//! through [`render_view`].

pub mod session;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use thiserror::Error;
use trips_map_geocoder::progress::ProgressCallback;
use trips_map_geocoder::resolver::CoordinateResolver;
use trips_map_geocoder::{CityMarker, GeocodeError};
use trips_map_outline::{CountryOutlines, MapBounds, OutlineError};
use trips_map_trip::{ParseError, aggregate, filter, stats};
use trips_map_trip_models::{Trip, TripFilter, TripRow, TripStats};

pub use session::TripSession;

/// Errors that abort a render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The trips file could not be read.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A visited country has no outline.
    #[error(transparent)]
    Outline(#[from] OutlineError),

    /// A visited city could not be geocoded.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Everything the presentation layer needs to draw one view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Outlines of every country in the file, regardless of filters.
    pub outlines: FeatureCollection,
    /// Extent of the outlines, for fitting the initial map view.
    pub bounds: Option<MapBounds>,
    /// One marker per city of the filtered trips.
    pub markers: Vec<CityMarker>,
    /// Table rows for the filtered trips.
    pub trips: Vec<TripRow>,
    /// Summary statistics for the filtered trips.
    pub stats: TripStats,
}

/// Renders the view of `trips` under `trip_filter`.
///
/// Outlines are resolved against the full trip list so that filtering
/// never hides territory; markers, table rows, and statistics follow the
/// filter.
///
/// # Errors
///
/// Returns [`RenderError::Outline`] if a visited country has no outline,
/// or [`RenderError::Geocode`] if a city of the filtered trips cannot be
/// geocoded.
pub async fn render_view(
    trips: &[Trip],
    trip_filter: &TripFilter,
    outlines: &CountryOutlines,
    resolver: &mut CoordinateResolver,
    progress: &dyn ProgressCallback,
) -> Result<MapView, RenderError> {
    let visited_outlines = outlines.resolve_visited(trips)?;
    let bounds = trips_map_outline::bounds(&visited_outlines);

    let filtered = filter::apply(trips, trip_filter);
    let index = aggregate::group_cities_by_country(&filtered);

    let markers = resolver.resolve_index(&index, progress).await?;

    log::info!(
        "Rendered {} of {} trips: {} outlines, {} markers",
        filtered.len(),
        trips.len(),
        visited_outlines.features.len(),
        markers.len()
    );

    Ok(MapView {
        outlines: visited_outlines,
        bounds,
        markers,
        trips: stats::trip_rows(&filtered),
        stats: stats::summarize(&index),
    })
}

/// Flattens a view into a single `GeoJSON` `FeatureCollection`.
///
/// Country outlines come first, followed by one `Point` feature per
/// marker carrying `tooltip` and `country` properties.
#[must_use]
pub fn to_feature_collection(view: &MapView) -> FeatureCollection {
    let markers = view.markers.iter().map(|marker| {
        let mut properties = JsonObject::new();
        properties.insert("tooltip".to_string(), marker.city.clone().into());
        properties.insert("country".to_string(), marker.country.clone().into());

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![
                marker.coordinates.longitude,
                marker.coordinates.latitude,
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    });

    FeatureCollection {
        bbox: None,
        features: view
            .outlines
            .features
            .iter()
            .cloned()
            .chain(markers)
            .collect(),
        foreign_members: None,
    }
}
