//! Shared render steps for the `render` and `explore` commands.

use std::path::Path;

use trips_map_cli_utils::{IndicatifProgress, MultiProgress};
use trips_map_geocoder::config::GeocoderConfig;
use trips_map_geocoder::resolver::CoordinateResolver;
use trips_map_outline::CountryOutlines;
use trips_map_render::{MapView, RenderError, TripSession, render_view, to_feature_collection};
use trips_map_trip_models::TripFilter;

/// Long-lived state for one CLI run: outlines and the coordinate cache.
pub struct Workspace {
    outlines: CountryOutlines,
    resolver: CoordinateResolver,
}

impl Workspace {
    /// Reads geocoder settings from the environment and loads outlines.
    ///
    /// # Errors
    ///
    /// Returns an error if `NOMINATIM_USER_AGENT` is missing, the HTTP
    /// client cannot be built, or the outlines cannot be loaded.
    pub fn open(outlines_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let config = GeocoderConfig::from_env()?;
        let resolver = CoordinateResolver::from_config(&config)?;
        let outlines = CountryOutlines::load(outlines_path)?;

        Ok(Self { outlines, resolver })
    }

    /// Renders `session` under `trip_filter`, showing a progress bar
    /// while cities are geocoded.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if a country or city cannot be resolved.
    pub async fn render(
        &mut self,
        session: &TripSession,
        trip_filter: &TripFilter,
        multi: &MultiProgress,
    ) -> Result<MapView, RenderError> {
        let progress = IndicatifProgress::lookup_bar(multi, "Getting city coordinates...");

        render_view(
            session.trips(),
            trip_filter,
            &self.outlines,
            &mut self.resolver,
            progress.as_ref(),
        )
        .await
    }
}

/// Reads and parses a trips file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn load_session(path: &Path) -> Result<TripSession, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(TripSession::from_toml(&text)?)
}

/// Writes the view as a single `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_geojson(view: &MapView, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let collection = to_feature_collection(view);
    std::fs::write(path, serde_json::to_string_pretty(&collection)?)?;
    log::info!(
        "Wrote {} map features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

/// Prints the trips table and the stats section.
pub fn print_view(view: &MapView) {
    println!();
    println!("Trips");
    print_table(
        &[
            "Year",
            "Countries",
            "Cities",
            "Travel Companions",
            "Description",
        ],
        &trip_table(view),
    );

    println!();
    println!("Stats");
    println!(
        "Number of visited countries: {}",
        view.stats.num_visited_countries
    );
    println!(
        "Visited countries: {}",
        view.stats.visited_countries.join(", ")
    );
    println!("Number of visited cities: {}", view.stats.num_visited_cities);

    println!();
    print_table(
        &["Country", "City"],
        &view
            .stats
            .visited_cities
            .iter()
            .map(|row| vec![row.country.clone(), row.cities.join(", ")])
            .collect::<Vec<_>>(),
    );
}

fn trip_table(view: &MapView) -> Vec<Vec<String>> {
    view.trips
        .iter()
        .map(|row| {
            vec![
                row.year.clone(),
                row.countries.join(", "),
                row.cities.join(", "),
                row.travel_companions
                    .as_ref()
                    .map(|c| c.join(", "))
                    .unwrap_or_default(),
                row.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", format_table(headers, rows));
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(headers.iter().copied(), &widths));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
