#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the trips map.
//!
//! Renders a trips file to a `GeoJSON` map plus a printed table and
//! stats, explores a file interactively with the same filters as the web
//! front end, starts the API server, or generates a `.env` with a unique
//! Nominatim user agent.
//!
//! Uses `indicatif-log-bridge` (via [`trips_map_cli_utils::init_logger`])
//! so that log lines and the geocoding progress bar never fight for the
//! terminal.

mod env_file;
mod explore;
mod pipeline;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use trips_map_trip_models::{CompanionOption, TripFilter};

#[derive(Parser)]
#[command(name = "trips_map", about = "Map the countries and cities of a travel log")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a trips file to a `GeoJSON` map and print its table and stats
    Render(RenderArgs),
    /// Pick filters interactively and re-render until done
    Explore(ExploreArgs),
    /// Start the API server
    Serve,
    /// Write a `.env` file with a unique Nominatim user agent
    InitEnv {
        /// Where to write the file
        #[arg(long, default_value = ".env")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Trips file (TOML)
    file: PathBuf,
    /// Keep only trips from this year
    #[arg(long)]
    year: Option<i64>,
    /// Keep only trips with this companion; repeatable, `(none)` selects
    /// trips without companions
    #[arg(long = "companion")]
    companions: Vec<String>,
    /// Country outlines (`GeoJSON`)
    #[arg(long, env = "TRIPS_MAP_OUTLINES", default_value = trips_map_server::DEFAULT_OUTLINES_PATH)]
    outlines: PathBuf,
    /// Where to write the map as a `GeoJSON` `FeatureCollection`
    #[arg(long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    fn trip_filter(&self) -> TripFilter {
        TripFilter {
            year: self.year,
            companions: (!self.companions.is_empty()).then(|| {
                self.companions
                    .iter()
                    .map(|c| CompanionOption::from(c.as_str()))
                    .collect()
            }),
        }
    }
}

#[derive(Args)]
struct ExploreArgs {
    /// Trips file (TOML)
    file: PathBuf,
    /// Country outlines (`GeoJSON`)
    #[arg(long, env = "TRIPS_MAP_OUTLINES", default_value = trips_map_server::DEFAULT_OUTLINES_PATH)]
    outlines: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let multi = trips_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => {
            let mut workspace = pipeline::Workspace::open(&args.outlines)?;
            let session = pipeline::load_session(&args.file)?;
            let view = workspace
                .render(&session, &args.trip_filter(), &multi)
                .await?;

            pipeline::print_view(&view);
            if let Some(output) = &args.output {
                pipeline::write_geojson(&view, output)?;
            }
        }
        Commands::Explore(args) => explore::run(&args.file, &args.outlines, &multi).await?,
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(trips_map_server::interactive::run())
            })
            .await??;
        }
        Commands::InitEnv { path, force } => {
            let user_agent = env_file::write(&path, force)?;
            println!("File {} created successfully!", path.display());
            log::info!("Generated user agent {user_agent}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory as _;
        Cli::command().debug_assert();
    }

    #[test]
    fn render_args_build_filter() {
        let cli = Cli::try_parse_from([
            "trips_map",
            "render",
            "trips.toml",
            "--year",
            "2021",
            "--companion",
            "Alice",
            "--companion",
            "(none)",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(
            args.trip_filter(),
            TripFilter {
                year: Some(2021),
                companions: Some(vec![
                    CompanionOption::from("Alice"),
                    CompanionOption::NoCompanion,
                ]),
            }
        );
    }

    #[test]
    fn render_without_filters_keeps_everything() {
        let cli = Cli::try_parse_from(["trips_map", "render", "trips.toml"]).unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.trip_filter(), TripFilter::default());
    }
}
