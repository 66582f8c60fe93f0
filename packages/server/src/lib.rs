#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the trips map application.
//!
//! A browser front end uploads a trips file to `POST /api/trips` and then
//! asks `GET /api/map` for the view under the current filter selection.
//! The server holds one session (the last uploaded file), the country
//! outlines loaded at startup, and the process-wide coordinate resolver.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use trips_map_geocoder::config::{ConfigError, GeocoderConfig};
use trips_map_geocoder::resolver::CoordinateResolver;
use trips_map_geocoder::GeocodeError;
use trips_map_outline::{CountryOutlines, OutlineError};
use trips_map_render::TripSession;

/// Environment variable pointing at the country outline asset.
pub const OUTLINES_ENV_VAR: &str = "TRIPS_MAP_OUTLINES";
/// Outline asset used when [`OUTLINES_ENV_VAR`] is unset.
pub const DEFAULT_OUTLINES_PATH: &str = "assets/countries_medium_resolution.geo.json";

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Geocoder settings are missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client for the geocoder could not be built.
    #[error(transparent)]
    Geocoder(#[from] GeocodeError),

    /// The outline asset could not be loaded.
    #[error("Failed to load country outlines: {0}")]
    Outlines(#[from] OutlineError),

    /// The HTTP server failed to bind or run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Reference outlines, loaded once.
    pub outlines: Arc<CountryOutlines>,
    /// Process-wide coordinate cache. The mutex also serializes provider
    /// requests across concurrent requests.
    pub resolver: Mutex<CoordinateResolver>,
    /// The most recently uploaded trips file.
    pub session: RwLock<Option<Arc<TripSession>>>,
}

impl AppState {
    /// Creates state with no uploaded file.
    #[must_use]
    pub fn new(outlines: Arc<CountryOutlines>, resolver: CoordinateResolver) -> Self {
        Self {
            outlines,
            resolver: Mutex::new(resolver),
            session: RwLock::new(None),
        }
    }
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Country outline asset.
    pub outlines_path: PathBuf,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT` and [`OUTLINES_ENV_VAR`], falling back to
    /// `127.0.0.1:8080` and [`DEFAULT_OUTLINES_PATH`].
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let outlines_path = std::env::var(OUTLINES_ENV_VAR)
            .map_or_else(|_| PathBuf::from(DEFAULT_OUTLINES_PATH), PathBuf::from);

        Self {
            bind_addr,
            port,
            outlines_path,
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/trips", web::post().to(handlers::upload_trips))
            .route("/map", web::get().to(handlers::map_view)),
    );
}

/// Starts the trips map API server.
///
/// Reads the geocoder configuration from the environment, loads the
/// country outlines, and serves until shut down. The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`) and the logger.
///
/// # Errors
///
/// Returns [`StartupError`] if configuration is missing, the outlines
/// cannot be loaded, or the HTTP server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), StartupError> {
    let geocoder_config = GeocoderConfig::from_env()?;
    let resolver = CoordinateResolver::from_config(&geocoder_config)?;
    let outlines = Arc::new(CountryOutlines::load(&config.outlines_path)?);

    let state = web::Data::new(AppState::new(outlines, resolver));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
