//! HTTP handler functions for the trips map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use trips_map_geocoder::GeocodeError;
use trips_map_geocoder::progress::NullProgress;
use trips_map_render::{RenderError, TripSession, render_view};
use trips_map_server_models::{ApiError, ApiHealth, ApiUploadSummary, MapQueryParams};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/trips`
///
/// Parses the TOML body and makes it the current session, replacing any
/// earlier upload. Returns the filter choices the file offers.
pub async fn upload_trips(state: web::Data<AppState>, body: String) -> HttpResponse {
    let session = match TripSession::from_toml(&body) {
        Ok(session) => session,
        Err(e) => {
            log::warn!("Rejected trips file: {e}");
            return HttpResponse::BadRequest().json(ApiError::new(e));
        }
    };

    let summary = ApiUploadSummary {
        trip_count: session.trips().len(),
        year_bounds: session.year_bounds(),
        companion_options: session.companion_options(),
    };

    *state.session.write().await = Some(Arc::new(session));

    HttpResponse::Ok().json(summary)
}

/// `GET /api/map`
///
/// Renders the current session under the filters given in the query.
pub async fn map_view(
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    let Some(session) = state.session.read().await.clone() else {
        return HttpResponse::NotFound().json(ApiError::new("No trips file has been uploaded"));
    };

    let trip_filter = params.to_filter();
    let mut resolver = state.resolver.lock().await;

    match render_view(
        session.trips(),
        &trip_filter,
        &state.outlines,
        &mut resolver,
        &NullProgress,
    )
    .await
    {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => render_error_response(&e),
    }
}

fn render_error_response(e: &RenderError) -> HttpResponse {
    match e {
        RenderError::Parse(_) => HttpResponse::BadRequest().json(ApiError::new(e)),
        RenderError::Outline(_) | RenderError::Geocode(GeocodeError::NotFound { .. }) => {
            log::warn!("Failed to render map: {e}");
            HttpResponse::UnprocessableEntity().json(ApiError::new(e))
        }
        RenderError::Geocode(_) => {
            log::error!("Geocoding provider failed: {e}");
            HttpResponse::BadGateway().json(ApiError::new(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use trips_map_geocoder::resolver::CoordinateResolver;
    use trips_map_geocoder::{Coordinates, Geocoder};
    use trips_map_outline::CountryOutlines;

    use super::*;

    const OUTLINES: &str = include_str!("../../outline/fixtures/countries_sample.geo.json");

    const TWO_TRIPS: &str = r#"
[[trips]]
year = 2020

[[trips.countries]]
name = "France"
cities = [{ name = "Paris" }]

[[trips]]
year = 2021
travel_companions = ["Alice"]

[[trips.countries]]
name = "Spain"
cities = [{ name = "Madrid" }]
"#;

    struct StubGeocoder {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(
            &self,
            city: &str,
            _country: &str,
        ) -> Result<Option<Coordinates>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let known: BTreeMap<&str, (f64, f64)> =
                BTreeMap::from([("Paris", (48.85, 2.35)), ("Madrid", (40.42, -3.70))]);
            Ok(known
                .get(city)
                .map(|&(latitude, longitude)| Coordinates {
                    latitude,
                    longitude,
                }))
        }
    }

    /// Fails every lookup as if the provider throttled us.
    struct ThrottledGeocoder;

    #[async_trait::async_trait]
    impl Geocoder for ThrottledGeocoder {
        async fn geocode(
            &self,
            _city: &str,
            _country: &str,
        ) -> Result<Option<Coordinates>, GeocodeError> {
            Err(GeocodeError::RateLimited)
        }
    }

    fn state() -> (web::Data<AppState>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = CoordinateResolver::new(
            Box::new(StubGeocoder {
                calls: calls.clone(),
            }),
            Duration::ZERO,
        );
        let outlines = Arc::new(CountryOutlines::from_geojson_str(OUTLINES).unwrap());
        (web::Data::new(AppState::new(outlines, resolver)), calls)
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let (state, _) = state();
        let app =
            test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: ApiHealth = test::read_body_json(resp).await;
        assert!(body.healthy);
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn map_without_upload_is_not_found() {
        let (state, _) = state();
        let app =
            test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/map").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn upload_then_render_filtered_view() {
        let (state, calls) = state();
        let app =
            test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let upload = test::TestRequest::post()
            .uri("/api/trips")
            .set_payload(TWO_TRIPS)
            .to_request();
        let resp = test::call_service(&app, upload).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let summary: ApiUploadSummary = test::read_body_json(resp).await;
        assert_eq!(summary.trip_count, 2);
        assert_eq!(summary.year_bounds.map(|b| (b.min, b.max)), Some((2020, 2021)));
        assert_eq!(summary.companion_options.len(), 2);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/map?year=2020")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let view: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(view["outlines"]["features"].as_array().unwrap().len(), 2);
        assert_eq!(view["markers"].as_array().unwrap().len(), 1);
        assert_eq!(view["markers"][0]["city"], "Paris");
        assert_eq!(view["trips"][0]["year"], "2020");
        assert_eq!(view["stats"]["numVisitedCountries"], 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn companion_query_selects_unaccompanied_trips() {
        let (state, _) = state();
        let app =
            test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let upload = test::TestRequest::post()
            .uri("/api/trips")
            .set_payload(TWO_TRIPS)
            .to_request();
        test::call_service(&app, upload).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/map?companions=(none)")
                .to_request(),
        )
        .await;
        let view: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(view["markers"].as_array().unwrap().len(), 1);
        assert_eq!(view["markers"][0]["country"], "France");
    }

    #[actix_web::test]
    async fn malformed_upload_is_bad_request() {
        let (state, _) = state();
        let app =
            test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let upload = test::TestRequest::post()
            .uri("/api/trips")
            .set_payload("[[trips]]\nyear = 2020\n")
            .to_request();
        let resp = test::call_service(&app, upload).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ApiError = test::read_body_json(resp).await;
        assert!(body.error.contains("countries"), "{}", body.error);
    }

    #[actix_web::test]
    async fn unknown_country_is_unprocessable() {
        let (state, _) = state();
        let app =
            test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let upload = test::TestRequest::post()
            .uri("/api/trips")
            .set_payload("[[trips]]\nyear = 2020\n[[trips.countries]]\nname = \"Atlantis\"\ncities = []\n")
            .to_request();
        test::call_service(&app, upload).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/map").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: ApiError = test::read_body_json(resp).await;
        assert!(body.error.contains("Atlantis"));
    }

    #[actix_web::test]
    async fn provider_failure_is_bad_gateway() {
        let resolver = CoordinateResolver::new(Box::new(ThrottledGeocoder), Duration::ZERO);
        let outlines = Arc::new(CountryOutlines::from_geojson_str(OUTLINES).unwrap());
        let state = web::Data::new(AppState::new(outlines, resolver));
        let app =
            test::init_service(App::new().app_data(state).configure(crate::configure)).await;

        let upload = test::TestRequest::post()
            .uri("/api/trips")
            .set_payload(TWO_TRIPS)
            .to_request();
        test::call_service(&app, upload).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/map").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: ApiError = test::read_body_json(resp).await;
        assert!(body.error.contains("Rate limit"), "{}", body.error);
    }
}
