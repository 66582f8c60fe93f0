//! Memoized, rate-limited coordinate lookups.
//!
//! [`CoordinateResolver`] is the process-wide geocoding cache. It queries
//! its provider at most once per distinct `(city, country)` pair, keeping
//! both hits and misses, and spaces provider requests at least
//! `min_interval` apart. Lookups are sequential: callers that share a
//! resolver across tasks must wrap it in an async mutex, which also keeps
//! raw provider requests from running in parallel.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;
use trips_map_trip_models::VisitedCityIndex;

use crate::config::GeocoderConfig;
use crate::nominatim::NominatimGeocoder;
use crate::progress::ProgressCallback;
use crate::{CityMarker, Coordinates, GeocodeError, Geocoder};

/// Cache key: `(city, country)`.
type PairKey = (String, String);

/// Memoizing front for a [`Geocoder`].
pub struct CoordinateResolver {
    geocoder: Box<dyn Geocoder>,
    min_interval: Duration,
    cache: BTreeMap<PairKey, Option<Coordinates>>,
    last_request: Option<Instant>,
    provider_requests: u64,
}

impl CoordinateResolver {
    /// Wraps `geocoder`, spacing its requests at least `min_interval`
    /// apart.
    #[must_use]
    pub fn new(geocoder: Box<dyn Geocoder>, min_interval: Duration) -> Self {
        Self {
            geocoder,
            min_interval,
            cache: BTreeMap::new(),
            last_request: None,
            provider_requests: 0,
        }
    }

    /// Builds a resolver backed by Nominatim.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let geocoder = NominatimGeocoder::new(config)?;
        Ok(Self::new(Box::new(geocoder), config.rate_limit))
    }

    /// Number of memoized pairs (hits and misses).
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of requests sent to the provider so far.
    #[must_use]
    pub const fn provider_requests(&self) -> u64 {
        self.provider_requests
    }

    /// Coordinates of `city` in `country`.
    ///
    /// Served from the memo when the pair was looked up before; otherwise
    /// waits out the rate limit and asks the provider. Transport failures
    /// are not memoized, so the next call retries them.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NotFound`] if the provider has no match,
    /// or the provider's error if the lookup itself fails.
    pub async fn resolve(
        &mut self,
        city: &str,
        country: &str,
    ) -> Result<Coordinates, GeocodeError> {
        let key = (city.to_string(), country.to_string());

        let found = if let Some(cached) = self.cache.get(&key) {
            log::debug!("Geocode cache hit: {city}, {country}");
            *cached
        } else {
            let found = self.lookup(city, country).await?;
            self.cache.insert(key, found);
            found
        };

        found.ok_or_else(|| GeocodeError::NotFound {
            city: city.to_string(),
            country: country.to_string(),
        })
    }

    /// Resolves every city of `index` into a map marker.
    ///
    /// Cities are resolved in country order, then city order. Stops at
    /// the first city that cannot be resolved.
    ///
    /// # Errors
    ///
    /// Returns the first [`GeocodeError`] encountered.
    pub async fn resolve_index(
        &mut self,
        index: &VisitedCityIndex,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<CityMarker>, GeocodeError> {
        progress.set_total(index.city_count() as u64);

        let mut markers = Vec::with_capacity(index.city_count());

        for (country, cities) in index.iter() {
            for city in cities {
                progress.set_message(format!("{city}, {country}"));
                let coordinates = self.resolve(city, country).await?;
                markers.push(CityMarker {
                    city: city.clone(),
                    country: country.to_string(),
                    coordinates,
                });
                progress.inc(1);
            }
        }

        progress.finish_and_clear();
        log::info!(
            "Resolved {} city coordinates ({} provider requests so far)",
            markers.len(),
            self.provider_requests
        );

        Ok(markers)
    }

    async fn lookup(
        &mut self,
        city: &str,
        country: &str,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        self.last_request = Some(Instant::now());
        self.provider_requests += 1;

        let found = self.geocoder.geocode(city, country).await?;
        if found.is_none() {
            log::warn!("No geocoding match for {city}, {country}");
        }

        Ok(found)
    }
}
