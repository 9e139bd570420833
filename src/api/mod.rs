//! Air quality and weather API client for `OpenMeteo` integration
//!
//! This module provides the [`DataProvider`] seam used by the dashboard and its
//! HTTP implementation against the `OpenMeteo` geocoding, air quality and
//! forecast APIs, with retry and error handling.

pub mod openmeteo;

use crate::config::ApiConfig;
use crate::models::{AirQualityData, AtmosphericConditions, Coordinates, Location};
use crate::{AirDashError, ErrorCode};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Source of location, air quality and atmospheric data
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Candidate locations for a place name, best match first
    async fn geocode(&self, name: &str) -> Result<Vec<Location>>;
    /// Current pollutant reading plus recent hourly history
    async fn air_quality(&self, coordinates: Coordinates) -> Result<AirQualityData>;
    /// Current weather conditions
    async fn atmosphere(&self, coordinates: Coordinates) -> Result<AtmosphericConditions>;
}

/// `OpenMeteo` API client
pub struct OpenMeteoClient {
    /// HTTP client with retry middleware
    client: ClientWithMiddleware,
    /// API configuration
    config: ApiConfig,
}

fn coordinate_context(coordinates: Coordinates) -> HashMap<String, String> {
    HashMap::from([("coordinates".to_string(), coordinates.format())])
}

impl OpenMeteoClient {
    /// Create a new API client
    pub fn new(config: ApiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("AirDash/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        // Transient failures (connect errors, 5xx, 408, 429) are retried with backoff
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, config })
    }

    /// Issue a GET request and decode the JSON body, mapping failures to [`AirDashError`]
    #[instrument(skip(self, context))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: HashMap<String, String>,
    ) -> Result<T> {
        let start_time = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Network error: {}", e);
            let mut context = context.clone();
            context.insert("error".to_string(), e.to_string());
            AirDashError::api_with_context(
                format!("Network error: {e}"),
                ErrorCode::ApiNetworkError,
                context,
            )
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let code = match status {
                StatusCode::NOT_FOUND => ErrorCode::ApiLocationNotFound,
                StatusCode::TOO_MANY_REQUESTS => ErrorCode::ApiRateLimit,
                _ => ErrorCode::ApiNetworkError,
            };
            warn!("API request failed with status {}", status);
            let mut context = context;
            context.insert("status_code".to_string(), status.as_u16().to_string());
            return Err(AirDashError::api_with_context(
                format!(
                    "API request failed with status: {} - {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
                code,
                context,
            )
            .into());
        }

        let parse_start = Instant::now();
        let body = response.json::<T>().await.map_err(|e| {
            error!("Failed to parse response: {}", e);
            AirDashError::api_with_context(
                "Invalid data received from OpenMeteo API",
                ErrorCode::ApiInvalidResponse,
                context.clone(),
            )
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Successful API request in {:.3}s (parse: {:.3}s)",
            total_duration.as_secs_f64(),
            parse_start.elapsed().as_secs_f64()
        );

        if total_duration.as_secs() > 5 {
            warn!(
                "Slow API response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(body)
    }
}

#[async_trait]
impl DataProvider for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Vec<Location>> {
        info!("Geocoding location: '{}'", name);

        let url = format!(
            "{}/search?name={}&count=5&language=en&format=json",
            self.config.geocoding_url,
            urlencoding::encode(name)
        );

        let response: openmeteo::GeocodingResponse = self
            .get_json(
                &url,
                HashMap::from([("location".to_string(), name.to_string())]),
            )
            .await?;

        let locations: Vec<Location> = response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Location::from)
            .collect();

        if locations.is_empty() {
            warn!("No results found for location '{}'", name);
        } else {
            debug!(
                "Geocoding results: {:?}",
                locations
                    .iter()
                    .map(|l| format!("{} ({})", l.name, l.coordinates.format()))
                    .collect::<Vec<_>>()
            );
        }

        Ok(locations)
    }

    #[instrument(skip(self))]
    async fn air_quality(&self, coordinates: Coordinates) -> Result<AirQualityData> {
        info!("Getting air quality for coordinates: {}", coordinates.format());

        let url = format!(
            "{}/air-quality?latitude={:.4}&longitude={:.4}&current={}&hourly={}&past_days=1&forecast_days=1&timezone=auto",
            self.config.air_quality_url,
            coordinates.latitude,
            coordinates.longitude,
            openmeteo::AIR_QUALITY_CURRENT,
            openmeteo::AIR_QUALITY_HOURLY,
        );

        let response: openmeteo::AirQualityResponse = self
            .get_json(&url, coordinate_context(coordinates))
            .await?;

        let data = response.into_data().ok_or_else(|| {
            AirDashError::api_with_context(
                "No current air quality data available from OpenMeteo",
                ErrorCode::ApiInvalidResponse,
                coordinate_context(coordinates),
            )
        })?;

        debug!(
            "Air quality reading with {} hourly samples",
            data.history.times.len()
        );
        Ok(data)
    }

    #[instrument(skip(self))]
    async fn atmosphere(&self, coordinates: Coordinates) -> Result<AtmosphericConditions> {
        info!(
            "Getting current weather for coordinates: {}",
            coordinates.format()
        );

        let url = format!(
            "{}/forecast?latitude={:.4}&longitude={:.4}&current={}&timezone=auto",
            self.config.weather_url,
            coordinates.latitude,
            coordinates.longitude,
            openmeteo::ATMOSPHERE_CURRENT,
        );

        let response: openmeteo::ForecastResponse = self
            .get_json(&url, coordinate_context(coordinates))
            .await?;

        response
            .current
            .map(AtmosphericConditions::from)
            .ok_or_else(|| {
                AirDashError::api_with_context(
                    "No current weather data available from OpenMeteo",
                    ErrorCode::ApiInvalidResponse,
                    coordinate_context(coordinates),
                )
                .into()
            })
    }
}
