//! Location Resolution Module
//!
//! This module parses user location input and resolves a [`LocationSource`]
//! into a structured [`Location`] for the dashboard.

use crate::api::DataProvider;
use crate::models::{Coordinates, Location};
use crate::{AirDashError, ErrorCode};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Where the coordinates for a refresh come from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocationSource {
    /// Explicit or geolocated coordinates
    Coordinates(Coordinates),
    /// City search resolved through the geocoder
    City(String),
    /// Coordinates of the last successful refresh, else the configured default
    LastKnown,
}

impl LocationSource {
    /// Prefer geolocation when available, otherwise fall back to last-known coordinates
    #[must_use]
    pub fn from_geolocation(geolocation: Option<Coordinates>) -> Self {
        match geolocation {
            Some(coordinates) => LocationSource::Coordinates(coordinates),
            None => LocationSource::LastKnown,
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            LocationSource::Coordinates(c) => c.format(),
            LocationSource::City(name) => name.clone(),
            LocationSource::LastKnown => "last known location".to_string(),
        }
    }
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse location input: coordinates (`lat,lon` or `lat lon`) or a city name
    pub fn parse(input: &str) -> Result<LocationSource> {
        let input = input.trim();

        if input.is_empty() {
            return Err(AirDashError::validation("Location cannot be empty").into());
        }

        // Try to parse as coordinates (lat,lon)
        if let Ok(coordinates) = Self::parse_coordinates(input) {
            return Ok(LocationSource::Coordinates(coordinates));
        }

        // Otherwise treat as city name
        Ok(LocationSource::City(input.to_string()))
    }

    /// Parse coordinates from string like "46.8182,8.2275" or "46.8182 8.2275"
    fn parse_coordinates(input: &str) -> Result<Coordinates> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return Err(
                AirDashError::validation("Coordinates must be in format 'lat,lon'").into(),
            );
        }

        let lat = parts[0]
            .parse::<f64>()
            .with_context(|| format!("Invalid latitude: {}", parts[0]))?;
        let lon = parts[1]
            .parse::<f64>()
            .with_context(|| format!("Invalid longitude: {}", parts[1]))?;

        Self::validate_coordinates(lat, lon)
    }

    /// Check coordinate ranges
    pub fn validate_coordinates(lat: f64, lon: f64) -> Result<Coordinates> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AirDashError::validation(format!(
                "Latitude must be between -90 and 90, got: {lat}"
            ))
            .into());
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(AirDashError::validation(format!(
                "Longitude must be between -180 and 180, got: {lon}"
            ))
            .into());
        }

        Ok(Coordinates::new(lat, lon))
    }
}

/// Service for resolving location sources
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a source into a structured Location.
    ///
    /// `last_known` is consulted only for [`LocationSource::LastKnown`]; when it
    /// is absent the `fallback` location is used.
    pub async fn resolve<P: DataProvider + ?Sized>(
        provider: &P,
        source: &LocationSource,
        last_known: Option<&Location>,
        fallback: &Location,
    ) -> Result<Location> {
        debug!("Resolving location source: {:?}", source);

        let location = match source {
            LocationSource::Coordinates(coordinates) => Location::from_coordinates(*coordinates),
            LocationSource::City(name) => Self::resolve_name(provider, name).await?,
            LocationSource::LastKnown => last_known.unwrap_or(fallback).clone(),
        };

        debug!(
            "Resolved location: {} at ({})",
            location.name,
            location.coordinates.format()
        );

        Ok(location)
    }

    /// Resolve a location name to coordinates via geocoding
    async fn resolve_name<P: DataProvider + ?Sized>(provider: &P, name: &str) -> Result<Location> {
        debug!("Geocoding location name: {}", name);

        let geocoding_results = provider.geocode(name).await?;

        // Use the first (best) result
        let location = geocoding_results.into_iter().next().ok_or_else(|| {
            AirDashError::api_with_context(
                format!("Location not found: {name}"),
                ErrorCode::ApiLocationNotFound,
                HashMap::from([("location".to_string(), name.to_string())]),
            )
        })?;

        debug!(
            "Found location: {} ({})",
            location.name,
            location.coordinates.format()
        );

        Ok(location)
    }
}
