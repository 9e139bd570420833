//! Data models for the AirDash application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and metadata
//! - Air quality: Pollutant readings and hourly history
//! - Atmosphere: Current weather conditions

pub mod air_quality;
pub mod atmosphere;
pub mod location;

// Re-export all public types for convenient access
pub use air_quality::{AirQualityData, PollutantHistory, PollutantReading};
pub use atmosphere::AtmosphericConditions;
pub use location::{Coordinates, Location};
