//! `AirDash` - Air quality dashboard
//!
//! This library resolves a location, fetches particulate and weather data for
//! it, and derives the AQI, its classification, a short trend and a projection.

pub mod api;
pub mod aqi;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod web;

// Re-export core types for public API
pub use api::{DataProvider, OpenMeteoClient};
pub use config::AirDashConfig;
pub use dashboard::{DashboardService, DashboardSnapshot};
pub use error::{AirDashError, ErrorCode};
pub use location_resolver::{LocationParser, LocationSource};
pub use models::{Coordinates, Location};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
