//! `OpenMeteo` API response structures and conversion utilities

use crate::models::{
    AirQualityData, AtmosphericConditions, Location, PollutantHistory, PollutantReading,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Current variables requested from the air quality API
pub const AIR_QUALITY_CURRENT: &str = "pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,ozone";
/// Hourly variables requested from the air quality API
pub const AIR_QUALITY_HOURLY: &str = "pm10,pm2_5";
/// Current variables requested from the forecast API
pub const ATMOSPHERE_CURRENT: &str = "temperature_2m,relative_humidity_2m,surface_pressure,wind_speed_10m,wind_direction_10m,weather_code";

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        let name = match result.admin1 {
            Some(admin1) if admin1 != result.name => format!("{}, {}", result.name, admin1),
            _ => result.name,
        };

        match result.country {
            Some(country) => Location::with_country(result.latitude, result.longitude, name, country),
            None => Location::new(result.latitude, result.longitude, name),
        }
    }
}

/// Air quality response; `current` keys vary with the requested variables
#[derive(Debug, Deserialize)]
pub struct AirQualityResponse {
    pub current: Option<CurrentAirQuality>,
    pub hourly: Option<HourlyParticulates>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentAirQuality {
    pub time: Option<String>,
    pub interval: Option<u32>,
    #[serde(flatten)]
    pub values: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct HourlyParticulates {
    pub time: Vec<String>,
    pub pm2_5: Option<Vec<Option<f64>>>,
    pub pm10: Option<Vec<Option<f64>>>,
}

impl AirQualityResponse {
    /// Convert into the internal model. Hourly samples later than the current
    /// observation (forecast hours) are dropped so the history ends "now".
    /// Returns `None` when the response has no current block.
    #[must_use]
    pub fn into_data(self) -> Option<AirQualityData> {
        let current = self.current?;
        let observed_at = current.time;

        let mut reading = PollutantReading::new();
        for (key, value) in &current.values {
            reading = reading.with(key, value.as_f64());
        }

        let mut history = PollutantHistory::default();
        if let Some(hourly) = self.hourly {
            for (i, time) in hourly.time.into_iter().enumerate() {
                if observed_at.as_deref().is_some_and(|now| time.as_str() > now) {
                    break;
                }
                history
                    .pm2_5
                    .push(hourly.pm2_5.as_ref().and_then(|v| v.get(i).copied().flatten()));
                history
                    .pm10
                    .push(hourly.pm10.as_ref().and_then(|v| v.get(i).copied().flatten()));
                history.times.push(time);
            }
        }

        Some(AirQualityData {
            observed_at,
            current: reading,
            history,
        })
    }
}

/// Forecast API response restricted to the current block
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    pub time: Option<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<f32>,
    #[serde(rename = "relative_humidity_2m")]
    pub relative_humidity: Option<f32>,
    #[serde(rename = "surface_pressure")]
    pub pressure: Option<f32>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<f32>,
    #[serde(rename = "wind_direction_10m")]
    pub wind_direction: Option<f32>,
    pub weather_code: Option<u8>,
}

impl From<CurrentWeather> for AtmosphericConditions {
    fn from(current: CurrentWeather) -> Self {
        Self {
            observed_at: current.time,
            temperature: current.temperature,
            relative_humidity: current.relative_humidity,
            pressure: current.pressure,
            wind_speed: current.wind_speed,
            wind_direction: current
                .wind_direction
                .map(|d| d.rem_euclid(360.0).round() as u16),
            weather_code: current.weather_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::air_quality::{PM2_5, PM10};

    const AIR_QUALITY_JSON: &str = r#"{
        "latitude": 52.52,
        "longitude": 13.4,
        "current": {
            "time": "2024-05-01T10:00",
            "interval": 3600,
            "pm10": 18.4,
            "pm2_5": 12.0,
            "ozone": null
        },
        "hourly": {
            "time": ["2024-05-01T08:00", "2024-05-01T09:00", "2024-05-01T10:00", "2024-05-01T11:00"],
            "pm10": [15.0, null, 18.4, 30.0],
            "pm2_5": [10.0, 11.0, 12.0, 20.0]
        }
    }"#;

    #[test]
    fn test_air_quality_conversion() {
        let response: AirQualityResponse = serde_json::from_str(AIR_QUALITY_JSON).unwrap();
        let data = response.into_data().unwrap();

        assert_eq!(data.observed_at.as_deref(), Some("2024-05-01T10:00"));
        assert_eq!(data.current.get(PM2_5), Some(12.0));
        assert_eq!(data.current.get(PM10), Some(18.4));
        assert_eq!(data.current.get("ozone"), None);
        assert_eq!(data.current.get("interval"), None);

        // the 11:00 forecast hour is dropped
        assert_eq!(data.history.times.len(), 3);
        assert_eq!(data.history.pm2_5, vec![Some(10.0), Some(11.0), Some(12.0)]);
        assert_eq!(data.history.pm10, vec![Some(15.0), None, Some(18.4)]);
    }

    #[test]
    fn test_air_quality_without_current_block() {
        let response: AirQualityResponse =
            serde_json::from_str(r#"{"hourly": {"time": [], "pm10": [], "pm2_5": []}}"#).unwrap();
        assert!(response.into_data().is_none());
    }

    #[test]
    fn test_air_quality_with_short_hourly_arrays() {
        let json = r#"{
            "current": {"time": "2024-05-01T10:00", "pm2_5": 5.0},
            "hourly": {"time": ["2024-05-01T09:00", "2024-05-01T10:00"], "pm2_5": [4.0]}
        }"#;
        let response: AirQualityResponse = serde_json::from_str(json).unwrap();
        let data = response.into_data().unwrap();
        assert_eq!(data.history.pm2_5, vec![Some(4.0), None]);
        assert_eq!(data.history.pm10, vec![None, None]);
        assert_eq!(data.current.get(PM10), None);
    }

    #[test]
    fn test_forecast_conversion() {
        let json = r#"{
            "current": {
                "time": "2024-05-01T10:00",
                "interval": 900,
                "temperature_2m": 17.3,
                "relative_humidity_2m": 55,
                "surface_pressure": 1008.2,
                "wind_speed_10m": 12.6,
                "wind_direction_10m": 251,
                "weather_code": 3
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        let conditions = AtmosphericConditions::from(response.current.unwrap());

        assert_eq!(conditions.temperature, Some(17.3));
        assert_eq!(conditions.relative_humidity, Some(55.0));
        assert_eq!(conditions.wind_direction, Some(251));
        assert_eq!(conditions.description(), "Overcast");
    }

    #[test]
    fn test_geocoding_result_to_location() {
        let json = r#"{"results": [{
            "id": 2657970,
            "name": "Interlaken",
            "latitude": 46.68387,
            "longitude": 7.86638,
            "country": "Switzerland",
            "admin1": "Bern"
        }]}"#;
        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let location: Location = response.results.unwrap().remove(0).into();

        assert_eq!(location.name, "Interlaken, Bern");
        assert_eq!(location.coordinates.latitude, 46.68387);
        assert_eq!(location.country.as_deref(), Some("Switzerland"));
    }

    #[test]
    fn test_geocoding_without_results() {
        let response: GeocodingResponse = serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(response.results.is_none());
    }
}
