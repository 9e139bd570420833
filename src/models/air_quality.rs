//! Air quality readings as handed over by the fetch layer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reading key for fine particulate matter
pub const PM2_5: &str = "pm2_5";
/// Reading key for coarse particulate matter
pub const PM10: &str = "pm10";

/// Latest concentration per pollutant in µg/m³; `None` means the service had no value
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PollutantReading {
    values: BTreeMap<String, Option<f64>>,
}

impl PollutantReading {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reading with only the two particulate values set
    #[must_use]
    pub fn particulates(pm2_5: Option<f64>, pm10: Option<f64>) -> Self {
        Self::new().with(PM2_5, pm2_5).with(PM10, pm10)
    }

    #[must_use]
    pub fn with(mut self, pollutant: &str, value: Option<f64>) -> Self {
        self.values.insert(pollutant.to_string(), value);
        self
    }

    /// Concentration for `pollutant`, `None` when absent or not a number
    #[must_use]
    pub fn get(&self, pollutant: &str) -> Option<f64> {
        self.values
            .get(pollutant)
            .copied()
            .flatten()
            .filter(|v| !v.is_nan())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Chronological hourly particulate samples, oldest first
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PollutantHistory {
    pub times: Vec<String>,
    pub pm2_5: Vec<Option<f64>>,
    pub pm10: Vec<Option<f64>>,
}

/// Everything the air quality service returned for one location
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AirQualityData {
    /// Observation time as reported by the service (local time, ISO 8601)
    pub observed_at: Option<String>,
    pub current: PollutantReading,
    pub history: PollutantHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_accessors() {
        let reading = PollutantReading::particulates(Some(12.0), None).with("ozone", Some(40.0));
        assert_eq!(reading.get(PM2_5), Some(12.0));
        assert_eq!(reading.get(PM10), None);
        assert_eq!(reading.get("ozone"), Some(40.0));
        assert_eq!(reading.get("sulphur_dioxide"), None);
    }

    #[test]
    fn test_nan_reads_as_absent() {
        let reading = PollutantReading::particulates(Some(f64::NAN), Some(f64::NAN));
        assert_eq!(reading.get(PM2_5), None);
        assert_eq!(reading.get(PM10), None);
    }

    #[test]
    fn test_iteration_is_sorted_by_key() {
        let reading = PollutantReading::particulates(Some(1.0), Some(2.0)).with("ozone", None);
        let keys: Vec<&str> = reading.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ozone", "pm10", "pm2_5"]);
    }
}
