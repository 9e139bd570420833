//! Current atmospheric conditions shown next to the air quality index

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AtmosphericConditions {
    /// Observation time as reported by the service (local time, ISO 8601)
    pub observed_at: Option<String>,
    /// Temperature in Celsius
    pub temperature: Option<f32>,
    /// Relative humidity in percent
    pub relative_humidity: Option<f32>,
    /// Surface pressure in hPa
    pub pressure: Option<f32>,
    /// Wind speed in km/h
    pub wind_speed: Option<f32>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: Option<u16>,
    /// WMO weather interpretation code
    pub weather_code: Option<u8>,
}

impl AtmosphericConditions {
    pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
        match degrees {
            0..=11 | 349..=360 => "N",
            12..=33 => "NNE",
            34..=56 => "NE",
            57..=78 => "ENE",
            79..=101 => "E",
            102..=123 => "ESE",
            124..=146 => "SE",
            147..=168 => "SSE",
            169..=191 => "S",
            192..=213 => "SSW",
            214..=236 => "SW",
            237..=258 => "WSW",
            259..=281 => "W",
            282..=303 => "WNW",
            304..=326 => "NW",
            327..=348 => "NNW",
            _ => "Unknown",
        }
    }

    /// Convert WMO weather code to human-readable description
    #[must_use]
    pub fn weather_code_to_description(code: u8) -> &'static str {
        match code {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            56 => "Light freezing drizzle",
            57 => "Dense freezing drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            66 => "Light freezing rain",
            67 => "Heavy freezing rain",
            71 => "Slight snow fall",
            73 => "Moderate snow fall",
            75 => "Heavy snow fall",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => "Unknown",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.weather_code
            .map_or("Unknown", Self::weather_code_to_description)
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        self.temperature
            .map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}°C"))
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        match (self.wind_speed, self.wind_direction) {
            (Some(speed), Some(dir)) => format!(
                "{speed:.1} km/h {}",
                Self::wind_direction_to_cardinal(dir)
            ),
            (Some(speed), None) => format!("{speed:.1} km/h"),
            _ => "n/a".to_string(),
        }
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        self.pressure
            .map_or_else(|| "n/a".to_string(), |p| format!("{p:.1} hPa"))
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        self.relative_humidity
            .map_or_else(|| "n/a".to_string(), |h| format!("{h:.0}%"))
    }
}
