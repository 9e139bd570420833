//! Severity tiers for AQI values

use super::AqiValue;
use serde::Serialize;
use std::fmt;

/// EPA AQI levels, boundaries inclusive on the upper end
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl Severity {
    #[must_use]
    pub fn from_aqi(aqi: AqiValue) -> Self {
        match aqi {
            0..=50 => Severity::Good,
            51..=100 => Severity::Moderate,
            101..=150 => Severity::UnhealthyForSensitiveGroups,
            151..=200 => Severity::Unhealthy,
            201..=300 => Severity::VeryUnhealthy,
            _ => Severity::Hazardous,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Good => "Good",
            Severity::Moderate => "Moderate",
            Severity::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Severity::Unhealthy => "Unhealthy",
            Severity::VeryUnhealthy => "Very Unhealthy",
            Severity::Hazardous => "Hazardous",
        }
    }

    /// Display color token for the presentation layer
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Severity::Good => "green",
            Severity::Moderate => "yellow",
            Severity::UnhealthyForSensitiveGroups => "orange",
            Severity::Unhealthy => "red",
            Severity::VeryUnhealthy => "purple",
            Severity::Hazardous => "maroon",
        }
    }

    /// Health advisory sentence for this tier
    #[must_use]
    pub fn advisory(self) -> &'static str {
        match self {
            Severity::Good => {
                "Air quality is satisfactory, and air pollution poses little or no risk."
            }
            Severity::Moderate => {
                "Air quality is acceptable. Unusually sensitive people should consider limiting prolonged outdoor exertion."
            }
            Severity::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects. The general public is less likely to be affected."
            }
            Severity::Unhealthy => {
                "Some members of the general public may experience health effects; sensitive groups may experience more serious effects."
            }
            Severity::VeryUnhealthy => {
                "Health alert: the risk of health effects is increased for everyone. Avoid prolonged outdoor activity."
            }
            Severity::Hazardous => {
                "Health warning of emergency conditions: everyone is more likely to be affected. Stay indoors."
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label of the tier `aqi` falls into
#[must_use]
pub fn classify(aqi: AqiValue) -> &'static str {
    Severity::from_aqi(aqi).label()
}

/// Tier plus its presentation details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub severity: Severity,
    pub label: &'static str,
    pub color: &'static str,
    pub advisory: &'static str,
}

impl From<AqiValue> for Classification {
    fn from(aqi: AqiValue) -> Self {
        let severity = Severity::from_aqi(aqi);
        Self {
            severity,
            label: severity.label(),
            color: severity.color(),
            advisory: severity.advisory(),
        }
    }
}
