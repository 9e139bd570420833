//! AQI calculations
//!
//! Converts particulate concentrations into EPA Air Quality Index values by
//! piecewise-linear interpolation over fixed breakpoint tables, and derives
//! the severity tier, a short trend and a naive projection from them.

pub mod classify;
pub mod prediction;
pub mod trend;

pub use classify::{Classification, Severity, classify};
pub use prediction::{DayProjection, Prediction, predict};
pub use trend::{TrendPoint, TrendSeries, extract_trend};

use crate::models::PollutantReading;
use serde::Serialize;

/// An Air Quality Index value
pub type AqiValue = u16;

/// One linear segment of the EPA piecewise function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: AqiValue,
    pub i_high: AqiValue,
}

impl Breakpoint {
    #[must_use]
    pub const fn new(c_low: f64, c_high: f64, i_low: AqiValue, i_high: AqiValue) -> Self {
        Self {
            c_low,
            c_high,
            i_low,
            i_high,
        }
    }

    #[must_use]
    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.c_low && concentration <= self.c_high
    }

    /// Linear interpolation transcribed from EPA documentation:
    /// AQI = ((AQIhigh - AQIlow) / (Chigh - Clow)) * (C - Clow) + AQIlow
    fn interpolate(&self, concentration: f64) -> AqiValue {
        let slope = f64::from(self.i_high - self.i_low) / (self.c_high - self.c_low);
        let index = slope * (concentration - self.c_low) + f64::from(self.i_low);
        // f64::round rounds half away from zero
        index.round() as AqiValue
    }
}

// AQI breakpoints for PM2.5 in µg/m³ (24-hour average, pre-2024 EPA table)
pub const PM2_5_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint::new(0.0, 12.0, 0, 50),      // Good
    Breakpoint::new(12.1, 35.4, 51, 100),   // Moderate
    Breakpoint::new(35.5, 55.4, 101, 150),  // Unhealthy for Sensitive Groups
    Breakpoint::new(55.5, 150.4, 151, 200), // Unhealthy
    Breakpoint::new(150.5, 250.4, 201, 300), // Very Unhealthy
    Breakpoint::new(250.5, 350.4, 301, 400), // Hazardous
    Breakpoint::new(350.5, 500.4, 401, 500), // Hazardous
];

// AQI breakpoints for PM10 in µg/m³ (24-hour average). Segments have integer
// bounds, so decimal readings between them (54 < c < 55, 154 < c < 155, ...)
// match no segment and are undefined, like any other gap.
pub const PM10_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint::new(0.0, 54.0, 0, 50),
    Breakpoint::new(55.0, 154.0, 51, 100),
    Breakpoint::new(155.0, 254.0, 101, 150),
    Breakpoint::new(255.0, 354.0, 151, 200),
    Breakpoint::new(355.0, 424.0, 201, 300),
    Breakpoint::new(425.0, 504.0, 301, 400),
    Breakpoint::new(505.0, 604.0, 401, 500),
];

/// Pollutants that contribute to the reported index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    Pm2_5,
    Pm10,
}

impl Pollutant {
    #[must_use]
    pub fn breakpoints(self) -> &'static [Breakpoint] {
        match self {
            Pollutant::Pm2_5 => &PM2_5_BREAKPOINTS,
            Pollutant::Pm10 => &PM10_BREAKPOINTS,
        }
    }

    /// Key of this pollutant in a `PollutantReading`
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => crate::models::air_quality::PM2_5,
            Pollutant::Pm10 => crate::models::air_quality::PM10,
        }
    }

    /// Concentration of this pollutant in `reading`
    #[must_use]
    pub fn concentration(self, reading: &PollutantReading) -> Option<f64> {
        reading.get(self.key())
    }

    /// Sub-index for this pollutant, `None` when absent or outside the table
    #[must_use]
    pub fn sub_index(self, concentration: Option<f64>) -> Option<AqiValue> {
        concentration.and_then(|c| sub_index(c, self.breakpoints()))
    }
}

/// Calculate the sub-index for a concentration against a breakpoint table.
///
/// The first segment in table order with `c_low <= c <= c_high` is used.
/// Concentrations that match no segment (negative, NaN, inside a gap between
/// segments, or above the table) yield `None`; they are never clamped.
///
/// # Examples
///
/// ```
/// use airdash::aqi::{sub_index, PM2_5_BREAKPOINTS};
///
/// assert_eq!(sub_index(12.0, &PM2_5_BREAKPOINTS), Some(50));
/// assert_eq!(sub_index(-1.0, &PM2_5_BREAKPOINTS), None);
/// ```
#[must_use]
pub fn sub_index(concentration: f64, table: &[Breakpoint]) -> Option<AqiValue> {
    table
        .iter()
        .find(|bp| bp.contains(concentration))
        .map(|bp| bp.interpolate(concentration))
}

/// Combined index: the larger of the PM2.5 and PM10 sub-indices.
///
/// An undefined sub-index counts as 0, so a reading without any usable
/// particulate value reports 0.
#[must_use]
pub fn combined_aqi(pm2_5: Option<f64>, pm10: Option<f64>) -> AqiValue {
    let pm2_5_index = Pollutant::Pm2_5.sub_index(pm2_5).unwrap_or(0);
    let pm10_index = Pollutant::Pm10.sub_index(pm10).unwrap_or(0);
    pm2_5_index.max(pm10_index)
}

/// Index breakdown for one reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiBreakdown {
    pub pm2_5_index: Option<AqiValue>,
    pub pm10_index: Option<AqiValue>,
    pub aqi: AqiValue,
    /// Pollutant with the larger sub-index, if any was defined
    pub dominant: Option<Pollutant>,
}

impl AqiBreakdown {
    #[must_use]
    pub fn from_reading(reading: &PollutantReading) -> Self {
        let pm2_5 = Pollutant::Pm2_5.concentration(reading);
        let pm10 = Pollutant::Pm10.concentration(reading);
        let pm2_5_index = Pollutant::Pm2_5.sub_index(pm2_5);
        let pm10_index = Pollutant::Pm10.sub_index(pm10);
        let dominant = match (pm2_5_index, pm10_index) {
            (Some(a), Some(b)) if b > a => Some(Pollutant::Pm10),
            (Some(_), _) => Some(Pollutant::Pm2_5),
            (None, Some(_)) => Some(Pollutant::Pm10),
            (None, None) => None,
        };

        Self {
            pm2_5_index,
            pm10_index,
            aqi: combined_aqi(pm2_5, pm10),
            dominant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Some(0))]
    #[case(6.0, Some(25))]
    #[case(12.0, Some(50))]
    #[case(12.1, Some(51))]
    #[case(35.4, Some(100))]
    #[case(35.5, Some(101))]
    #[case(45.0, Some(124))]
    #[case(55.4, Some(150))]
    #[case(150.4, Some(200))]
    #[case(250.4, Some(300))]
    #[case(350.5, Some(401))]
    #[case(500.4, Some(500))]
    #[case(500.5, None)]
    #[case(12.05, None)]
    #[case(-0.1, None)]
    #[case(f64::NAN, None)]
    fn test_pm2_5_sub_index(#[case] concentration: f64, #[case] expected: Option<AqiValue>) {
        assert_eq!(sub_index(concentration, &PM2_5_BREAKPOINTS), expected);
    }

    #[rstest]
    #[case(0.0, Some(0))]
    #[case(54.0, Some(50))]
    #[case(55.0, Some(51))]
    #[case(100.0, Some(73))]
    #[case(154.0, Some(100))]
    #[case(604.0, Some(500))]
    #[case(54.5, None)]
    #[case(605.0, None)]
    fn test_pm10_sub_index(#[case] concentration: f64, #[case] expected: Option<AqiValue>) {
        assert_eq!(sub_index(concentration, &PM10_BREAKPOINTS), expected);
    }

    #[test]
    fn test_segment_bounds_map_to_index_bounds() {
        for table in [&PM2_5_BREAKPOINTS, &PM10_BREAKPOINTS] {
            for bp in table {
                assert_eq!(sub_index(bp.c_low, table), Some(bp.i_low), "{bp:?} low");
                assert_eq!(sub_index(bp.c_high, table), Some(bp.i_high), "{bp:?} high");
            }
        }
    }

    #[test]
    fn test_monotonic_within_segments() {
        for table in [&PM2_5_BREAKPOINTS, &PM10_BREAKPOINTS] {
            for bp in table {
                let steps: u32 = 200;
                let mut previous = bp.i_low;
                for step in 1..steps {
                    let c = bp.c_low + (bp.c_high - bp.c_low) * f64::from(step) / f64::from(steps);
                    let index = sub_index(c, table).expect("inside segment");
                    assert!(index >= previous, "{c} dropped to {index} from {previous}");
                    previous = index;
                }
            }
        }
    }

    #[test]
    fn test_tables_are_increasing_and_disjoint() {
        for table in [&PM2_5_BREAKPOINTS, &PM10_BREAKPOINTS] {
            for pair in table.windows(2) {
                assert!(pair[0].c_high < pair[1].c_low);
                assert!(pair[0].i_high < pair[1].i_low);
                assert!(pair[0].c_low < pair[0].c_high);
            }
        }
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let table = [Breakpoint::new(0.0, 10.0, 0, 5)];
        assert_eq!(sub_index(1.0, &table), Some(1)); // 0.5
        assert_eq!(sub_index(3.0, &table), Some(2)); // 1.5
        assert_eq!(sub_index(5.0, &table), Some(3)); // 2.5, half-to-even would give 2
    }

    #[test]
    fn test_shared_boundary_uses_first_segment() {
        let table = [
            Breakpoint::new(0.0, 10.0, 0, 50),
            Breakpoint::new(10.0, 20.0, 60, 100),
        ];
        assert_eq!(sub_index(10.0, &table), Some(50));
    }

    #[test]
    fn test_combined_aqi() {
        assert_eq!(combined_aqi(None, None), 0);
        assert_eq!(combined_aqi(Some(12.0), None), 50);
        assert_eq!(combined_aqi(None, Some(154.0)), 100);
        assert_eq!(combined_aqi(Some(12.0), Some(154.0)), 100);
        assert_eq!(combined_aqi(Some(55.4), Some(54.0)), 150);
        // out of table counts as zero
        assert_eq!(combined_aqi(Some(-5.0), Some(700.0)), 0);
    }

    #[test]
    fn test_calculation_is_repeatable() {
        let first = combined_aqi(Some(23.7), Some(88.0));
        let second = combined_aqi(Some(23.7), Some(88.0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_pm10_decimal_gap_is_undefined() {
        assert_eq!(sub_index(54.3, &PM10_BREAKPOINTS), None);
        assert_eq!(sub_index(154.5, &PM10_BREAKPOINTS), None);
        assert_eq!(combined_aqi(None, Some(54.3)), 0);
    }

    #[test]
    fn test_concentration_reads_pollutant_key() {
        let reading = PollutantReading::particulates(Some(12.0), None).with("ozone", Some(80.0));
        assert_eq!(Pollutant::Pm2_5.concentration(&reading), Some(12.0));
        assert_eq!(Pollutant::Pm10.concentration(&reading), None);
        assert_eq!(Pollutant::Pm10.key(), "pm10");
    }

    #[test]
    fn test_breakdown_dominant_pollutant() {
        let breakdown =
            AqiBreakdown::from_reading(&PollutantReading::particulates(Some(12.0), Some(154.0)));
        assert_eq!(breakdown.pm2_5_index, Some(50));
        assert_eq!(breakdown.pm10_index, Some(100));
        assert_eq!(breakdown.aqi, 100);
        assert_eq!(breakdown.dominant, Some(Pollutant::Pm10));

        let empty = AqiBreakdown::from_reading(&PollutantReading::new());
        assert_eq!(empty.aqi, 0);
        assert_eq!(empty.dominant, None);
    }
}
