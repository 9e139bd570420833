//! Recent particulate trend for charting

use serde::Serialize;

/// Number of samples kept per pollutant
pub const TREND_WINDOW: usize = 7;

/// Last valid particulate samples, oldest first.
///
/// Labels follow the PM2.5 series. When filtering removed a different number
/// of PM10 samples the two series have different lengths; `points` pairs them
/// by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub pm2_5: Vec<f64>,
    pub pm10: Vec<f64>,
}

/// One chart row
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint<'a> {
    pub label: &'a str,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
}

impl TrendSeries {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pm2_5.is_empty() && self.pm10.is_empty()
    }

    /// Rows by position, up to the length of the longer series
    pub fn points(&self) -> impl Iterator<Item = TrendPoint<'_>> {
        let rows = self.pm2_5.len().max(self.pm10.len());
        (0..rows).map(move |i| TrendPoint {
            label: self.labels.get(i).map_or("", String::as_str),
            pm2_5: self.pm2_5.get(i).copied(),
            pm10: self.pm10.get(i).copied(),
        })
    }
}

fn last_valid(samples: &[Option<f64>]) -> Vec<f64> {
    let valid: Vec<f64> = samples
        .iter()
        .filter_map(|s| *s)
        .filter(|v| !v.is_nan())
        .collect();
    let skip = valid.len().saturating_sub(TREND_WINDOW);
    valid[skip..].to_vec()
}

/// Build the trend from full chronological histories.
///
/// Missing and NaN samples are dropped per pollutant before the last
/// [`TREND_WINDOW`] values of each are taken.
#[must_use]
pub fn extract_trend(pm2_5: &[Option<f64>], pm10: &[Option<f64>]) -> TrendSeries {
    let pm2_5 = last_valid(pm2_5);
    let pm10 = last_valid(pm10);
    let labels = (1..=pm2_5.len()).map(|i| format!("Hour {i}")).collect();

    TrendSeries {
        labels,
        pm2_5,
        pm10,
    }
}
