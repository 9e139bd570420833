//! Naive multi-day AQI projection

use super::AqiValue;
use serde::Serialize;

/// Days projected from the current index
pub const PREDICTION_DAYS: u16 = 3;
/// Daily increment applied to the current index
pub const DAILY_STEP: AqiValue = 10;
/// Upper bound of the projected index
pub const PREDICTION_CAP: AqiValue = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayProjection {
    pub day: String,
    pub aqi: AqiValue,
}

pub type Prediction = Vec<DayProjection>;

/// Linear, capped extrapolation: day `i` (from 0) is `min(current + 10 * i, 500)`.
///
/// Not a forecast model; no history or external signal is used. An undefined
/// current index gives an empty projection.
#[must_use]
pub fn predict(current: Option<AqiValue>) -> Prediction {
    let Some(current) = current else {
        return Vec::new();
    };

    (0..PREDICTION_DAYS)
        .map(|i| DayProjection {
            day: format!("Day {}", i + 1),
            aqi: current
                .saturating_add(i * DAILY_STEP)
                .min(PREDICTION_CAP),
        })
        .collect()
}
