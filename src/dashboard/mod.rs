//! Dashboard state
//!
//! The dashboard is an immutable [`DashboardSnapshot`] value. Every change goes
//! through [`DashboardSnapshot::reduce`], a pure function of the previous
//! snapshot and a [`DashboardEvent`]. Each refresh carries a [`RequestToken`];
//! events belonging to a refresh older than the newest one started are ignored,
//! so a slow response can never overwrite a newer one.

pub mod render;
pub mod service;

pub use service::DashboardService;

use crate::aqi::{
    AqiBreakdown, Classification, Prediction, TrendSeries, extract_trend, predict,
};
use crate::AirDashError;
use crate::location_resolver::LocationSource;
use crate::models::{AirQualityData, AtmosphericConditions, Coordinates, Location, PollutantReading};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one refresh cycle; later refreshes get larger tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing request tokens
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: AtomicU64,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestToken {
        RequestToken(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Everything one successful fetch chain produced
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedData {
    pub location: Location,
    pub air_quality: AirQualityData,
    pub atmosphere: AtmosphericConditions,
    pub fetched_at: DateTime<Utc>,
}

/// Values derived from one pollutant reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    pub reading: PollutantReading,
    #[serde(flatten)]
    pub breakdown: AqiBreakdown,
    pub classification: Classification,
    pub trend: TrendSeries,
    pub prediction: Prediction,
}

impl AirQualityReport {
    /// Run calculator, classifier, trend extractor and prediction over fetched data
    #[must_use]
    pub fn derive(data: &AirQualityData) -> Self {
        let breakdown = AqiBreakdown::from_reading(&data.current);
        let classification = Classification::from(breakdown.aqi);
        let trend = extract_trend(&data.history.pm2_5, &data.history.pm10);
        let prediction = predict(Some(breakdown.aqi));

        Self {
            reading: data.current.clone(),
            breakdown,
            classification,
            trend,
            prediction,
        }
    }

    /// Report for hand-entered concentrations, with no history
    pub fn from_concentrations(pm2_5: Option<f64>, pm10: Option<f64>) -> Result<Self> {
        for value in [pm2_5, pm10].into_iter().flatten() {
            if !value.is_finite() || value < 0.0 {
                return Err(AirDashError::validation(format!(
                    "Concentration must be a non-negative number, got: {value}"
                ))
                .into());
            }
        }
        let data = AirQualityData {
            current: PollutantReading::particulates(pm2_5, pm10),
            ..AirQualityData::default()
        };
        Ok(Self::derive(&data))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    RefreshStarted {
        token: RequestToken,
        source: LocationSource,
    },
    RefreshCompleted {
        token: RequestToken,
        data: Box<FetchedData>,
    },
    RefreshFailed {
        token: RequestToken,
        message: String,
    },
}

impl DashboardEvent {
    #[must_use]
    pub fn token(&self) -> RequestToken {
        match self {
            DashboardEvent::RefreshStarted { token, .. }
            | DashboardEvent::RefreshCompleted { token, .. }
            | DashboardEvent::RefreshFailed { token, .. } => *token,
        }
    }
}

/// Immutable view of the dashboard handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Newest refresh that has started
    pub latest_request: Option<RequestToken>,
    pub status: RefreshStatus,
    /// What the pending or last refresh was asked for
    pub source: Option<LocationSource>,
    pub location: Option<Location>,
    /// Location of the last successful refresh
    pub last_known: Option<Location>,
    pub report: Option<AirQualityReport>,
    pub atmosphere: Option<AtmosphericConditions>,
    /// User-visible notice from a failed refresh
    pub notice: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub map_link: Option<String>,
}

impl DashboardSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `token` belongs to a refresh superseded by a newer one
    #[must_use]
    pub fn is_stale(&self, token: RequestToken) -> bool {
        self.latest_request.is_some_and(|latest| token < latest)
    }

    #[must_use]
    pub fn last_known_coordinates(&self) -> Option<Coordinates> {
        self.last_known.as_ref().map(|l| l.coordinates)
    }

    /// Produce the snapshot that follows `event`. `self` is left untouched.
    #[must_use]
    pub fn reduce(&self, event: DashboardEvent) -> Self {
        if self.is_stale(event.token()) {
            return self.clone();
        }

        match event {
            DashboardEvent::RefreshStarted { token, source } => Self {
                latest_request: Some(token),
                status: RefreshStatus::Loading,
                source: Some(source),
                notice: None,
                ..self.clone()
            },
            DashboardEvent::RefreshCompleted { token, data } => {
                let FetchedData {
                    location,
                    air_quality,
                    atmosphere,
                    fetched_at,
                } = *data;

                Self {
                    latest_request: Some(token),
                    status: RefreshStatus::Ready,
                    source: self.source.clone(),
                    map_link: Some(location.coordinates.map_link()),
                    last_known: Some(location.clone()),
                    location: Some(location),
                    report: Some(AirQualityReport::derive(&air_quality)),
                    atmosphere: Some(atmosphere),
                    notice: None,
                    updated_at: Some(fetched_at),
                }
            }
            DashboardEvent::RefreshFailed { token, message } => Self {
                latest_request: Some(token),
                status: RefreshStatus::Failed,
                source: self.source.clone(),
                location: None,
                last_known: self.last_known.clone(),
                report: None,
                atmosphere: None,
                notice: Some(message),
                updated_at: self.updated_at,
                map_link: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PollutantHistory;

    fn fetched(name: &str, pm2_5: f64) -> FetchedData {
        FetchedData {
            location: Location::new(52.52, 13.41, name.to_string()),
            air_quality: AirQualityData {
                observed_at: Some("2024-05-01T10:00".to_string()),
                current: PollutantReading::particulates(Some(pm2_5), Some(20.0)),
                history: PollutantHistory {
                    times: vec!["2024-05-01T09:00".into(), "2024-05-01T10:00".into()],
                    pm2_5: vec![Some(pm2_5 - 1.0), Some(pm2_5)],
                    pm10: vec![None, Some(20.0)],
                },
            },
            atmosphere: AtmosphericConditions {
                observed_at: Some("2024-05-01T10:00".to_string()),
                temperature: Some(15.0),
                relative_humidity: Some(70.0),
                pressure: Some(1013.0),
                wind_speed: Some(8.0),
                wind_direction: Some(90),
                weather_code: Some(0),
            },
            fetched_at: Utc::now(),
        }
    }

    fn started(snapshot: &DashboardSnapshot, token: RequestToken) -> DashboardSnapshot {
        snapshot.reduce(DashboardEvent::RefreshStarted {
            token,
            source: LocationSource::City("Berlin".to_string()),
        })
    }

    #[test]
    fn test_tokens_increase() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(second > first);
        assert_eq!(first.value(), 1);
    }

    #[test]
    fn test_completion_replaces_data() {
        let tracker = RequestTracker::new();
        let token = tracker.begin();
        let snapshot = started(&DashboardSnapshot::new(), token);
        assert_eq!(snapshot.status, RefreshStatus::Loading);

        let snapshot = snapshot.reduce(DashboardEvent::RefreshCompleted {
            token,
            data: Box::new(fetched("Berlin", 12.0)),
        });

        assert_eq!(snapshot.status, RefreshStatus::Ready);
        let report = snapshot.report.as_ref().unwrap();
        assert_eq!(report.breakdown.aqi, 50);
        assert_eq!(report.classification.label, "Good");
        assert_eq!(report.prediction.len(), 3);
        assert_eq!(report.trend.pm2_5, vec![11.0, 12.0]);
        assert_eq!(report.trend.pm10, vec![20.0]);
        assert_eq!(snapshot.last_known.as_ref().unwrap().name, "Berlin");
        assert!(snapshot.map_link.as_ref().unwrap().contains("openstreetmap"));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let tracker = RequestTracker::new();
        let old = tracker.begin();
        let new = tracker.begin();

        let snapshot = started(&DashboardSnapshot::new(), old);
        let snapshot = started(&snapshot, new);
        let snapshot = snapshot.reduce(DashboardEvent::RefreshCompleted {
            token: new,
            data: Box::new(fetched("Paris", 40.0)),
        });
        let after_stale = snapshot.reduce(DashboardEvent::RefreshCompleted {
            token: old,
            data: Box::new(fetched("Berlin", 5.0)),
        });

        assert_eq!(after_stale, snapshot);
        assert_eq!(after_stale.location.unwrap().name, "Paris");
    }

    #[test]
    fn test_stale_start_is_ignored() {
        let tracker = RequestTracker::new();
        let old = tracker.begin();
        let new = tracker.begin();

        let snapshot = started(&DashboardSnapshot::new(), new);
        let snapshot = started(&snapshot, old);
        assert_eq!(snapshot.latest_request, Some(new));
    }

    #[test]
    fn test_failure_keeps_last_known_location() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        let snapshot = started(&DashboardSnapshot::new(), first).reduce(
            DashboardEvent::RefreshCompleted {
                token: first,
                data: Box::new(fetched("Berlin", 12.0)),
            },
        );

        let second = tracker.begin();
        let snapshot = started(&snapshot, second).reduce(DashboardEvent::RefreshFailed {
            token: second,
            message: "Location not found: Atlantis".to_string(),
        });

        assert_eq!(snapshot.status, RefreshStatus::Failed);
        assert!(snapshot.report.is_none());
        assert!(snapshot.atmosphere.is_none());
        assert_eq!(snapshot.notice.as_deref(), Some("Location not found: Atlantis"));
        assert_eq!(
            snapshot.last_known_coordinates(),
            Some(Coordinates::new(52.52, 13.41))
        );
    }

    #[test]
    fn test_reduce_leaves_previous_snapshot_untouched() {
        let previous = DashboardSnapshot::new();
        let next = started(&previous, RequestToken(1));
        assert_eq!(previous, DashboardSnapshot::new());
        assert_ne!(previous, next);
    }

    #[test]
    fn test_report_without_particulates() {
        let report = AirQualityReport::derive(&AirQualityData::default());
        assert_eq!(report.breakdown.aqi, 0);
        assert_eq!(report.classification.label, "Good");
        assert!(report.trend.is_empty());
        assert_eq!(report.prediction.len(), 3);
    }

    #[test]
    fn test_report_from_concentrations() {
        let report = AirQualityReport::from_concentrations(Some(35.4), None).unwrap();
        assert_eq!(report.breakdown.aqi, 100);
        assert!(report.trend.is_empty());

        let err = AirQualityReport::from_concentrations(Some(-1.0), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AirDashError>(),
            Some(AirDashError::Validation { .. })
        ));
        assert!(AirQualityReport::from_concentrations(None, Some(f64::NAN)).is_err());
    }
}
