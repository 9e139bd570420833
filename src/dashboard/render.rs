//! Plain-text rendering of a dashboard snapshot

use super::{AirQualityReport, DashboardSnapshot, RefreshStatus};
use crate::aqi::TrendSeries;
use crate::models::AtmosphericConditions;
use std::fmt::{self, Display};

/// Width of the longest trend bar in characters
const BAR_WIDTH: f64 = 30.0;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH).round().max(0.0) as usize;
    "█".repeat(len)
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"))
}

/// Trend rows with a bar per value
#[must_use]
pub fn render_trend(trend: &TrendSeries) -> String {
    let max = trend
        .pm2_5
        .iter()
        .chain(trend.pm10.iter())
        .copied()
        .fold(0.0_f64, f64::max);

    trend
        .points()
        .map(|point| {
            format!(
                "   {:<8} PM2.5 {:>6} {:<30} PM10 {:>6} {}\n",
                point.label,
                format_value(point.pm2_5),
                point.pm2_5.map(|v| bar(v, max)).unwrap_or_default(),
                format_value(point.pm10),
                point.pm10.map(|v| bar(v, max)).unwrap_or_default(),
            )
        })
        .collect()
}

impl Display for AirQualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "🌫️ AQI {} - {} [{}]",
            self.breakdown.aqi, self.classification.label, self.classification.color
        )?;
        writeln!(f, "   {}", self.classification.advisory)?;

        writeln!(f, "🧪 Pollutants (µg/m³)")?;
        for (pollutant, value) in self.reading.iter() {
            writeln!(f, "   {:<18} {}", pollutant, format_value(value))?;
        }

        if !self.trend.is_empty() {
            writeln!(f, "📈 Recent trend")?;
            write!(f, "{}", render_trend(&self.trend))?;
        }

        if !self.prediction.is_empty() {
            writeln!(f, "🔮 Projection")?;
            for day in &self.prediction {
                writeln!(f, "   {:<6} AQI {}", day.day, day.aqi)?;
            }
        }
        Ok(())
    }
}

impl Display for AtmosphericConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🌤️ {}", self.description())?;
        writeln!(f, "   Temperature: {}", self.format_temperature())?;
        writeln!(f, "   Humidity:    {}", self.format_humidity())?;
        writeln!(f, "   Pressure:    {}", self.format_pressure())?;
        writeln!(f, "   Wind:        {}", self.format_wind())
    }
}

impl Display for DashboardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            RefreshStatus::Idle => return writeln!(f, "No data yet."),
            RefreshStatus::Loading => return writeln!(f, "Loading..."),
            RefreshStatus::Failed => {
                return writeln!(
                    f,
                    "⚠️ {}",
                    self.notice.as_deref().unwrap_or("Refresh failed")
                );
            }
            RefreshStatus::Ready => {}
        }

        if let Some(location) = &self.location {
            writeln!(f, "📍 {} ({})", location.display_name(), location.coordinates.format())?;
        }
        if let Some(link) = &self.map_link {
            writeln!(f, "🗺️ {link}")?;
        }
        if let Some(updated_at) = self.updated_at {
            writeln!(f, "⏰ Updated {}", updated_at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        if let Some(report) = &self.report {
            write!(f, "{report}")?;
        }
        if let Some(atmosphere) = &self.atmosphere {
            write!(f, "{atmosphere}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::extract_trend;
    use crate::dashboard::{AirQualityReport, RequestToken};
    use crate::models::{AirQualityData, PollutantReading};

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10.0, 10.0).chars().count(), 30);
        assert_eq!(bar(5.0, 10.0).chars().count(), 15);
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(3.0, 0.0), "");
    }

    #[test]
    fn test_render_trend_rows() {
        let trend = extract_trend(&[Some(10.0), Some(20.0)], &[Some(40.0)]);
        let rendered = render_trend(&trend);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Hour 1"));
        assert!(lines[1].contains("n/a"));
        assert!(rendered.ends_with('\n'));
        assert_eq!(rendered.matches('\n').count(), 2);
    }

    #[test]
    fn test_report_rendering() {
        let data = AirQualityData {
            current: PollutantReading::particulates(Some(40.0), Some(60.0)),
            ..AirQualityData::default()
        };
        let rendered = AirQualityReport::derive(&data).to_string();
        assert!(rendered.contains("Unhealthy for Sensitive Groups"));
        assert!(rendered.contains("Day 3"));
        assert!(!rendered.contains("Recent trend"));
    }

    #[test]
    fn test_failed_snapshot_shows_notice() {
        let snapshot = DashboardSnapshot {
            latest_request: Some(RequestToken(3)),
            status: RefreshStatus::Failed,
            notice: Some("Location not found: Atlantis".to_string()),
            ..DashboardSnapshot::default()
        };
        assert_eq!(snapshot.to_string(), "⚠️ Location not found: Atlantis\n");
    }
}
