//! Trend descriptors and chart series derived from metric history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::MetricKind;
use crate::model::HealthMetrics;

/// Period label attached to the fixed trend placeholders.
pub const FIXED_TREND_PERIOD: &str = "6M";

/// Three-way change tag carried by lab readings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendTag {
    Increasing,
    Stable,
    Decreasing,
}

/// Direction shown on a KPI card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl From<TrendTag> for TrendDirection {
    fn from(tag: TrendTag) -> Self {
        match tag {
            TrendTag::Increasing => Self::Up,
            TrendTag::Decreasing => Self::Down,
            TrendTag::Stable => Self::Stable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendData {
    pub direction: TrendDirection,
    pub percentage: f64,
    pub period: String,
}

impl TrendData {
    /// Placeholder trend with the standard six month period.
    pub fn fixed(direction: TrendDirection, percentage: f64) -> Self {
        Self {
            direction,
            percentage,
            period: FIXED_TREND_PERIOD.to_string(),
        }
    }

    /// Card caption, e.g. `2.5% 6M`.
    pub fn caption(&self) -> String {
        format!("{}% {}", self.percentage, self.period)
    }
}

/// One point of a metric's chart series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// Values of `kind` across `history`, oldest first.
pub fn metric_series(history: &[HealthMetrics], kind: MetricKind) -> Vec<SeriesPoint> {
    history
        .iter()
        .map(|snapshot| SeriesPoint {
            recorded_at: snapshot.recorded_at(kind),
            value: snapshot.value_of(kind),
        })
        .collect()
}

/// Summarises `values` (oldest first) as a trend.
///
/// The direction follows the sign of the least-squares slope; the percentage is
/// the absolute change from the first to the last value relative to the first,
/// rounded to one decimal. A change within `stable_band_percent` is reported as
/// stable. Non-finite values are ignored.
pub fn trend_from_series(values: &[f64], stable_band_percent: f64) -> TrendData {
    let points: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let period = format!("{}M", points.len());

    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return TrendData {
            direction: TrendDirection::Stable,
            percentage: 0.0,
            period,
        };
    };

    let change = if first.abs() < f64::EPSILON {
        0.0
    } else {
        ((last - first) / first.abs() * 100.0).abs()
    };
    let percentage = (change * 10.0).round() / 10.0;

    let slope = least_squares_slope(&points);
    let direction = if points.len() < 2 || change <= stable_band_percent || slope == 0.0 {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    TrendData {
        direction,
        percentage,
        period,
    }
}

fn least_squares_slope(points: &[f64]) -> f64 {
    let n = points.len() as f64;
    if points.len() < 2 {
        return 0.0;
    }
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = points.iter().sum::<f64>() / n;

    let (covariance, variance) = points
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(cov, var), (i, y)| {
            let dx = i as f64 - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

    covariance / variance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_rename_to_directions() {
        assert_eq!(TrendDirection::from(TrendTag::Increasing), TrendDirection::Up);
        assert_eq!(TrendDirection::from(TrendTag::Decreasing), TrendDirection::Down);
        assert_eq!(TrendDirection::from(TrendTag::Stable), TrendDirection::Stable);
    }

    #[test]
    fn increasing_series_trends_up() {
        let trend = trend_from_series(&[10.0, 10.5, 11.0, 12.0], 1.0);
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.percentage, 20.0);
        assert_eq!(trend.period, "4M");
    }

    #[test]
    fn decreasing_series_trends_down() {
        let trend = trend_from_series(&[-1.0, -1.2, -1.5], 1.0);
        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.percentage, 50.0);
    }

    #[test]
    fn small_change_is_stable() {
        let trend = trend_from_series(&[100.0, 100.4, 100.5], 1.0);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.percentage, 0.5);
    }

    #[test]
    fn short_or_empty_series_is_stable() {
        assert_eq!(trend_from_series(&[], 1.0).direction, TrendDirection::Stable);
        let single = trend_from_series(&[4.0, f64::NAN], 1.0);
        assert_eq!(single.direction, TrendDirection::Stable);
        assert_eq!(single.period, "1M");
    }

    #[test]
    fn caption_joins_percentage_and_period() {
        assert_eq!(TrendData::fixed(TrendDirection::Stable, 2.5).caption(), "2.5% 6M");
    }
}
