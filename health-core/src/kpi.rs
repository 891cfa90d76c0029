//! Reshapes the latest metric snapshot into the dashboard's KPI list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{classify, KpiStatus, MetricKind, SubjectReference};
use crate::model::HealthMetrics;
use crate::trend::{trend_from_series, TrendData, TrendDirection};
use crate::{KpiConfig, TrendMode};

pub const BMD_THRESHOLD: Threshold = Threshold::new(-2.5, -1.0, 0.0, 1.0);
pub const GLUCOSE_THRESHOLD: Threshold = Threshold::new(70.0, 100.0, 120.0, 140.0);
pub const VITAMIN_D_THRESHOLD: Threshold = Threshold::new(10.0, 20.0, 30.0, 40.0);
pub const CALCIUM_THRESHOLD: Threshold = Threshold::new(8.0, 8.5, 10.0, 10.5);

/// Four cut-points drawn on a KPI gauge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Threshold {
    pub critical: f64,
    pub warning: f64,
    pub normal: f64,
    pub good: f64,
}

impl Threshold {
    pub const fn new(critical: f64, warning: f64, normal: f64, good: f64) -> Self {
        Self {
            critical,
            warning,
            normal,
            good,
        }
    }
}

/// A named, classified summary of one metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: MetricKind,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: KpiStatus,
    pub threshold: Threshold,
    pub trend: TrendData,
    pub last_updated: DateTime<Utc>,
    pub percentage: f64,
}

/// Gauge cut-points for `kind`. Hemoglobin follows the subject's own range.
pub fn threshold_for(kind: MetricKind, subject: &SubjectReference) -> Threshold {
    match kind {
        MetricKind::BoneDensity => BMD_THRESHOLD,
        MetricKind::Hemoglobin => {
            let range = subject.hemoglobin_range;
            Threshold::new(range.min, range.min + 1.0, range.max - 1.0, range.max)
        }
        MetricKind::Glucose => GLUCOSE_THRESHOLD,
        MetricKind::VitaminD => VITAMIN_D_THRESHOLD,
        MetricKind::Calcium => CALCIUM_THRESHOLD,
    }
}

/// Trend placeholders of the mock-data contract. Bone density never carries a
/// computed trend here; the two labs rename their snapshot tag.
pub fn fixed_trend(kind: MetricKind, latest: &HealthMetrics) -> TrendData {
    match kind {
        MetricKind::BoneDensity => TrendData::fixed(TrendDirection::Stable, 2.5),
        MetricKind::Hemoglobin => TrendData::fixed(latest.hemoglobin.trend.into(), 3.2),
        MetricKind::Glucose => TrendData::fixed(latest.blood_glucose.trend.into(), 1.8),
        MetricKind::VitaminD => TrendData::fixed(TrendDirection::Stable, 5.0),
        MetricKind::Calcium => TrendData::fixed(TrendDirection::Stable, 2.1),
    }
}

/// Five KPIs for `latest`, in `MetricKind::ALL` order, with fixed trends.
pub fn kpis_from_snapshot(latest: &HealthMetrics, subject: &SubjectReference) -> Vec<Kpi> {
    build_kpis(latest, subject, |kind| fixed_trend(kind, latest))
}

fn build_kpis(
    latest: &HealthMetrics,
    subject: &SubjectReference,
    trend_of: impl Fn(MetricKind) -> TrendData,
) -> Vec<Kpi> {
    MetricKind::ALL
        .into_iter()
        .map(|kind| {
            let value = latest.value_of(kind);
            let classification = classify(kind, value, subject);
            Kpi {
                id: kind,
                name: kind.display_name().to_string(),
                value,
                unit: unit_of(kind, latest),
                status: classification.status,
                threshold: threshold_for(kind, subject),
                trend: trend_of(kind),
                last_updated: latest.recorded_at(kind),
                percentage: classification.percentage,
            }
        })
        .collect()
}

fn unit_of(kind: MetricKind, latest: &HealthMetrics) -> String {
    match kind {
        MetricKind::BoneDensity => "T-Score".to_string(),
        MetricKind::Hemoglobin => latest.hemoglobin.unit.clone(),
        MetricKind::Glucose => latest.blood_glucose.unit.clone(),
        MetricKind::VitaminD => "ng/mL".to_string(),
        MetricKind::Calcium => "mg/dL".to_string(),
    }
}

/// Builds KPI lists from a patient's history under a [`KpiConfig`].
#[derive(Debug, Clone, Default)]
pub struct KpiAggregator {
    config: KpiConfig,
}

impl KpiAggregator {
    pub fn new(config: KpiConfig) -> Self {
        Self { config }
    }

    /// KPIs for the newest snapshot of `history` (oldest first). An empty
    /// history yields an empty list.
    pub fn aggregate(&self, history: &[HealthMetrics], subject: &SubjectReference) -> Vec<Kpi> {
        let Some(latest) = history.last() else {
            debug!("no metrics recorded, returning empty KPI list");
            return Vec::new();
        };

        debug!(
            patient_id = %latest.patient_id,
            snapshots = history.len(),
            trend_mode = ?self.config.trend_mode,
            "aggregating KPIs"
        );

        match self.config.trend_mode {
            TrendMode::Fixed => kpis_from_snapshot(latest, subject),
            TrendMode::History => {
                let window_start = history.len().saturating_sub(self.config.trend_window);
                let window = &history[window_start..];
                build_kpis(latest, subject, |kind| {
                    let values: Vec<f64> = window.iter().map(|m| m.value_of(kind)).collect();
                    trend_from_series(&values, self.config.stable_band_percent)
                })
            }
        }
    }
}
