//! Core logic for the health dashboard: data model, KPI classification and
//! aggregation.

use serde::{Deserialize, Serialize};

pub mod classify;
pub mod kpi;
pub mod model;
pub mod patient;
pub mod trend;

pub use classify::{
    classify, classify_bone_density, classify_calcium, classify_glucose, classify_hemoglobin,
    classify_vitamin_d, BoneAssessment, Classification, KpiStatus, LabAssessment, MetricKind,
    SubjectReference,
};
pub use kpi::{kpis_from_snapshot, threshold_for, Kpi, KpiAggregator, Threshold};
pub use model::{
    BloodGlucoseData, BloodPressure, BmdHistory, BmdResults, BmdSite, BoneInterpretation,
    Cholesterol, HealthMetrics, HemoglobinData, LabData, LabFlag, LabHistory, LabResults,
    Measurement, ReferenceRange, VitalSigns, GLUCOSE_RANGE,
};
pub use patient::{
    Address, ConditionStatus, ContactInfo, Gender, InsuranceInfo, MedicalHistory, Medication,
    Patient, PatientFilters, PatientStatus,
};
pub use trend::{metric_series, trend_from_series, SeriesPoint, TrendData, TrendDirection, TrendTag};

/// How KPI trends are produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrendMode {
    /// Placeholder trends of the mock-data contract.
    #[default]
    Fixed,
    /// Trends computed from the recent measurement history.
    History,
}

/// Tuning for KPI aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KpiConfig {
    pub trend_mode: TrendMode,
    /// Number of most recent snapshots a history trend looks at.
    pub trend_window: usize,
    /// Changes up to this percentage are reported as stable.
    pub stable_band_percent: f64,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            trend_mode: TrendMode::Fixed,
            trend_window: 6,
            stable_band_percent: 1.0,
        }
    }
}

impl KpiConfig {
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.trend_window < 2 {
            return Err(DashboardError::InvalidConfig(format!(
                "trend_window must be at least 2, got {}",
                self.trend_window
            )));
        }
        if !self.stable_band_percent.is_finite() || self.stable_band_percent < 0.0 {
            return Err(DashboardError::InvalidConfig(format!(
                "stable_band_percent must be a non-negative number, got {}",
                self.stable_band_percent
            )));
        }
        Ok(())
    }
}

/// Errors raised at the dashboard's boundaries. Classification itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
    #[error("Patient not found: {0}")]
    PatientNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Could not read data: {0}")]
    Parse(String),
}
