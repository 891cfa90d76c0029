//! Point-in-time health measurements as produced by the metric source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{KpiStatus, MetricKind};
use crate::patient::Gender;
use crate::trend::TrendTag;

/// Lower bound of the adult male hemoglobin band, g/dL.
pub const HEMOGLOBIN_BASELINE_MALE: f64 = 12.0;
/// Lower bound of the hemoglobin band for everyone else, g/dL.
pub const HEMOGLOBIN_BASELINE_OTHER: f64 = 11.0;
/// Width of the hemoglobin reference band above its baseline.
pub const HEMOGLOBIN_RANGE_WIDTH: f64 = 3.0;

pub const GLUCOSE_RANGE: ReferenceRange = ReferenceRange {
    min: 70.0,
    max: 140.0,
};

/// Clinically normal `[min, max]` band for a lab value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
}

impl ReferenceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Hemoglobin band for a subject of the given gender.
    pub fn hemoglobin_for(gender: Gender) -> Self {
        let baseline = match gender {
            Gender::Male => HEMOGLOBIN_BASELINE_MALE,
            Gender::Female | Gender::Other => HEMOGLOBIN_BASELINE_OTHER,
        };
        Self::new(baseline, baseline + HEMOGLOBIN_RANGE_WIDTH)
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// A scalar reading with its unit tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

impl Measurement {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    pub blood_pressure: BloodPressure,
    pub heart_rate: Measurement,
    pub temperature: Measurement,
    pub oxygen_saturation: Measurement,
    pub respiratory_rate: Measurement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabResults {
    /// ng/mL
    pub vitamin_d: f64,
    /// mg/dL
    pub calcium: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<Cholesterol>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cholesterol {
    pub total: f64,
    pub ldl: f64,
    pub hdl: f64,
    pub triglycerides: f64,
    pub unit: String,
}

/// Scan site of a bone density measurement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmdSite {
    LumbarSpine,
    FemoralNeck,
    TotalHip,
}

/// Clinical reading of a T-score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoneInterpretation {
    Normal,
    Osteopenia,
    Osteoporosis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BmdHistory {
    pub date: DateTime<Utc>,
    pub t_score: f64,
    pub z_score: f64,
    pub site: BmdSite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BmdResults {
    pub measurement_date: DateTime<Utc>,
    pub t_score: f64,
    pub z_score: f64,
    #[serde(rename = "boneDensityGcm2")]
    pub bone_density_g_cm2: f64,
    pub site: BmdSite,
    pub interpretation: BoneInterpretation,
    #[serde(default)]
    pub previous_measurements: Vec<BmdHistory>,
    pub status: KpiStatus,
    pub percentage: f64,
}

/// Where a lab value sits relative to its reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LabFlag {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabHistory {
    pub date: DateTime<Utc>,
    pub value: f64,
    pub status: LabFlag,
}

/// Hemoglobin and blood glucose share one shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabData {
    pub value: f64,
    pub unit: String,
    pub measurement_date: DateTime<Utc>,
    pub status: LabFlag,
    pub reference_range: ReferenceRange,
    pub trend: TrendTag,
    #[serde(default)]
    pub history: Vec<LabHistory>,
    pub kpi_status: KpiStatus,
    pub percentage: f64,
}

pub type HemoglobinData = LabData;
pub type BloodGlucoseData = LabData;

/// Bundle of every reading taken for a patient at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub patient_id: String,
    pub timestamp: DateTime<Utc>,
    pub vitals: VitalSigns,
    pub lab_results: LabResults,
    pub bone_mineral_density: BmdResults,
    pub hemoglobin: HemoglobinData,
    pub blood_glucose: BloodGlucoseData,
}

impl HealthMetrics {
    /// Raw value feeding the KPI of the given kind.
    pub fn value_of(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::BoneDensity => self.bone_mineral_density.t_score,
            MetricKind::Hemoglobin => self.hemoglobin.value,
            MetricKind::Glucose => self.blood_glucose.value,
            MetricKind::VitaminD => self.lab_results.vitamin_d,
            MetricKind::Calcium => self.lab_results.calcium,
        }
    }

    /// Date of the reading behind `kind`. Lab panel values carry no date of
    /// their own and use the snapshot timestamp.
    pub fn recorded_at(&self, kind: MetricKind) -> DateTime<Utc> {
        match kind {
            MetricKind::BoneDensity => self.bone_mineral_density.measurement_date,
            MetricKind::Hemoglobin => self.hemoglobin.measurement_date,
            MetricKind::Glucose => self.blood_glucose.measurement_date,
            MetricKind::VitaminD | MetricKind::Calcium => self.timestamp,
        }
    }
}
