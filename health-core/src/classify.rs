//! Status and percentage scoring for individual measurements.
//!
//! Every rule here is a pure function of the value and fixed clinical
//! constants. The percentage drives the progress bar on a KPI card: within a
//! status band it is the value's linear position inside a plausible span,
//! mapped onto that band's score range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{BoneInterpretation, LabFlag, ReferenceRange, GLUCOSE_RANGE};
use crate::patient::Gender;
use crate::DashboardError;

pub const OSTEOPOROSIS_T_SCORE: f64 = -2.5;
pub const OSTEOPENIA_T_SCORE: f64 = -1.0;
pub const VITAMIN_D_DEFICIENT: f64 = 20.0;
pub const VITAMIN_D_OPTIMAL: f64 = 40.0;
pub const VITAMIN_D_FULL_SCALE: f64 = 50.0;
pub const CALCIUM_LOW: f64 = 8.5;
pub const CALCIUM_HIGH: f64 = 10.5;
pub const CALCIUM_SCALE_FLOOR: f64 = 8.0;
pub const CALCIUM_SCALE_WIDTH: f64 = 4.0;

// Spans over which a value walks across its band's score range.
const T_SCORE_FLOOR: f64 = -4.0;
const T_SCORE_CEILING: f64 = 2.5;
const HEMOGLOBIN_EXCURSION: f64 = 3.0;
const GLUCOSE_FLOOR: f64 = 40.0;
const GLUCOSE_CEILING: f64 = 250.0;

const BMD_CRITICAL: ScoreBand = ScoreBand::half_open(20.0, 40.0);
const BMD_WARNING: ScoreBand = ScoreBand::half_open(40.0, 65.0);
const BMD_NORMAL: ScoreBand = ScoreBand::half_open(75.0, 90.0);
const BMD_GOOD: ScoreBand = ScoreBand::closed(90.0, 100.0);
const HEMOGLOBIN_LOW: ScoreBand = ScoreBand::half_open(30.0, 60.0);
const HEMOGLOBIN_HIGH: ScoreBand = ScoreBand::half_open(70.0, 95.0);
const HEMOGLOBIN_NORMAL: ScoreBand = ScoreBand::closed(85.0, 100.0);
const GLUCOSE_LOW: ScoreBand = ScoreBand::half_open(20.0, 50.0);
const GLUCOSE_HIGH: ScoreBand = ScoreBand::half_open(50.0, 80.0);
const GLUCOSE_NORMAL: ScoreBand = ScoreBand::closed(85.0, 100.0);

/// Severity of a KPI, ordered from worst to best.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KpiStatus {
    Critical,
    Warning,
    Normal,
    Good,
}

impl KpiStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Normal => "normal",
            Self::Good => "good",
        }
    }
}

impl fmt::Display for KpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The five metrics summarised as KPIs, in dashboard order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    #[serde(rename = "bmd")]
    BoneDensity,
    Hemoglobin,
    Glucose,
    VitaminD,
    Calcium,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        Self::BoneDensity,
        Self::Hemoglobin,
        Self::Glucose,
        Self::VitaminD,
        Self::Calcium,
    ];

    /// Stable identifier used as the KPI id.
    pub fn id(self) -> &'static str {
        match self {
            Self::BoneDensity => "bmd",
            Self::Hemoglobin => "hemoglobin",
            Self::Glucose => "glucose",
            Self::VitaminD => "vitamin-d",
            Self::Calcium => "calcium",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::BoneDensity => "Bone Mineral Density",
            Self::Hemoglobin => "Hemoglobin",
            Self::Glucose => "Blood Glucose",
            Self::VitaminD => "Vitamin D",
            Self::Calcium => "Calcium",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id())
    }
}

impl FromStr for MetricKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bmd" | "bone-density" | "t-score" => Ok(Self::BoneDensity),
            "hemoglobin" | "hgb" => Ok(Self::Hemoglobin),
            "glucose" | "blood-glucose" => Ok(Self::Glucose),
            "vitamin-d" | "vitamin_d" | "vitamind" => Ok(Self::VitaminD),
            "calcium" => Ok(Self::Calcium),
            _ => Err(DashboardError::UnknownMetric(s.to_string())),
        }
    }
}

/// Per-subject reference data needed by the rules that are not fixed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectReference {
    pub hemoglobin_range: ReferenceRange,
}

impl SubjectReference {
    pub fn for_gender(gender: Gender) -> Self {
        Self {
            hemoglobin_range: ReferenceRange::hemoglobin_for(gender),
        }
    }
}

impl Default for SubjectReference {
    fn default() -> Self {
        Self::for_gender(Gender::Male)
    }
}

/// Outcome of classifying one value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub status: KpiStatus,
    /// Always within `[0, 100]`.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneAssessment {
    pub interpretation: BoneInterpretation,
    pub classification: Classification,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabAssessment {
    pub flag: LabFlag,
    pub classification: Classification,
}

/// Classifies `value` under the rule for `kind`.
pub fn classify(kind: MetricKind, value: f64, subject: &SubjectReference) -> Classification {
    match kind {
        MetricKind::BoneDensity => classify_bone_density(value).classification,
        MetricKind::Hemoglobin => {
            classify_hemoglobin(value, subject.hemoglobin_range).classification
        }
        MetricKind::Glucose => classify_glucose(value).classification,
        MetricKind::VitaminD => classify_vitamin_d(value),
        MetricKind::Calcium => classify_calcium(value),
    }
}

pub fn classify_bone_density(t_score: f64) -> BoneAssessment {
    let (interpretation, status, percentage) = if t_score < OSTEOPOROSIS_T_SCORE {
        (
            BoneInterpretation::Osteoporosis,
            KpiStatus::Critical,
            BMD_CRITICAL.score(position(t_score, T_SCORE_FLOOR, OSTEOPOROSIS_T_SCORE)),
        )
    } else if t_score < OSTEOPENIA_T_SCORE {
        (
            BoneInterpretation::Osteopenia,
            KpiStatus::Warning,
            BMD_WARNING.score(position(t_score, OSTEOPOROSIS_T_SCORE, OSTEOPENIA_T_SCORE)),
        )
    } else if t_score > 0.0 {
        (
            BoneInterpretation::Normal,
            KpiStatus::Good,
            BMD_GOOD.score(position(t_score, 0.0, T_SCORE_CEILING)),
        )
    } else {
        (
            BoneInterpretation::Normal,
            KpiStatus::Normal,
            BMD_NORMAL.score(position(t_score, OSTEOPENIA_T_SCORE, 0.0)),
        )
    };

    BoneAssessment {
        interpretation,
        classification: Classification { status, percentage },
    }
}

/// Low below `range.min`, high above `range.max`.
pub fn classify_hemoglobin(value: f64, range: ReferenceRange) -> LabAssessment {
    if value < range.min {
        lab(
            LabFlag::Low,
            KpiStatus::Critical,
            HEMOGLOBIN_LOW.score(position(value, range.min - HEMOGLOBIN_EXCURSION, range.min)),
        )
    } else if value > range.max {
        lab(
            LabFlag::High,
            KpiStatus::Warning,
            HEMOGLOBIN_HIGH.score(position(value, range.max + HEMOGLOBIN_EXCURSION, range.max)),
        )
    } else {
        lab(
            LabFlag::Normal,
            KpiStatus::Normal,
            HEMOGLOBIN_NORMAL.score(centrality(value, range)),
        )
    }
}

/// Both 70 and 140 mg/dL are in range.
pub fn classify_glucose(value: f64) -> LabAssessment {
    if value < GLUCOSE_RANGE.min {
        lab(
            LabFlag::Low,
            KpiStatus::Critical,
            GLUCOSE_LOW.score(position(value, GLUCOSE_FLOOR, GLUCOSE_RANGE.min)),
        )
    } else if value > GLUCOSE_RANGE.max {
        lab(
            LabFlag::High,
            KpiStatus::Warning,
            GLUCOSE_HIGH.score(position(value, GLUCOSE_CEILING, GLUCOSE_RANGE.max)),
        )
    } else {
        lab(
            LabFlag::Normal,
            KpiStatus::Good,
            GLUCOSE_NORMAL.score(centrality(value, GLUCOSE_RANGE)),
        )
    }
}

pub fn classify_vitamin_d(value: f64) -> Classification {
    let status = if value < VITAMIN_D_DEFICIENT {
        KpiStatus::Warning
    } else if value > VITAMIN_D_OPTIMAL {
        KpiStatus::Good
    } else {
        KpiStatus::Normal
    };

    Classification {
        status,
        percentage: clamp_percentage(value * 100.0 / VITAMIN_D_FULL_SCALE),
    }
}

pub fn classify_calcium(value: f64) -> Classification {
    let status = if value < CALCIUM_LOW || value > CALCIUM_HIGH {
        KpiStatus::Warning
    } else {
        KpiStatus::Normal
    };

    Classification {
        status,
        percentage: clamp_percentage((value - CALCIUM_SCALE_FLOOR) * 100.0 / CALCIUM_SCALE_WIDTH),
    }
}

/// Percentage range a status band maps onto.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoreBand {
    floor: f64,
    ceiling: f64,
    includes_ceiling: bool,
}

impl ScoreBand {
    const fn half_open(floor: f64, ceiling: f64) -> Self {
        Self {
            floor,
            ceiling,
            includes_ceiling: false,
        }
    }

    const fn closed(floor: f64, ceiling: f64) -> Self {
        Self {
            floor,
            ceiling,
            includes_ceiling: true,
        }
    }

    /// `position` runs from 0 (least healthy edge) to 1 (healthiest edge).
    fn score(&self, position: f64) -> f64 {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
        let score = self.floor + (self.ceiling - self.floor) * position;
        if self.includes_ceiling {
            score.min(self.ceiling)
        } else {
            score.min(just_below(self.ceiling))
        }
    }
}

fn lab(flag: LabFlag, status: KpiStatus, percentage: f64) -> LabAssessment {
    LabAssessment {
        flag,
        classification: Classification { status, percentage },
    }
}

/// Linear position of `value` from `worst` (0) to `best` (1).
fn position(value: f64, worst: f64, best: f64) -> f64 {
    (value - worst) / (best - worst)
}

/// 1 at the centre of `range`, 0 at either bound.
fn centrality(value: f64, range: ReferenceRange) -> f64 {
    let half_width = (range.max - range.min) / 2.0;
    if half_width <= 0.0 {
        return 1.0;
    }
    1.0 - (value - range.midpoint()).abs() / half_width
}

fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

// Largest f64 strictly below a positive finite `value`.
fn just_below(value: f64) -> f64 {
    f64::from_bits(value.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in(pct: f64, floor: f64, ceiling: f64, ceiling_inclusive: bool) {
        let upper_ok = if ceiling_inclusive {
            pct <= ceiling
        } else {
            pct < ceiling
        };
        assert!(pct >= floor && upper_ok, "{pct} outside [{floor}, {ceiling})");
    }

    #[test]
    fn bone_density_boundaries() {
        let osteoporosis = classify_bone_density(-2.6);
        assert_eq!(osteoporosis.interpretation, BoneInterpretation::Osteoporosis);
        assert_eq!(osteoporosis.classification.status, KpiStatus::Critical);

        let at_cutoff = classify_bone_density(-2.5);
        assert_eq!(at_cutoff.interpretation, BoneInterpretation::Osteopenia);
        assert_eq!(at_cutoff.classification.status, KpiStatus::Warning);
        assert_eq!(at_cutoff.classification.percentage, 40.0);

        let at_minus_one = classify_bone_density(-1.0);
        assert_eq!(at_minus_one.interpretation, BoneInterpretation::Normal);
        assert_eq!(at_minus_one.classification.status, KpiStatus::Normal);
        assert_eq!(at_minus_one.classification.percentage, 75.0);

        let zero = classify_bone_density(0.0).classification;
        assert_eq!(zero.status, KpiStatus::Normal);
        assert_in(zero.percentage, 75.0, 90.0, false);

        let positive = classify_bone_density(0.1).classification;
        assert_eq!(positive.status, KpiStatus::Good);
        assert_in(positive.percentage, 90.0, 100.0, true);
    }

    #[test]
    fn bone_density_extremes_stay_in_band() {
        let very_low = classify_bone_density(-9.0).classification;
        assert_eq!(very_low.percentage, 20.0);
        let just_under = classify_bone_density(-2.500_000_000_000_001).classification;
        assert_eq!(just_under.status, KpiStatus::Critical);
        assert_in(just_under.percentage, 20.0, 40.0, false);
        assert_eq!(classify_bone_density(f64::INFINITY).classification.percentage, 100.0);
    }

    #[test]
    fn hemoglobin_uses_subject_range() {
        let male = ReferenceRange::hemoglobin_for(Gender::Male);
        let female = ReferenceRange::hemoglobin_for(Gender::Female);
        assert_eq!(male, ReferenceRange::new(12.0, 15.0));
        assert_eq!(female, ReferenceRange::new(11.0, 14.0));

        let reading = 11.5;
        assert_eq!(classify_hemoglobin(reading, male).flag, LabFlag::Low);
        assert_eq!(classify_hemoglobin(reading, female).flag, LabFlag::Normal);

        let high = classify_hemoglobin(14.5, female);
        assert_eq!(high.flag, LabFlag::High);
        assert_eq!(high.classification.status, KpiStatus::Warning);
        assert_in(high.classification.percentage, 70.0, 95.0, false);
    }

    #[test]
    fn hemoglobin_bounds_are_normal() {
        let range = ReferenceRange::new(12.0, 15.0);
        for value in [12.0, 13.5, 15.0] {
            let assessment = classify_hemoglobin(value, range);
            assert_eq!(assessment.classification.status, KpiStatus::Normal, "{value}");
            assert_in(assessment.classification.percentage, 85.0, 100.0, true);
        }
        assert_eq!(classify_hemoglobin(13.5, range).classification.percentage, 100.0);
    }

    #[test]
    fn glucose_scenarios() {
        let low = classify_glucose(65.0);
        assert_eq!(low.flag, LabFlag::Low);
        assert_eq!(low.classification.status, KpiStatus::Critical);
        assert_in(low.classification.percentage, 20.0, 50.0, false);

        let high = classify_glucose(200.0);
        assert_eq!(high.flag, LabFlag::High);
        assert_eq!(high.classification.status, KpiStatus::Warning);
        assert_in(high.classification.percentage, 50.0, 80.0, false);

        assert_eq!(classify_glucose(70.0).classification.status, KpiStatus::Good);
        assert_eq!(classify_glucose(140.0).classification.status, KpiStatus::Good);
    }

    #[test]
    fn glucose_far_out_of_range_still_classifies() {
        let assessment = classify_glucose(-500.0);
        assert_eq!(assessment.classification.status, KpiStatus::Critical);
        assert_eq!(assessment.classification.percentage, 20.0);
    }

    #[test]
    fn vitamin_d_rules() {
        assert_eq!(classify_vitamin_d(19.9).status, KpiStatus::Warning);
        assert_eq!(classify_vitamin_d(20.0).status, KpiStatus::Normal);
        assert_eq!(classify_vitamin_d(40.0).status, KpiStatus::Normal);

        let optimal = classify_vitamin_d(45.0);
        assert_eq!(optimal.status, KpiStatus::Good);
        assert_eq!(optimal.percentage, 90.0);
        assert_eq!(classify_vitamin_d(80.0).percentage, 100.0);
        assert_eq!(classify_vitamin_d(-3.0).percentage, 0.0);
    }

    #[test]
    fn calcium_rules() {
        assert_eq!(classify_calcium(8.5).status, KpiStatus::Normal);
        assert_eq!(classify_calcium(10.5).status, KpiStatus::Normal);
        assert_eq!(classify_calcium(8.4).status, KpiStatus::Warning);
        assert_eq!(classify_calcium(10.6).status, KpiStatus::Warning);
        assert_eq!(classify_calcium(10.0).percentage, 50.0);
        assert_eq!(classify_calcium(7.0).percentage, 0.0);
    }

    #[test]
    fn nan_is_deterministic_and_bounded() {
        for kind in MetricKind::ALL {
            let first = classify(kind, f64::NAN, &SubjectReference::default());
            let second = classify(kind, f64::NAN, &SubjectReference::default());
            assert_eq!(first, second);
            assert!((0.0..=100.0).contains(&first.percentage), "{kind}");
        }
    }

    #[test]
    fn metric_kind_parses_ids_and_aliases() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.id().parse::<MetricKind>().unwrap(), kind);
        }
        assert_eq!(" Vitamin_D ".parse::<MetricKind>().unwrap(), MetricKind::VitaminD);
        assert!(matches!(
            "cholesterol".parse::<MetricKind>(),
            Err(DashboardError::UnknownMetric(name)) if name == "cholesterol"
        ));
    }

    #[test]
    fn status_orders_worst_to_best() {
        assert!(KpiStatus::Critical < KpiStatus::Warning);
        assert!(KpiStatus::Warning < KpiStatus::Normal);
        assert!(KpiStatus::Normal < KpiStatus::Good);
    }
}
