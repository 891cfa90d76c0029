use health_core::{
    classify, classify_bone_density, classify_glucose, classify_hemoglobin, kpis_from_snapshot,
    KpiStatus, MetricKind, ReferenceRange, SubjectReference,
};
use proptest::prelude::*;

fn any_metric() -> impl Strategy<Value = MetricKind> {
    prop::sample::select(MetricKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn t_score_bands(t in -10.0..10.0f64) {
        let c = classify_bone_density(t).classification;
        if t < -2.5 {
            prop_assert_eq!(c.status, KpiStatus::Critical);
            prop_assert!(c.percentage >= 20.0 && c.percentage < 40.0);
        } else if t < -1.0 {
            prop_assert_eq!(c.status, KpiStatus::Warning);
            prop_assert!(c.percentage >= 40.0 && c.percentage < 65.0);
        } else if t <= 0.0 {
            prop_assert_eq!(c.status, KpiStatus::Normal);
            prop_assert!(c.percentage >= 75.0 && c.percentage < 90.0);
        } else {
            prop_assert_eq!(c.status, KpiStatus::Good);
            prop_assert!(c.percentage >= 90.0 && c.percentage <= 100.0);
        }
    }

    #[test]
    fn hemoglobin_against_baseline(value in 0.0..25.0f64, baseline in 10.0..13.0f64) {
        let range = ReferenceRange::new(baseline, baseline + 3.0);
        let c = classify_hemoglobin(value, range).classification;
        if value < baseline {
            prop_assert_eq!(c.status, KpiStatus::Critical);
            prop_assert!(c.percentage >= 30.0 && c.percentage < 60.0);
        } else if value > baseline + 3.0 {
            prop_assert_eq!(c.status, KpiStatus::Warning);
            prop_assert!(c.percentage >= 70.0 && c.percentage < 95.0);
        } else {
            prop_assert_eq!(c.status, KpiStatus::Normal);
            prop_assert!(c.percentage >= 85.0 && c.percentage <= 100.0);
        }
    }

    #[test]
    fn glucose_bands(value in -1000.0..1000.0f64) {
        let c = classify_glucose(value).classification;
        if value < 70.0 {
            prop_assert_eq!(c.status, KpiStatus::Critical);
            prop_assert!(c.percentage >= 20.0 && c.percentage < 50.0);
        } else if value > 140.0 {
            prop_assert_eq!(c.status, KpiStatus::Warning);
            prop_assert!(c.percentage >= 50.0 && c.percentage < 80.0);
        } else {
            prop_assert_eq!(c.status, KpiStatus::Good);
            prop_assert!(c.percentage >= 85.0 && c.percentage <= 100.0);
        }
    }

    #[test]
    fn percentage_always_within_bounds(kind in any_metric(), value in any::<f64>()) {
        let c = classify(kind, value, &SubjectReference::default());
        prop_assert!((0.0..=100.0).contains(&c.percentage), "{} -> {}", value, c.percentage);
    }

    #[test]
    fn classification_is_idempotent(kind in any_metric(), value in -500.0..500.0f64) {
        let subject = SubjectReference::default();
        let first = classify(kind, value, &subject);
        let second = classify(kind, value, &subject);
        prop_assert_eq!(first.status, second.status);
        prop_assert_eq!(first.percentage.to_bits(), second.percentage.to_bits());
    }
}

#[test]
fn boundary_values_are_exact() {
    let subject = SubjectReference::default();
    assert_eq!(classify(MetricKind::Glucose, 70.0, &subject).status, KpiStatus::Good);
    assert_eq!(classify(MetricKind::Glucose, 140.0, &subject).status, KpiStatus::Good);
    assert_eq!(classify(MetricKind::VitaminD, 20.0, &subject).status, KpiStatus::Normal);
    assert_eq!(classify(MetricKind::VitaminD, 40.0, &subject).status, KpiStatus::Normal);
    assert_eq!(classify(MetricKind::Calcium, 8.5, &subject).status, KpiStatus::Normal);
    assert_eq!(classify(MetricKind::Calcium, 10.5, &subject).status, KpiStatus::Normal);
    assert_eq!(classify(MetricKind::BoneDensity, -2.5, &subject).status, KpiStatus::Warning);
}

#[test]
fn aggregation_is_repeatable() {
    let raw = std::fs::read_to_string(format!(
        "{}/tests/data/female_patient_history.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let history: Vec<health_core::HealthMetrics> = serde_json::from_str(&raw).unwrap();
    let latest = history.last().unwrap();
    let subject = SubjectReference::default();

    assert_eq!(kpis_from_snapshot(latest, &subject), kpis_from_snapshot(latest, &subject));
}
