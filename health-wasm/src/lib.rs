//! Framework-neutral WASM <-> JavaScript bridge.

use chrono::Utc;
use health_core::{
    classify, DashboardError, Gender, HealthMetrics, KpiAggregator, KpiConfig, MetricKind,
    PatientFilters, SubjectReference, TrendMode,
};
use health_mock::{GeneratorConfig, MockStore};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsKpiConfig {
    #[serde(default)]
    trend_mode: Option<TrendMode>,
    #[serde(default)]
    trend_window: Option<usize>,
    #[serde(default)]
    stable_band_percent: Option<f64>,
}

impl From<JsKpiConfig> for KpiConfig {
    fn from(cfg: JsKpiConfig) -> Self {
        let mut base = KpiConfig::default();
        if let Some(mode) = cfg.trend_mode {
            base.trend_mode = mode;
        }
        if let Some(window) = cfg.trend_window {
            base.trend_window = window;
        }
        if let Some(band) = cfg.stable_band_percent {
            base.stable_band_percent = band;
        }
        base
    }
}

/// Subject data accepted from JS: either a gender or an explicit hemoglobin range.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsSubject {
    #[serde(default)]
    gender: Option<Gender>,
    #[serde(default)]
    hemoglobin_range: Option<health_core::ReferenceRange>,
}

impl From<JsSubject> for SubjectReference {
    fn from(subject: JsSubject) -> Self {
        let mut reference = subject
            .gender
            .map(SubjectReference::for_gender)
            .unwrap_or_default();
        if let Some(range) = subject.hemoglobin_range {
            reference.hemoglobin_range = range;
        }
        reference
    }
}

fn read_config(config: Option<JsValue>) -> Result<KpiConfig, JsValue> {
    let cfg = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsKpiConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            KpiConfig::from(cfg)
        }
        _ => KpiConfig::default(),
    };
    cfg.validate().map_err(dashboard_error)?;
    Ok(cfg)
}

fn read_subject(subject: Option<JsValue>) -> Result<SubjectReference, JsValue> {
    match subject {
        Some(js_subject) if !js_subject.is_undefined() && !js_subject.is_null() => {
            let subject: JsSubject = from_value(js_subject)
                .map_err(|err| JsValue::from_str(&format!("Could not read subject: {err}")))?;
            Ok(subject.into())
        }
        _ => Ok(SubjectReference::default()),
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Could not serialize result: {err}")))
}

fn dashboard_error(err: DashboardError) -> JsValue {
    JsValue::from_str(&format!("Dashboard error: {err}"))
}

/// Classifies one value; returns `{ status, percentage }`.
#[wasm_bindgen(js_name = classifyMetric)]
pub fn classify_metric(
    kind: &str,
    value: f64,
    subject: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let kind: MetricKind = kind.parse().map_err(dashboard_error)?;
    let subject = read_subject(subject)?;
    serialize(&classify(kind, value, &subject))
}

/// KPI list for a metric history (oldest first).
#[wasm_bindgen(js_name = aggregateKpis)]
pub fn aggregate_kpis(
    history: JsValue,
    subject: Option<JsValue>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let history: Vec<HealthMetrics> = from_value(history)
        .map_err(|err| dashboard_error(DashboardError::Parse(err.to_string())))?;
    let subject = read_subject(subject)?;
    let config = read_config(config)?;

    serialize(&KpiAggregator::new(config).aggregate(&history, &subject))
}

/// Handle to a generated mock store owned by the JS caller.
#[wasm_bindgen]
pub struct DashboardStore {
    inner: MockStore,
}

#[wasm_bindgen]
impl DashboardStore {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>, patient_count: Option<u32>) -> DashboardStore {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let mut config = GeneratorConfig {
            seed: seed.map(u64::from),
            ..GeneratorConfig::default()
        };
        if let Some(count) = patient_count {
            config.patient_count = count as usize;
        }

        DashboardStore {
            inner: MockStore::generate(&config, Utc::now()),
        }
    }

    pub fn patients(&self, filters: Option<JsValue>) -> Result<JsValue, JsValue> {
        let filters: PatientFilters = match filters {
            Some(js) if !js.is_undefined() && !js.is_null() => from_value(js)
                .map_err(|err| JsValue::from_str(&format!("Could not read filters: {err}")))?,
            _ => PatientFilters::default(),
        };
        serialize(&self.inner.patients(&filters))
    }

    pub fn patient(&self, id: &str) -> Result<JsValue, JsValue> {
        let patient = self.inner.require_patient(id).map_err(dashboard_error)?;
        serialize(patient)
    }

    pub fn metrics(&self, id: &str) -> Result<JsValue, JsValue> {
        serialize(&self.inner.metrics(id))
    }

    #[wasm_bindgen(js_name = latestMetrics)]
    pub fn latest_metrics(&self, id: &str) -> Result<JsValue, JsValue> {
        serialize(&self.inner.latest_metrics(id))
    }

    pub fn kpis(&self, id: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
        let config = read_config(config)?;
        serialize(&self.inner.kpis(id, &config))
    }

    pub fn doctors(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.doctors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = KpiConfig::from(JsKpiConfig {
            trend_mode: Some(TrendMode::History),
            trend_window: None,
            stable_band_percent: None,
        });
        assert_eq!(cfg.trend_mode, TrendMode::History);
        assert_eq!(cfg.trend_window, KpiConfig::default().trend_window);
    }

    #[test]
    fn explicit_range_overrides_gender() {
        let range = health_core::ReferenceRange::new(10.0, 13.0);
        let reference = SubjectReference::from(JsSubject {
            gender: Some(Gender::Male),
            hemoglobin_range: Some(range),
        });
        assert_eq!(reference.hemoglobin_range, range);

        let by_gender = SubjectReference::from(JsSubject {
            gender: Some(Gender::Female),
            hemoglobin_range: None,
        });
        assert_eq!(by_gender, SubjectReference::for_gender(Gender::Female));
    }
}
