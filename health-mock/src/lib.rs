//! In-memory patient and metric store backed by generated mock data.
//!
//! The store is an ordinary value: build it once at the composition root and
//! hand out references. Nothing here is global.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use health_core::{
    DashboardError, HealthMetrics, Kpi, KpiAggregator, KpiConfig, Patient, PatientFilters,
    SubjectReference,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub mod generator;

pub use generator::{MockGenerator, DOCTORS};

/// Size and seed of a generation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub patient_count: usize,
    /// Monthly snapshots per patient, the newest at the anchor time.
    pub history_months: u32,
    /// Fixed seed for reproducible data; a random one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            patient_count: 30,
            history_months: 12,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockStore {
    patients: Vec<Patient>,
    metrics: HashMap<String, Vec<HealthMetrics>>,
    seed: Option<u64>,
}

impl MockStore {
    /// Generates patients and their metric histories ending at `anchor`.
    pub fn generate(config: &GeneratorConfig, anchor: DateTime<Utc>) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut generator = MockGenerator::seeded(seed, anchor);

        let patients = generator.patients(config.patient_count);
        let metrics = patients
            .iter()
            .map(|patient| {
                (
                    patient.id.clone(),
                    generator.history(patient, config.history_months),
                )
            })
            .collect();

        info!(
            seed,
            patients = patients.len(),
            months = config.history_months,
            "generated mock store"
        );

        Self {
            patients,
            metrics,
            seed: Some(seed),
        }
    }

    /// Store over already prepared data; histories must be oldest first.
    pub fn from_parts(
        patients: Vec<Patient>,
        metrics: HashMap<String, Vec<HealthMetrics>>,
    ) -> Self {
        Self {
            patients,
            metrics,
            seed: None,
        }
    }

    /// Seed the data was generated from, if it was generated.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn all_patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Patients matching every populated filter, in generation order.
    pub fn patients(&self, filters: &PatientFilters) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|patient| filters.matches(patient))
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&Patient> {
        self.patients(&PatientFilters::search(query))
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|patient| patient.id == id)
    }

    pub fn require_patient(&self, id: &str) -> Result<&Patient, DashboardError> {
        self.patient(id).ok_or_else(|| {
            warn!(patient_id = id, "patient lookup failed");
            DashboardError::PatientNotFound(id.to_string())
        })
    }

    /// Metric history of `id`, oldest first; empty for unknown patients.
    pub fn metrics(&self, id: &str) -> &[HealthMetrics] {
        self.metrics.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn latest_metrics(&self, id: &str) -> Option<&HealthMetrics> {
        self.metrics(id).last()
    }

    /// Reference data of the patient; defaults when the patient is unknown.
    pub fn subject_reference(&self, id: &str) -> SubjectReference {
        self.patient(id)
            .map(|patient| SubjectReference::for_gender(patient.gender))
            .unwrap_or_default()
    }

    /// KPI list for `id`; empty when there is no history.
    pub fn kpis(&self, id: &str, config: &KpiConfig) -> Vec<Kpi> {
        let history = self.metrics(id);
        if history.is_empty() {
            debug!(patient_id = id, "no metrics for patient");
        }
        KpiAggregator::new(config.clone()).aggregate(history, &self.subject_reference(id))
    }

    /// Distinct primary physicians in first-seen order.
    pub fn doctors(&self) -> Vec<&str> {
        let mut doctors: Vec<&str> = Vec::new();
        for patient in &self.patients {
            let doctor = patient.primary_physician.as_str();
            if !doctors.contains(&doctor) {
                doctors.push(doctor);
            }
        }
        doctors
    }
}
