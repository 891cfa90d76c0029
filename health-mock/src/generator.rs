//! Random synthesis of patients and monthly metric histories.
//!
//! Status and percentage fields are never drawn at random: each generated
//! reading is passed through the classifier in `health_core`.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use health_core::{
    classify_bone_density, classify_glucose, classify_hemoglobin, Address, BloodPressure,
    BmdResults, BmdSite, ConditionStatus, ContactInfo, Gender, HealthMetrics, InsuranceInfo,
    LabData, LabResults, Measurement, MedicalHistory, Medication, Patient, PatientStatus,
    ReferenceRange, TrendTag, VitalSigns, GLUCOSE_RANGE,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FIRST_NAMES: [&str; 20] = [
    "John", "Jane", "Robert", "Emily", "Michael", "Sarah", "David", "Lisa", "James", "Mary",
    "William", "Patricia", "Richard", "Jennifer", "Joseph", "Linda", "Thomas", "Barbara",
    "Christopher", "Elizabeth",
];

const LAST_NAMES: [&str; 20] = [
    "Doe", "Smith", "Johnson", "Williams", "Brown", "Davis", "Miller", "Wilson", "Moore", "Taylor",
    "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia", "Martinez",
    "Robinson",
];

pub const DOCTORS: [&str; 5] = [
    "Dr. Sarah Lee",
    "Dr. Mark Chen",
    "Dr. Alex Wong",
    "Dr. Emily Davis",
    "Dr. Michael Brown",
];

const INSURERS: [&str; 4] = ["BlueCross", "Aetna", "UnitedHealth", "Medicare"];

const CONDITIONS: [&str; 5] = [
    "Hypertension",
    "Type 2 Diabetes",
    "Arthritis",
    "Osteoporosis",
    "Hyperlipidemia",
];

// (name, dosage, frequency)
const MEDICATIONS: [(&str, &str, &str); 5] = [
    ("Metformin", "500mg", "Twice daily"),
    ("Lisinopril", "10mg", "Once daily"),
    ("Calcium", "1000mg", "Once daily"),
    ("Vitamin D", "2000 IU", "Once daily"),
    ("Atorvastatin", "20mg", "Once daily"),
];

const GENDERS: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
const SITES: [BmdSite; 3] = [BmdSite::LumbarSpine, BmdSite::FemoralNeck, BmdSite::TotalHip];
const TRENDS: [TrendTag; 3] = [TrendTag::Increasing, TrendTag::Stable, TrendTag::Decreasing];

/// Hemoglobin readings spread this far above the subject's baseline.
const HEMOGLOBIN_SPREAD: f64 = 4.0;

/// Produces synthetic patients and metrics relative to an anchor time.
pub struct MockGenerator<R: Rng> {
    rng: R,
    anchor: DateTime<Utc>,
}

impl MockGenerator<ChaCha8Rng> {
    pub fn seeded(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed), anchor)
    }
}

impl<R: Rng> MockGenerator<R> {
    pub fn new(rng: R, anchor: DateTime<Utc>) -> Self {
        Self { rng, anchor }
    }

    pub fn patients(&mut self, count: usize) -> Vec<Patient> {
        (0..count).map(|index| self.patient(index)).collect()
    }

    /// Patient number `index` (zero based); names cycle through fixed lists.
    pub fn patient(&mut self, index: usize) -> Patient {
        let first_name = FIRST_NAMES[index % FIRST_NAMES.len()];
        let last_name = LAST_NAMES[index % LAST_NAMES.len()];

        let birth_year = 1950 + (index % 40) as i32;
        let date_of_birth = NaiveDate::from_ymd_opt(
            birth_year,
            self.rng.gen_range(1..=12),
            self.rng.gen_range(1..=28),
        )
        .unwrap_or(NaiveDate::MIN);

        let contact_info = ContactInfo {
            phone: format!(
                "({}) {}-{:04}",
                self.rng.gen_range(100..1000),
                self.rng.gen_range(100..1000),
                self.rng.gen_range(0..10_000)
            ),
            email: format!(
                "{}.{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            ),
            address: Address {
                street: format!("{} Main St", self.rng.gen_range(1..10_000)),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: format!("{:05}", self.rng.gen_range(0..100_000)),
            },
        };

        let insurance = InsuranceInfo {
            provider: self.pick(&INSURERS).to_string(),
            policy_number: format!("POL-{:06}", self.rng.gen_range(0..1_000_000)),
            group_number: format!("GRP-{:04}", self.rng.gen_range(0..10_000)),
        };

        Patient {
            id: format!("PAT{:05}", index + 1),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            date_of_birth,
            gender: self.pick(&GENDERS),
            mrn: format!("MRN-{:06}", self.rng.gen_range(0..1_000_000)),
            contact_info,
            insurance,
            primary_physician: self.pick(&DOCTORS).to_string(),
            medical_history: self.medical_history(),
            current_medications: self.medications(),
            status: self.pick(&PatientStatus::ALL),
            last_visit: Some(self.days_ago(90)),
            next_appointment: Some(self.anchor + Duration::days(self.rng.gen_range(1..=60))),
        }
    }

    fn medical_history(&mut self) -> Vec<MedicalHistory> {
        let count = self.rng.gen_range(1..=3);
        (0..count)
            .map(|_| MedicalHistory {
                condition: self.pick(&CONDITIONS).to_string(),
                diagnosis_date: self.days_ago(365 * 5),
                status: self.pick(&[
                    ConditionStatus::Active,
                    ConditionStatus::Resolved,
                    ConditionStatus::Chronic,
                ]),
            })
            .collect()
    }

    fn medications(&mut self) -> Vec<Medication> {
        let count = self.rng.gen_range(1..=3);
        (0..count)
            .map(|_| {
                let (name, dosage, frequency) = self.pick(&MEDICATIONS);
                Medication {
                    name: name.to_string(),
                    dosage: dosage.to_string(),
                    frequency: frequency.to_string(),
                    start_date: self.days_ago(365),
                    prescriber: "Dr. Primary Physician".to_string(),
                }
            })
            .collect()
    }

    /// `months` monthly snapshots for `patient`, oldest first, the newest at the anchor.
    pub fn history(&mut self, patient: &Patient, months: u32) -> Vec<HealthMetrics> {
        (0..months)
            .map(|i| {
                let back = months - 1 - i;
                let at = self
                    .anchor
                    .checked_sub_months(Months::new(back))
                    .unwrap_or(self.anchor);
                self.snapshot(patient, at)
            })
            .collect()
    }

    fn snapshot(&mut self, patient: &Patient, at: DateTime<Utc>) -> HealthMetrics {
        let vitals = VitalSigns {
            blood_pressure: BloodPressure {
                systolic: self.whole(110, 140),
                diastolic: self.whole(70, 90),
                unit: "mmHg".to_string(),
            },
            heart_rate: Measurement::new(self.whole(60, 90), "bpm"),
            temperature: Measurement::new(self.uniform(97.5, 2.5), "°F"),
            oxygen_saturation: Measurement::new(self.whole(95, 100), "%"),
            respiratory_rate: Measurement::new(self.whole(14, 20), "breaths/min"),
        };

        let lab_results = LabResults {
            vitamin_d: self.uniform(20.0, 30.0),
            calcium: self.uniform(8.5, 2.0),
            cholesterol: None,
        };

        HealthMetrics {
            patient_id: patient.id.clone(),
            timestamp: at,
            vitals,
            lab_results,
            bone_mineral_density: self.bone_density(at),
            hemoglobin: self.hemoglobin(patient.gender, at),
            blood_glucose: self.glucose(at),
        }
    }

    fn bone_density(&mut self, at: DateTime<Utc>) -> BmdResults {
        let t_score = self.uniform(-2.5, 2.5);
        let assessment = classify_bone_density(t_score);

        BmdResults {
            measurement_date: at,
            t_score,
            z_score: self.uniform(-1.5, 1.5),
            bone_density_g_cm2: self.uniform(0.8, 0.5),
            site: self.pick(&SITES),
            interpretation: assessment.interpretation,
            previous_measurements: Vec::new(),
            status: assessment.classification.status,
            percentage: assessment.classification.percentage,
        }
    }

    /// Baseline comes from the subject's own gender.
    fn hemoglobin(&mut self, gender: Gender, at: DateTime<Utc>) -> LabData {
        let range = ReferenceRange::hemoglobin_for(gender);
        let value = self.uniform(range.min, HEMOGLOBIN_SPREAD);
        let assessment = classify_hemoglobin(value, range);

        LabData {
            value,
            unit: "g/dL".to_string(),
            measurement_date: at,
            status: assessment.flag,
            reference_range: range,
            trend: self.pick(&TRENDS),
            history: Vec::new(),
            kpi_status: assessment.classification.status,
            percentage: assessment.classification.percentage,
        }
    }

    fn glucose(&mut self, at: DateTime<Utc>) -> LabData {
        let value = self.uniform(GLUCOSE_RANGE.min, 80.0);
        let assessment = classify_glucose(value);

        LabData {
            value,
            unit: "mg/dL".to_string(),
            measurement_date: at,
            status: assessment.flag,
            reference_range: GLUCOSE_RANGE,
            trend: self.pick(&TRENDS),
            history: Vec::new(),
            kpi_status: assessment.classification.status,
            percentage: assessment.classification.percentage,
        }
    }

    fn uniform(&mut self, base: f64, spread: f64) -> f64 {
        base + self.rng.gen::<f64>() * spread
    }

    /// Whole number in `[low, high)`.
    fn whole(&mut self, low: i32, high: i32) -> f64 {
        f64::from(self.rng.gen_range(low..high))
    }

    fn pick<T: Copy>(&mut self, options: &[T]) -> T {
        // Every option list is a non-empty constant.
        *options
            .choose(&mut self.rng)
            .unwrap_or(&options[0])
    }

    fn days_ago(&mut self, max_days: i64) -> DateTime<Utc> {
        self.anchor - Duration::days(self.rng.gen_range(0..max_days))
    }
}
