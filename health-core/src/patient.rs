//! Patient demographics and list filtering.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    Active,
    Inactive,
    Pending,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 3] = [Self::Active, Self::Inactive, Self::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub provider: String,
    pub policy_number: String,
    pub group_number: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    Active,
    Resolved,
    Chronic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    pub condition: String,
    pub diagnosis_date: DateTime<Utc>,
    pub status: ConditionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: DateTime<Utc>,
    pub prescriber: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Medical record number.
    pub mrn: String,
    pub contact_info: ContactInfo,
    pub insurance: InsuranceInfo,
    pub primary_physician: String,
    #[serde(default)]
    pub medical_history: Vec<MedicalHistory>,
    #[serde(default)]
    pub current_medications: Vec<Medication>,
    pub status: PatientStatus,
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_appointment: Option<DateTime<Utc>>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Criteria for the patient list. Every populated field must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientFilters {
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub status: Option<PatientStatus>,
}

impl PatientFilters {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, patient: &Patient) -> bool {
        if let Some(status) = self.status {
            if patient.status != status {
                return false;
            }
        }

        if let Some(doctor) = self.doctor.as_deref().filter(|d| !d.is_empty()) {
            if patient.primary_physician != doctor {
                return false;
            }
        }

        let query = self
            .search_query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .unwrap_or_default();
        if query.is_empty() {
            return true;
        }

        [
            &patient.first_name,
            &patient.last_name,
            &patient.mrn,
            &patient.id,
            &patient.primary_physician,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        Patient {
            id: "PAT00007".to_string(),
            first_name: "David".to_string(),
            last_name: "Miller".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1956, 4, 12).unwrap(),
            gender: Gender::Male,
            mrn: "MRN-004211".to_string(),
            contact_info: ContactInfo {
                phone: "(312) 555-0199".to_string(),
                email: "david.miller@example.com".to_string(),
                address: Address {
                    street: "12 Main St".to_string(),
                    city: "Springfield".to_string(),
                    state: "IL".to_string(),
                    zip_code: "62701".to_string(),
                },
            },
            insurance: InsuranceInfo {
                provider: "Aetna".to_string(),
                policy_number: "POL-000001".to_string(),
                group_number: "GRP-0001".to_string(),
            },
            primary_physician: "Dr. Mark Chen".to_string(),
            medical_history: Vec::new(),
            current_medications: Vec::new(),
            status: PatientStatus::Active,
            last_visit: None,
            next_appointment: None,
        }
    }

    #[test]
    fn empty_filters_match_everyone() {
        assert!(PatientFilters::default().matches(&patient()));
        assert!(PatientFilters::search("   ").matches(&patient()));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let p = patient();
        for query in ["mill", "DAVID", "mrn-0042", "pat00007", "chen"] {
            assert!(PatientFilters::search(query).matches(&p), "{query}");
        }
        assert!(!PatientFilters::search("garcia").matches(&p));
    }

    #[test]
    fn status_and_doctor_combine_with_search() {
        let p = patient();
        let filters = PatientFilters {
            search_query: Some("david".to_string()),
            doctor: Some("Dr. Mark Chen".to_string()),
            status: Some(PatientStatus::Active),
        };
        assert!(filters.matches(&p));

        let wrong_status = PatientFilters {
            status: Some(PatientStatus::Pending),
            ..filters.clone()
        };
        assert!(!wrong_status.matches(&p));

        let wrong_doctor = PatientFilters {
            doctor: Some("Dr. Sarah Lee".to_string()),
            ..filters
        };
        assert!(!wrong_doctor.matches(&p));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(PatientStatus::parse(" Pending"), Some(PatientStatus::Pending));
        assert_eq!(PatientStatus::parse("all"), None);
    }
}
