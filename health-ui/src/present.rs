//! Target-independent formatting used by the dashboard components.

use chrono::Datelike;
use health_core::{KpiStatus, Patient, TrendDirection};

/// Top-level views reachable from the navigation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Patients,
    Reports,
    Settings,
}

impl Route {
    pub const ALL: [Route; 4] = [Self::Dashboard, Self::Patients, Self::Reports, Self::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Patients => "Patients",
            Self::Reports => "Reports",
            Self::Settings => "Settings",
        }
    }
}

pub fn status_icon(status: KpiStatus) -> &'static str {
    match status {
        KpiStatus::Critical => "⚠️",
        KpiStatus::Warning => "⚡",
        KpiStatus::Normal => "✓",
        KpiStatus::Good => "✅",
    }
}

pub fn trend_icon(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "📈",
        TrendDirection::Down => "📉",
        TrendDirection::Stable => "➡️",
    }
}

pub fn format_value(value: f64) -> String {
    format!("{value:.1}")
}

/// Width style of a KPI progress bar.
pub fn bar_width(percentage: f64) -> String {
    format!("width: {:.0}%", percentage.clamp(0.0, 100.0))
}

/// SVG `points` attribute for a line over `values` scaled into `width` x `height`.
pub fn chart_points(values: &[f64], width: f64, height: f64) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    let step = if values.len() > 1 {
        width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = if values.len() > 1 { i as f64 * step } else { width / 2.0 };
            let y = if span > 0.0 {
                height - (value - min) / span * height
            } else {
                height / 2.0
            };
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short advice list shown beside the charts.
pub fn quick_insights(patient: Option<&Patient>) -> Vec<(&'static str, String)> {
    let mut insights = vec![
        ("💊", "Maintain calcium intake".to_string()),
        ("📊", "Monitor Vitamin D".to_string()),
    ];
    if let Some(next) = patient.and_then(|p| p.next_appointment) {
        insights.push((
            "📅",
            format!("Scheduled check-up: {} {}", month_abbrev(next.month()), next.day()),
        ));
    }
    insights
}

fn month_abbrev(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    month
        .checked_sub(1)
        .and_then(|index| MONTHS.get(index as usize))
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use health_core::{Address, ContactInfo, Gender, InsuranceInfo, PatientStatus};

    fn patient_with_appointment() -> Patient {
        Patient {
            id: "PAT00004".to_string(),
            first_name: "Emily".to_string(),
            last_name: "Davis".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1961, 2, 9).unwrap(),
            gender: Gender::Female,
            mrn: "MRN-118204".to_string(),
            contact_info: ContactInfo {
                phone: "(415) 555-0142".to_string(),
                email: "emily.davis@example.com".to_string(),
                address: Address {
                    street: "48 Oak Ave".to_string(),
                    city: "Portland".to_string(),
                    state: "OR".to_string(),
                    zip_code: "97201".to_string(),
                },
            },
            insurance: InsuranceInfo {
                provider: "Cigna".to_string(),
                policy_number: "POL-000004".to_string(),
                group_number: "GRP-0004".to_string(),
            },
            primary_physician: "Dr. Emily Park".to_string(),
            medical_history: Vec::new(),
            current_medications: Vec::new(),
            status: PatientStatus::Active,
            last_visit: None,
            next_appointment: Some(Utc.with_ymd_and_hms(2026, 11, 3, 10, 30, 0).unwrap()),
        }
    }

    #[test]
    fn chart_points_span_the_box() {
        assert_eq!(chart_points(&[0.0, 10.0], 100.0, 50.0), "0.0,50.0 100.0,0.0");
        assert_eq!(
            chart_points(&[2.0, 4.0, 3.0], 200.0, 40.0),
            "0.0,40.0 100.0,0.0 200.0,20.0"
        );
    }

    #[test]
    fn flat_or_single_series_sits_mid_height() {
        assert_eq!(chart_points(&[5.0, 5.0], 10.0, 8.0), "0.0,4.0 10.0,4.0");
        assert_eq!(chart_points(&[1.0], 10.0, 8.0), "5.0,4.0");
        assert_eq!(chart_points(&[], 10.0, 8.0), "");
    }

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(bar_width(42.4), "width: 42%");
        assert_eq!(bar_width(140.0), "width: 100%");
    }

    #[test]
    fn insights_without_patient_are_generic() {
        assert_eq!(quick_insights(None).len(), 2);
    }

    #[test]
    fn insights_include_next_appointment() {
        let patient = patient_with_appointment();
        let insights = quick_insights(Some(&patient));
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[2], ("📅", "Scheduled check-up: Nov 3".to_string()));
    }

    #[test]
    fn month_abbrev_rejects_out_of_range() {
        assert_eq!(month_abbrev(1), "Jan");
        assert_eq!(month_abbrev(12), "Dec");
        assert_eq!(month_abbrev(0), "");
        assert_eq!(month_abbrev(13), "");
    }

    #[test]
    fn routes_have_labels() {
        let labels: Vec<&str> = Route::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels, ["Dashboard", "Patients", "Reports", "Settings"]);
    }
}
