use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use health_core::{
    classify, metric_series, DashboardError, Gender, KpiConfig, MetricKind, PatientFilters,
    PatientStatus, SubjectReference, TrendMode,
};
use health_mock::{GeneratorConfig, MockStore};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "health-cli",
    about = "Inspect mock patients and their health KPIs."
)]
struct Args {
    /// Seed for reproducible mock data.
    #[arg(long, env = "HEALTH_SEED", global = true)]
    seed: Option<u64>,

    /// Number of generated patients.
    #[arg(long, default_value_t = 30, global = true)]
    patients: usize,

    /// Monthly snapshots per patient.
    #[arg(long, default_value_t = 12, global = true)]
    months: u32,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List patients, optionally filtered.
    Patients {
        #[arg(short, long)]
        search: Option<String>,
        /// active, inactive or pending.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        doctor: Option<String>,
    },
    /// KPI cards for one patient.
    Kpis {
        #[arg(short, long)]
        patient: String,
        #[arg(long, value_enum, default_value_t = TrendArg::Fixed)]
        trend: TrendArg,
    },
    /// Classify a single value.
    Classify {
        /// bmd, hemoglobin, glucose, vitamin-d or calcium.
        metric: String,
        value: f64,
        #[arg(long, value_enum, default_value_t = GenderArg::Male)]
        gender: GenderArg,
    },
    /// Monthly values of one metric for a patient.
    History {
        #[arg(short, long)]
        patient: String,
        #[arg(short, long)]
        metric: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TrendArg {
    Fixed,
    History,
}

impl From<TrendArg> for TrendMode {
    fn from(arg: TrendArg) -> Self {
        match arg {
            TrendArg::Fixed => TrendMode::Fixed,
            TrendArg::History => TrendMode::History,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Other => Gender::Other,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "health_cli=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let generator = GeneratorConfig {
        patient_count: args.patients,
        history_months: args.months,
        seed: args.seed,
    };

    match &args.command {
        Command::Patients {
            search,
            status,
            doctor,
        } => {
            let status = status
                .as_deref()
                .map(|raw| {
                    PatientStatus::parse(raw)
                        .ok_or_else(|| DashboardError::Parse(format!("unknown status `{raw}`")))
                })
                .transpose()?;
            let filters = PatientFilters {
                search_query: search.clone(),
                doctor: doctor.clone(),
                status,
            };
            run_patients(&build_store(&generator), &filters, args.json)
        }
        Command::Kpis { patient, trend } => {
            let kpi_config = KpiConfig {
                trend_mode: (*trend).into(),
                ..KpiConfig::default()
            };
            run_kpis(&build_store(&generator), patient, &kpi_config, args.json)
        }
        Command::Classify {
            metric,
            value,
            gender,
        } => run_classify(metric, *value, (*gender).into(), args.json),
        Command::History { patient, metric } => {
            run_history(&build_store(&generator), patient, metric, args.json)
        }
    }
}

fn build_store(config: &GeneratorConfig) -> MockStore {
    let store = MockStore::generate(config, Utc::now());
    info!(seed = ?store.seed(), "mock data ready");
    store
}

fn run_patients(store: &MockStore, filters: &PatientFilters, json: bool) -> anyhow::Result<()> {
    let patients = store.patients(filters);
    debug!(matched = patients.len(), "patient filter applied");

    if json {
        println!("{}", serde_json::to_string_pretty(&patients)?);
        return Ok(());
    }

    for patient in &patients {
        println!(
            "{:<10} {:<24} {:<12} {:<20} {}",
            patient.id,
            patient.full_name(),
            patient.mrn,
            patient.primary_physician,
            patient.status.as_str()
        );
    }
    println!("{} of {} patients", patients.len(), store.all_patients().len());
    Ok(())
}

fn run_kpis(store: &MockStore, id: &str, config: &KpiConfig, json: bool) -> anyhow::Result<()> {
    config.validate()?;
    let patient = store
        .require_patient(id)
        .with_context(|| format!("Cannot show KPIs for {id}"))?;
    let kpis = store.kpis(id, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&kpis)?);
        return Ok(());
    }

    println!("{} ({})", patient.full_name(), patient.id);
    if kpis.is_empty() {
        println!("No metrics recorded.");
    }
    for kpi in &kpis {
        println!(
            "{:<22} {:>7.1} {:<8} {:<8} {:>5.1}%  {}",
            kpi.name,
            kpi.value,
            kpi.unit,
            kpi.status,
            kpi.percentage,
            kpi.trend.caption()
        );
    }
    Ok(())
}

fn run_classify(metric: &str, value: f64, gender: Gender, json: bool) -> anyhow::Result<()> {
    let kind: MetricKind = metric
        .parse()
        .with_context(|| format!("Cannot classify `{metric}`"))?;
    let result = classify(kind, value, &SubjectReference::for_gender(gender));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{}: {value} -> {} ({:.1}%)",
            kind.display_name(),
            result.status,
            result.percentage
        );
    }
    Ok(())
}

fn run_history(store: &MockStore, id: &str, metric: &str, json: bool) -> anyhow::Result<()> {
    let kind: MetricKind = metric
        .parse()
        .with_context(|| format!("Cannot show history for `{metric}`"))?;
    store
        .require_patient(id)
        .with_context(|| format!("Cannot show history for {id}"))?;
    let series = metric_series(store.metrics(id), kind);

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    let subject = store.subject_reference(id);
    for point in &series {
        let result = classify(kind, point.value, &subject);
        println!(
            "{}  {:>7.2}  {}",
            point.recorded_at.format("%Y-%m-%d"),
            point.value,
            result.status
        );
    }
    Ok(())
}
