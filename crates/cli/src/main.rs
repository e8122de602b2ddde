//! Command-line front end for the triage engine.
//!
//! Reads intake payloads and stored records from disk, runs them through `triage-core` and
//! prints the result. Nothing is written back; `conclude` prints the concluded record as YAML
//! on stdout for the caller to store.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::{
    constants::MISSING_VITALS_ENV, criteria, missing_vitals_policy_from_env_value, Intake,
    IntakeFile, NonEmptyText, PatientId, RiskTier, TriageConfig, TriageRecord, TriageRecordFile,
    WaitPolicy,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Emergency triage risk classification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an intake file without opening a record
    Classify {
        /// Intake payload (.yaml, .yml or .json)
        intake: PathBuf,
    },
    /// Open a record from an intake file, conclude it and print it as YAML
    Conclude {
        /// Intake payload (.yaml, .yml or .json)
        intake: PathBuf,
        /// Patient identifier (32 lowercase hex characters)
        #[arg(long)]
        patient_id: String,
        /// Patient display name
        #[arg(long)]
        patient_name: String,
        /// Identifier of the operator concluding the triage
        #[arg(long)]
        operator: String,
        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// List the tiers with their maximum waits and display criteria
    Tiers,
    /// Report whether a stored record has exceeded its wait bound
    Overdue {
        /// Stored triage record (YAML)
        record: PathBuf,
        /// Instant to check against, RFC 3339 (defaults to now)
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { intake } => classify(&intake),
        Commands::Conclude {
            intake,
            patient_id,
            patient_name,
            operator,
            json,
        } => conclude(&intake, &patient_id, &patient_name, &operator, json),
        Commands::Tiers => {
            print_tiers();
            Ok(())
        }
        Commands::Overdue { record, now } => overdue(&record, now.as_deref()),
    }
}

fn load_config() -> anyhow::Result<TriageConfig> {
    let policy = missing_vitals_policy_from_env_value(std::env::var(MISSING_VITALS_ENV).ok())
        .with_context(|| format!("invalid {MISSING_VITALS_ENV}"))?;
    tracing::debug!(missing_vitals = %policy, "configuration resolved");
    Ok(TriageConfig::new(policy))
}

fn read_intake(path: &Path) -> anyhow::Result<Intake> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read intake {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str());
    IntakeFile::parse_by_extension(&text, extension)
        .with_context(|| format!("invalid intake {}", path.display()))
}

fn classify(path: &Path) -> anyhow::Result<()> {
    let intake = read_intake(path)?;
    let classification = intake.evaluate()?;
    let tier = classification.tier;

    println!(
        "{} ({}), see within {} minutes",
        tier.label(),
        tier.color(),
        WaitPolicy::max_wait_minutes(tier)
    );
    for rule in &classification.triggered {
        println!("  - {}", rule.description());
    }

    let annotations = intake.annotations();
    if !annotations.is_empty() {
        println!("Notes:");
        for a in annotations {
            println!(
                "  {} [{}] matched \"{}\"",
                a.criterion.description, a.criterion.tier, a.keyword
            );
        }
    }
    Ok(())
}

fn conclude(
    path: &Path,
    patient_id: &str,
    patient_name: &str,
    operator: &str,
    json: bool,
) -> anyhow::Result<()> {
    let cfg = load_config()?;
    let intake = read_intake(path)?;
    let patient_id = PatientId::parse(patient_id)?;
    let patient_name = NonEmptyText::new(patient_name).context("patient name")?;

    let mut record = TriageRecord::create(patient_id, patient_name);
    intake.apply_to(&mut record)?;
    record.conclude_with(operator, &cfg, Utc::now())?;

    let rendered = if json {
        TriageRecordFile::render_json(&record)?
    } else {
        TriageRecordFile::render(&record)?
    };
    println!("{rendered}");
    Ok(())
}

fn print_tiers() {
    for tier in RiskTier::ALL {
        println!(
            "{:<10} {:<7} {:>4} min",
            tier.label(),
            tier.color(),
            WaitPolicy::max_wait_minutes(tier)
        );
        for description in criteria::descriptions_for(tier) {
            println!("    {description}");
        }
    }
}

fn overdue(path: &Path, now: Option<&str>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;
    let record = TriageRecordFile::parse(&text)
        .with_context(|| format!("invalid record {}", path.display()))?;

    let now = match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --now: {raw}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let Some(conclusion) = record.conclusion() else {
        println!("{} is pending", record.id());
        return Ok(());
    };
    let waited = record.elapsed_minutes(now).unwrap_or_default();
    let status = if record.is_overdue(now) {
        "OVERDUE"
    } else {
        "within bound"
    };
    println!(
        "{} {} waited {waited} of {} minutes: {status}",
        record.id(),
        conclusion.tier,
        conclusion.wait_bound_minutes
    );
    Ok(())
}
