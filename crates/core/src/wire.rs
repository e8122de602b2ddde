//! Wire models for triage records and intake payloads.
//!
//! Responsibilities:
//! - Define strict wire structs (`deny_unknown_fields`) for YAML and JSON
//! - Translate between wire structs and domain types
//! - Reject stored records whose parts contradict each other (a pending record carrying
//!   a conclusion, a tier or rule list the record's own vitals do not produce, a
//!   conclusion stamped before the record was opened, and so on)
//!
//! Storing the YAML is the caller's concern; this module only converts text.

use crate::classifier::{Classification, RiskClassifier, Rule};
use crate::intake::Intake;
use crate::record::{Conclusion, TriageRecord, TriageStatus};
use crate::tier::RiskTier;
use crate::validation::{validate_chief_complaint, validate_operator_id, validate_vitals};
use crate::vitals::{Consciousness, VitalSigns, VitalsUpdate};
use crate::wait_policy::WaitPolicy;
use crate::{TriageError, TriageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage_types::{NonEmptyText, SymptomSet};
use triage_uuid::{PatientId, TriageId};

// ============================================================================
// Public operations
// ============================================================================

/// YAML form of a [`TriageRecord`].
pub struct TriageRecordFile;

impl TriageRecordFile {
    /// Parse a triage record from YAML text.
    ///
    /// Schema mismatches are reported with the path of the failing field
    /// (e.g. `vitals.heart_rate`).
    ///
    /// # Errors
    ///
    /// Returns [`TriageError`] if:
    /// - the YAML does not match the wire schema or contains unknown keys,
    /// - an identifier is not in canonical form,
    /// - `created_at` differs from the timestamp carried in the triage id,
    /// - status and conclusion disagree, or the wait bound does not match the tier,
    /// - the stored tier or triggered rules differ from what the stored vitals and
    ///   symptoms classify as, or the conclusion predates `created_at`,
    /// - the stored vitals are out of range.
    pub fn parse(yaml_text: &str) -> TriageResult<TriageRecord> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire: RecordWire = serde_path_to_error::deserialize(deserializer)
            .map_err(|err| schema_error("Triage record", err))?;
        record_wire_to_domain(wire)
    }

    /// Render a triage record as YAML text.
    pub fn render(record: &TriageRecord) -> TriageResult<String> {
        serde_yaml::to_string(&record_domain_to_wire(record))
            .map_err(TriageError::YamlSerialization)
    }

    /// Render a triage record as pretty-printed JSON.
    pub fn render_json(record: &TriageRecord) -> TriageResult<String> {
        serde_json::to_string_pretty(&record_domain_to_wire(record))
            .map_err(TriageError::JsonSerialization)
    }
}

/// YAML or JSON form of an [`Intake`].
pub struct IntakeFile;

impl IntakeFile {
    pub fn parse_yaml(yaml_text: &str) -> TriageResult<Intake> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire: IntakeWire = serde_path_to_error::deserialize(deserializer)
            .map_err(|err| schema_error("Intake", err))?;
        intake_wire_to_domain(wire)
    }

    pub fn parse_json(json_text: &str) -> TriageResult<Intake> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let wire: IntakeWire = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|err| schema_error("Intake", err))?;
        intake_wire_to_domain(wire)
    }

    /// Picks the parser from a file extension; anything other than `json` is read as YAML.
    pub fn parse_by_extension(text: &str, extension: Option<&str>) -> TriageResult<Intake> {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::parse_json(text),
            _ => Self::parse_yaml(text),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct VitalsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    systolic_bp: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diastolic_bp: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    heart_rate: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    respiratory_rate: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    oxygen_saturation: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    glucose: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    consciousness: Option<Consciousness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    glasgow_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pain_score: Option<u8>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct PatientWire {
    id: PatientId,
    name: NonEmptyText,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConclusionWire {
    tier: RiskTier,
    wait_bound_minutes: u32,
    concluded_by: NonEmptyText,
    concluded_at: DateTime<Utc>,
    #[serde(default)]
    triggered: Vec<Rule>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct RecordWire {
    triage_id: TriageId,
    patient: PatientWire,
    created_at: DateTime<Utc>,
    status: TriageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chief_complaint: Option<String>,
    #[serde(default)]
    symptoms: SymptomSet,
    #[serde(default)]
    vitals: VitalsWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conclusion: Option<ConclusionWire>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct IntakeWire {
    #[serde(default)]
    chief_complaint: Option<String>,
    #[serde(default)]
    symptoms: SymptomSet,
    #[serde(default)]
    vitals: VitalsWire,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn schema_error<E: std::fmt::Display>(what: &str, err: serde_path_to_error::Error<E>) -> TriageError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    TriageError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}

fn vitals_wire_to_update(wire: &VitalsWire) -> VitalsUpdate {
    let mut update = VitalsUpdate::new();
    if let Some(v) = wire.systolic_bp {
        update = update.systolic_bp(v);
    }
    if let Some(v) = wire.diastolic_bp {
        update = update.diastolic_bp(v);
    }
    if let Some(v) = wire.heart_rate {
        update = update.heart_rate(v);
    }
    if let Some(v) = wire.respiratory_rate {
        update = update.respiratory_rate(v);
    }
    if let Some(v) = wire.temperature {
        update = update.temperature(v);
    }
    if let Some(v) = wire.oxygen_saturation {
        update = update.oxygen_saturation(v);
    }
    if let Some(v) = wire.glucose {
        update = update.glucose(v);
    }
    if let Some(v) = wire.consciousness {
        update = update.consciousness(v);
    }
    if let Some(v) = wire.glasgow_score {
        update = update.glasgow_score(v);
    }
    if let Some(v) = wire.pain_score {
        update = update.pain_score(v);
    }
    update
}

fn vitals_domain_to_wire(vitals: &VitalSigns) -> VitalsWire {
    VitalsWire {
        systolic_bp: vitals.systolic_bp,
        diastolic_bp: vitals.diastolic_bp,
        heart_rate: vitals.heart_rate,
        respiratory_rate: vitals.respiratory_rate,
        temperature: vitals.temperature,
        oxygen_saturation: vitals.oxygen_saturation,
        glucose: vitals.glucose,
        consciousness: Some(vitals.consciousness),
        glasgow_score: Some(vitals.glasgow_score),
        pain_score: Some(vitals.pain_score),
    }
}

fn conclusion_wire_to_domain(
    wire: ConclusionWire,
    derived: &Classification,
    created_at: DateTime<Utc>,
) -> TriageResult<Conclusion> {
    let expected = WaitPolicy::max_wait_minutes(wire.tier);
    if wire.wait_bound_minutes != expected {
        return Err(TriageError::Translation(format!(
            "conclusion.wait_bound_minutes is {} but tier {} requires {}",
            wire.wait_bound_minutes, wire.tier, expected
        )));
    }

    if let Some(rule) = wire.triggered.iter().find(|r| r.tier() != wire.tier) {
        return Err(TriageError::Translation(format!(
            "conclusion.triggered lists '{}' which belongs to tier {}, not {}",
            rule.description(),
            rule.tier(),
            wire.tier
        )));
    }

    if wire.tier != derived.tier {
        return Err(TriageError::Translation(format!(
            "conclusion.tier is {} but the stored vitals and symptoms classify as {}",
            wire.tier, derived.tier
        )));
    }

    if wire.triggered != derived.triggered {
        return Err(TriageError::Translation(format!(
            "conclusion.triggered is {:?} but the stored vitals and symptoms trigger {:?}",
            wire.triggered, derived.triggered
        )));
    }

    if wire.concluded_at < created_at {
        return Err(TriageError::Translation(format!(
            "conclusion.concluded_at {} is earlier than created_at {}",
            wire.concluded_at, created_at
        )));
    }

    Ok(Conclusion {
        tier: wire.tier,
        wait_bound_minutes: wire.wait_bound_minutes,
        concluded_by: validate_operator_id(wire.concluded_by.as_str())?,
        concluded_at: wire.concluded_at,
        triggered: wire.triggered,
    })
}

fn record_wire_to_domain(wire: RecordWire) -> TriageResult<TriageRecord> {
    if wire.created_at != wire.triage_id.timestamp() {
        return Err(TriageError::Translation(format!(
            "created_at {} does not match the timestamp of triage_id {}",
            wire.created_at, wire.triage_id
        )));
    }

    let vitals = VitalSigns::baseline().merged(&vitals_wire_to_update(&wire.vitals));
    validate_vitals(&vitals)?;

    let chief_complaint = match wire.chief_complaint.as_deref() {
        Some(text) => validate_chief_complaint(text)?,
        None => None,
    };

    let conclusion = match (wire.status, wire.conclusion) {
        (TriageStatus::Pending, None) => None,
        (TriageStatus::Concluded, Some(c)) => {
            let complaint = chief_complaint.as_ref().map_or("", NonEmptyText::as_str);
            let derived = RiskClassifier::evaluate(&vitals, &wire.symptoms, complaint);
            Some(conclusion_wire_to_domain(c, &derived, wire.created_at)?)
        }
        (TriageStatus::Pending, Some(_)) => {
            return Err(TriageError::Translation(
                "pending record must not carry a conclusion".into(),
            ))
        }
        (TriageStatus::Concluded, None) => {
            return Err(TriageError::Translation(
                "concluded record is missing its conclusion".into(),
            ))
        }
    };

    Ok(TriageRecord::from_parts(
        wire.triage_id,
        wire.patient.id,
        wire.patient.name,
        wire.created_at,
        vitals,
        wire.symptoms,
        chief_complaint,
        conclusion,
    ))
}

fn record_domain_to_wire(record: &TriageRecord) -> RecordWire {
    RecordWire {
        triage_id: record.id().clone(),
        patient: PatientWire {
            id: record.patient_id(),
            name: record.patient_name().clone(),
        },
        created_at: record.created_at(),
        status: record.status(),
        chief_complaint: record.chief_complaint().map(ToString::to_string),
        symptoms: record.symptoms().clone(),
        vitals: vitals_domain_to_wire(record.vitals()),
        conclusion: record.conclusion().map(|c| ConclusionWire {
            tier: c.tier,
            wait_bound_minutes: c.wait_bound_minutes,
            concluded_by: c.concluded_by.clone(),
            concluded_at: c.concluded_at,
            triggered: c.triggered.clone(),
        }),
    }
}

fn intake_wire_to_domain(wire: IntakeWire) -> TriageResult<Intake> {
    let chief_complaint = match wire.chief_complaint.as_deref() {
        Some(text) => validate_chief_complaint(text)?,
        None => None,
    };

    Ok(Intake {
        vitals: vitals_wire_to_update(&wire.vitals),
        symptoms: wire.symptoms,
        chief_complaint,
    })
}
