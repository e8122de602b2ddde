use crate::record::TriageStatus;
use crate::vitals::VitalField;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid state: expected {expected}, found {actual}")]
    InvalidState {
        expected: TriageStatus,
        actual: TriageStatus,
    },
    #[error("invalid vital signs: {0}")]
    InvalidVitals(String),
    #[error("missing vital signs: {}", join_fields(.0))]
    MissingVitals(Vec<VitalField>),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] triage_types::TextError),
    #[error("invalid identifier: {0}")]
    Id(#[from] triage_uuid::IdError),
    #[error("triage record not found: {0}")]
    RecordNotFound(String),
    #[error("triage record lock poisoned")]
    LockPoisoned,

    #[error("translation error: {0}")]
    Translation(String),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to serialize JSON: {0}")]
    JsonSerialization(serde_json::Error),
}

fn join_fields(fields: &[VitalField]) -> String {
    fields
        .iter()
        .map(VitalField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
