//! # Triage Core
//!
//! Risk classification for emergency triage:
//! - [`RiskClassifier`]: vital signs and symptoms to one of five urgency tiers
//! - [`WaitPolicy`]: maximum wait per tier and priority ordering
//! - [`TriageRecord`]: the Pending to Concluded lifecycle of one encounter
//!
//! Everything here is synchronous and free of I/O. Loading and saving records, and any
//! UI, belong to the caller; [`wire`] converts records to and from text for that purpose.
//!
//! The classification thresholds are illustrative and not a validated clinical protocol.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod criteria;
pub mod error;
pub mod intake;
pub mod record;
pub mod tier;
pub mod validation;
pub mod vitals;
pub mod wait_policy;
pub mod wire;
pub mod worklist;

pub use classifier::{Classification, RiskClassifier, Rule};
pub use config::{missing_vitals_policy_from_env_value, MissingVitalsPolicy, TriageConfig};
pub use error::{TriageError, TriageResult};
pub use intake::Intake;
pub use record::{Conclusion, SharedTriageRecord, TriageRecord, TriageStatus};
pub use tier::RiskTier;
pub use vitals::{Consciousness, VitalField, VitalSigns, VitalsUpdate};
pub use wait_policy::WaitPolicy;
pub use wire::{IntakeFile, TriageRecordFile};
pub use worklist::Worklist;

// Re-export the shared primitives so callers need only this crate.
pub use triage_types::{NonEmptyText, SymptomSet, TextError};
pub use triage_uuid::{PatientId, TriageId, TriageIdGenerator};
