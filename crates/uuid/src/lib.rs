//! Identifier types for patients and triage encounters.
//!
//! Two identifier forms are used across the triage crates:
//!
//! ## Canonical UUID
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//! Externally supplied identifiers must already be canonical; hyphenated or uppercase
//! forms are rejected rather than normalised. [`PatientId`] uses this form.
//!
//! ## Timestamp-prefixed identifier
//! `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>`, for example
//! `20260111T143522.045Z-550e8400e29b41d4a716446655440000`.
//!
//! [`TriageId`] uses this form so that encounter identifiers sort by creation time.

mod service;

pub use service::{PatientId, TriageId, TriageIdGenerator, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
