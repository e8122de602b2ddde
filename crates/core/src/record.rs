//! Triage record lifecycle.
//!
//! A [`TriageRecord`] starts `Pending`, collects vitals and symptoms, and is concluded
//! exactly once. Conclusion stores tier, wait bound, operator and timestamp together in a
//! single [`Conclusion`], so they are either all absent or all present.
//!
//! ## Ownership
//!
//! A record is a plain owned value; `&mut` access already guarantees a single writer.
//! When several operators genuinely share one encounter, wrap it in a
//! [`SharedTriageRecord`], which performs the Pending to Concluded check under a lock.

use crate::classifier::{Classification, RiskClassifier, Rule};
use crate::config::{MissingVitalsPolicy, TriageConfig};
use crate::tier::RiskTier;
use crate::validation::{validate_chief_complaint, validate_operator_id, validate_vitals};
use crate::vitals::{VitalSigns, VitalsUpdate};
use crate::wait_policy::WaitPolicy;
use crate::{TriageError, TriageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use triage_types::{NonEmptyText, SymptomSet};
use triage_uuid::{PatientId, TriageId};

/// Lifecycle state of a triage record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageStatus {
    /// Intake in progress.
    Pending,
    /// Classified and closed; read-only from here on.
    Concluded,
}

impl fmt::Display for TriageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Concluded => f.write_str("concluded"),
        }
    }
}

/// Result of concluding a triage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conclusion {
    pub tier: RiskTier,
    pub wait_bound_minutes: u32,
    pub concluded_by: NonEmptyText,
    pub concluded_at: DateTime<Utc>,
    /// Rules of `tier` that fired, for explanation only.
    pub triggered: Vec<Rule>,
}

impl Conclusion {
    /// When the wait bound runs out; `None` if that is past the last representable instant.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        WaitPolicy::deadline(self.tier, self.concluded_at)
    }
}

/// One triage encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct TriageRecord {
    id: TriageId,
    patient_id: PatientId,
    patient_name: NonEmptyText,
    created_at: DateTime<Utc>,
    vitals: VitalSigns,
    symptoms: SymptomSet,
    chief_complaint: Option<NonEmptyText>,
    conclusion: Option<Conclusion>,
}

impl TriageRecord {
    /// Opens a pending record with baseline vitals and a freshly generated id.
    pub fn create(patient_id: PatientId, patient_name: NonEmptyText) -> Self {
        Self::with_id(TriageId::generate(None), patient_id, patient_name)
    }

    /// Opens a pending record under a caller-supplied id. `created_at` is taken from the id.
    pub fn with_id(id: TriageId, patient_id: PatientId, patient_name: NonEmptyText) -> Self {
        tracing::debug!(triage_id = %id, patient_id = %patient_id, "triage opened");
        Self {
            created_at: id.timestamp(),
            id,
            patient_id,
            patient_name,
            vitals: VitalSigns::baseline(),
            symptoms: SymptomSet::new(),
            chief_complaint: None,
            conclusion: None,
        }
    }

    /// Reassembles a record from stored parts. Used by the wire layer after it has
    /// checked the parts for consistency.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: TriageId,
        patient_id: PatientId,
        patient_name: NonEmptyText,
        created_at: DateTime<Utc>,
        vitals: VitalSigns,
        symptoms: SymptomSet,
        chief_complaint: Option<NonEmptyText>,
        conclusion: Option<Conclusion>,
    ) -> Self {
        Self {
            id,
            patient_id,
            patient_name,
            created_at,
            vitals,
            symptoms,
            chief_complaint,
            conclusion,
        }
    }

    pub fn id(&self) -> &TriageId {
        &self.id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn patient_name(&self) -> &NonEmptyText {
        &self.patient_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn vitals(&self) -> &VitalSigns {
        &self.vitals
    }

    pub fn symptoms(&self) -> &SymptomSet {
        &self.symptoms
    }

    pub fn chief_complaint(&self) -> Option<&NonEmptyText> {
        self.chief_complaint.as_ref()
    }

    pub fn conclusion(&self) -> Option<&Conclusion> {
        self.conclusion.as_ref()
    }

    pub fn status(&self) -> TriageStatus {
        if self.conclusion.is_some() {
            TriageStatus::Concluded
        } else {
            TriageStatus::Pending
        }
    }

    pub fn tier(&self) -> Option<RiskTier> {
        self.conclusion.as_ref().map(|c| c.tier)
    }

    fn ensure_pending(&self) -> TriageResult<()> {
        match self.status() {
            TriageStatus::Pending => Ok(()),
            actual => Err(TriageError::InvalidState {
                expected: TriageStatus::Pending,
                actual,
            }),
        }
    }

    /// Merges `update` into the vitals.
    ///
    /// The merged snapshot is validated before it replaces the current one, so a rejected
    /// update leaves the record untouched.
    ///
    /// # Errors
    ///
    /// - [`TriageError::InvalidState`] if the record is already concluded.
    /// - [`TriageError::InvalidVitals`] if the merged readings are out of range.
    pub fn update_vitals(&mut self, update: &VitalsUpdate) -> TriageResult<()> {
        self.ensure_pending()?;
        let merged = self.vitals.merged(update);
        validate_vitals(&merged)?;
        self.vitals = merged;
        Ok(())
    }

    pub fn set_symptoms(&mut self, symptoms: SymptomSet) -> TriageResult<()> {
        self.ensure_pending()?;
        self.symptoms = symptoms;
        Ok(())
    }

    /// Adds a symptom label. Returns `false` if an equivalent label was already present.
    pub fn add_symptom(&mut self, label: &str) -> TriageResult<bool> {
        self.ensure_pending()?;
        Ok(self.symptoms.insert(label)?)
    }

    pub fn remove_symptom(&mut self, label: &str) -> TriageResult<bool> {
        self.ensure_pending()?;
        Ok(self.symptoms.remove(label))
    }

    /// Sets the chief complaint; blank text clears it.
    pub fn set_chief_complaint(&mut self, complaint: &str) -> TriageResult<()> {
        self.ensure_pending()?;
        self.chief_complaint = validate_chief_complaint(complaint)?;
        Ok(())
    }

    /// Classification of the current data without concluding, for live display during intake.
    pub fn preview(&self) -> Classification {
        let complaint = self.chief_complaint.as_ref().map_or("", NonEmptyText::as_str);
        RiskClassifier::evaluate(&self.vitals, &self.symptoms, complaint)
    }

    /// Concludes with the default configuration at the current time.
    pub fn conclude(&mut self, operator_id: &str) -> TriageResult<&Conclusion> {
        self.conclude_with(operator_id, &TriageConfig::default(), Utc::now())
    }

    /// Classifies the record, derives the wait bound and closes it.
    ///
    /// # Errors
    ///
    /// - [`TriageError::InvalidState`] if the record is already concluded.
    /// - [`TriageError::MissingVitals`] if `cfg` requires readings that were never recorded.
    /// - [`TriageError::InvalidInput`]/[`TriageError::Text`] for a malformed operator id.
    pub fn conclude_with(
        &mut self,
        operator_id: &str,
        cfg: &TriageConfig,
        now: DateTime<Utc>,
    ) -> TriageResult<&Conclusion> {
        self.ensure_pending()?;
        let concluded_by = validate_operator_id(operator_id)?;
        validate_vitals(&self.vitals)?;

        let missing = self.vitals.missing_rule_readings();
        if !missing.is_empty() {
            match cfg.missing_vitals() {
                MissingVitalsPolicy::Require => return Err(TriageError::MissingVitals(missing)),
                MissingVitalsPolicy::AssumeNormal => tracing::warn!(
                    triage_id = %self.id,
                    missing = ?missing,
                    "concluding with unrecorded readings treated as normal"
                ),
            }
        }

        let Classification { tier, triggered } = self.preview();
        let conclusion = Conclusion {
            tier,
            wait_bound_minutes: WaitPolicy::max_wait_minutes(tier),
            concluded_by,
            concluded_at: now,
            triggered,
        };

        tracing::info!(
            triage_id = %self.id,
            patient_id = %self.patient_id,
            %tier,
            wait_bound_minutes = conclusion.wait_bound_minutes,
            operator = %conclusion.concluded_by,
            "triage concluded"
        );

        Ok(&*self.conclusion.insert(conclusion))
    }

    /// Whole minutes since conclusion, or `None` while pending.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> Option<u64> {
        self.conclusion
            .as_ref()
            .map(|c| WaitPolicy::elapsed_minutes(c.concluded_at, now))
    }

    /// Whether the wait bound has been exceeded at `now`. Pending records are never overdue.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.conclusion
            .as_ref()
            .is_some_and(|c| WaitPolicy::is_overdue_at(c.tier, c.concluded_at, now))
    }
}

/// A triage record shared between several workflows.
///
/// All mutation happens under one lock, so of any number of concurrent `conclude` calls
/// exactly one succeeds and the rest observe `InvalidState`.
#[derive(Clone, Debug)]
pub struct SharedTriageRecord {
    inner: Arc<Mutex<TriageRecord>>,
}

impl SharedTriageRecord {
    pub fn new(record: TriageRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(record)),
        }
    }

    fn lock(&self) -> TriageResult<MutexGuard<'_, TriageRecord>> {
        self.inner.lock().map_err(|_| TriageError::LockPoisoned)
    }

    pub fn status(&self) -> TriageResult<TriageStatus> {
        Ok(self.lock()?.status())
    }

    /// Copy of the record as it currently stands.
    pub fn snapshot(&self) -> TriageResult<TriageRecord> {
        Ok(self.lock()?.clone())
    }

    pub fn update_vitals(&self, update: &VitalsUpdate) -> TriageResult<()> {
        self.lock()?.update_vitals(update)
    }

    pub fn conclude(
        &self,
        operator_id: &str,
        cfg: &TriageConfig,
        now: DateTime<Utc>,
    ) -> TriageResult<Conclusion> {
        let mut record = self.lock()?;
        record.conclude_with(operator_id, cfg, now).cloned()
    }
}
