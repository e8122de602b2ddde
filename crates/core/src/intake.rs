//! Structured intake data as delivered by an intake form.

use crate::classifier::{Classification, RiskClassifier};
use crate::criteria::{annotate, Annotation};
use crate::record::TriageRecord;
use crate::validation::{validate_chief_complaint, validate_vitals};
use crate::vitals::{VitalSigns, VitalsUpdate};
use crate::TriageResult;
use triage_types::{NonEmptyText, SymptomSet};

/// Everything collected about a patient before conclusion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intake {
    pub vitals: VitalsUpdate,
    pub symptoms: SymptomSet,
    pub chief_complaint: Option<NonEmptyText>,
}

impl Intake {
    /// Applies the intake to a pending record.
    ///
    /// Vitals are merged; symptoms and complaint replace what was there. Everything is
    /// checked before the first write, so a rejected intake leaves the record untouched.
    pub fn apply_to(&self, record: &mut TriageRecord) -> TriageResult<()> {
        validate_chief_complaint(self.complaint_str())?;
        record.update_vitals(&self.vitals)?;
        record.set_symptoms(self.symptoms.clone())?;
        record.set_chief_complaint(self.complaint_str())
    }

    /// The snapshot this intake produces on top of baseline vitals.
    pub fn vitals_snapshot(&self) -> VitalSigns {
        VitalSigns::baseline().merged(&self.vitals)
    }

    /// Validates and classifies without opening a record.
    pub fn evaluate(&self) -> TriageResult<Classification> {
        let vitals = self.vitals_snapshot();
        validate_vitals(&vitals)?;
        Ok(RiskClassifier::evaluate(
            &vitals,
            &self.symptoms,
            self.complaint_str(),
        ))
    }

    /// Advisory keyword annotations for display.
    pub fn annotations(&self) -> Vec<Annotation> {
        annotate(&self.symptoms, self.complaint_str())
    }

    fn complaint_str(&self) -> &str {
        self.chief_complaint.as_ref().map_or("", NonEmptyText::as_str)
    }
}
