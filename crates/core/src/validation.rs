//! Input validation utilities.
//!
//! The classifier assumes well-formed readings. Everything entering a record passes
//! through here first, and out-of-range data is rejected rather than clamped.

use crate::constants::{
    DIASTOLIC_BP_RANGE, GLASGOW_RANGE, GLUCOSE_RANGE, HEART_RATE_RANGE, MAX_CHIEF_COMPLAINT_LEN,
    MAX_OPERATOR_ID_LEN, OXYGEN_SATURATION_RANGE, PAIN_SCORE_RANGE, RESPIRATORY_RATE_RANGE,
    SYSTOLIC_BP_RANGE, TEMPERATURE_RANGE,
};
use crate::vitals::{VitalField, VitalSigns};
use crate::{TriageError, TriageResult};
use triage_types::{NonEmptyText, TextError};

fn check_range<T>(problems: &mut Vec<String>, field: VitalField, value: Option<T>, range: (T, T))
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if let Some(v) = value {
        if v < range.0 || v > range.1 {
            problems.push(format!(
                "{field} {v} outside plausible range {}..={}",
                range.0, range.1
            ));
        }
    }
}

/// Validates that every recorded reading is physiologically plausible.
///
/// All problems are reported together so an intake form can flag every bad field at once.
///
/// # Errors
///
/// Returns [`TriageError::InvalidVitals`] describing each out-of-range field.
pub fn validate_vitals(vitals: &VitalSigns) -> TriageResult<()> {
    let mut problems = Vec::new();

    check_range(&mut problems, VitalField::SystolicBp, vitals.systolic_bp, SYSTOLIC_BP_RANGE);
    check_range(&mut problems, VitalField::DiastolicBp, vitals.diastolic_bp, DIASTOLIC_BP_RANGE);
    check_range(&mut problems, VitalField::HeartRate, vitals.heart_rate, HEART_RATE_RANGE);
    check_range(
        &mut problems,
        VitalField::RespiratoryRate,
        vitals.respiratory_rate,
        RESPIRATORY_RATE_RANGE,
    );
    check_range(
        &mut problems,
        VitalField::OxygenSaturation,
        vitals.oxygen_saturation,
        OXYGEN_SATURATION_RANGE,
    );
    check_range(&mut problems, VitalField::Glucose, vitals.glucose, GLUCOSE_RANGE);
    check_range(
        &mut problems,
        VitalField::GlasgowScore,
        Some(vitals.glasgow_score),
        GLASGOW_RANGE,
    );
    check_range(
        &mut problems,
        VitalField::PainScore,
        Some(vitals.pain_score),
        PAIN_SCORE_RANGE,
    );

    match vitals.temperature {
        Some(t) if !t.is_finite() => {
            problems.push(format!("{} must be a finite number", VitalField::Temperature));
        }
        t => check_range(&mut problems, VitalField::Temperature, t, TEMPERATURE_RANGE),
    }

    if let (Some(sys), Some(dia)) = (vitals.systolic_bp, vitals.diastolic_bp) {
        if dia >= sys {
            problems.push(format!(
                "{} {dia} must be below {} {sys}",
                VitalField::DiastolicBp,
                VitalField::SystolicBp
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(TriageError::InvalidVitals(problems.join("; ")))
    }
}

/// Validates and normalises an operator identifier.
///
/// Operator ids end up in audit fields, so they must be a single line.
pub fn validate_operator_id(operator_id: &str) -> TriageResult<NonEmptyText> {
    let text = NonEmptyText::with_max_len(operator_id, MAX_OPERATOR_ID_LEN)?;
    if text.as_str().contains(['\n', '\r']) {
        return Err(TriageError::InvalidInput(
            "operator id must not contain line breaks".into(),
        ));
    }
    Ok(text)
}

/// Validates a chief complaint. Blank input means "none recorded".
pub fn validate_chief_complaint(complaint: &str) -> TriageResult<Option<NonEmptyText>> {
    match NonEmptyText::with_max_len(complaint, MAX_CHIEF_COMPLAINT_LEN) {
        Ok(text) => Ok(Some(text)),
        Err(TextError::Empty) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::VitalsUpdate;

    fn vitals(update: VitalsUpdate) -> VitalSigns {
        VitalSigns::baseline().merged(&update)
    }

    #[test]
    fn baseline_is_valid() {
        validate_vitals(&VitalSigns::baseline()).expect("baseline must validate");
    }

    #[test]
    fn plausible_readings_are_accepted() {
        let v = vitals(
            VitalsUpdate::new()
                .blood_pressure(128, 84)
                .heart_rate(88)
                .respiratory_rate(16)
                .temperature(36.6)
                .oxygen_saturation(98)
                .glucose(110),
        );
        validate_vitals(&v).expect("plausible readings");
    }

    #[test]
    fn reports_every_out_of_range_field() {
        let v = vitals(
            VitalsUpdate::new()
                .heart_rate(400)
                .oxygen_saturation(130)
                .glasgow_score(2)
                .pain_score(11),
        );
        let msg = match validate_vitals(&v) {
            Err(TriageError::InvalidVitals(msg)) => msg,
            other => panic!("expected InvalidVitals, got {other:?}"),
        };
        assert!(msg.contains("heart_rate 400"));
        assert!(msg.contains("oxygen_saturation 130"));
        assert!(msg.contains("glasgow_score 2"));
        assert!(msg.contains("pain_score 11"));
    }

    #[test]
    fn rejects_non_finite_temperature() {
        let v = vitals(VitalsUpdate::new().temperature(f64::NAN));
        assert!(matches!(
            validate_vitals(&v),
            Err(TriageError::InvalidVitals(msg)) if msg.contains("finite")
        ));
    }

    #[test]
    fn rejects_diastolic_not_below_systolic() {
        let v = vitals(VitalsUpdate::new().blood_pressure(90, 95));
        assert!(matches!(
            validate_vitals(&v),
            Err(TriageError::InvalidVitals(msg)) if msg.contains("must be below")
        ));
    }

    #[test]
    fn operator_id_must_be_single_line() {
        assert_eq!(validate_operator_id("  nurse.lima ").unwrap().as_str(), "nurse.lima");
        assert!(matches!(
            validate_operator_id("a\nb"),
            Err(TriageError::InvalidInput(_))
        ));
        assert!(matches!(validate_operator_id(" "), Err(TriageError::Text(_))));
    }

    #[test]
    fn blank_chief_complaint_is_none() {
        assert_eq!(validate_chief_complaint("  ").unwrap(), None);
        assert_eq!(
            validate_chief_complaint("chest pain").unwrap().unwrap().as_str(),
            "chest pain"
        );
        let long = "x".repeat(MAX_CHIEF_COMPLAINT_LEN + 1);
        assert!(validate_chief_complaint(&long).is_err());
    }
}
