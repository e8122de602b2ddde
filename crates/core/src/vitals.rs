//! Vital-sign snapshots and typed partial updates.
//!
//! Intake fills a [`VitalSigns`] snapshot field by field. Instead of addressing fields by
//! string path, callers build a [`VitalsUpdate`] with one method per field and merge it
//! into the current snapshot with [`VitalSigns::merged`].

use crate::constants::{BASELINE_GLASGOW, BASELINE_PAIN_SCORE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// AVPU responsiveness scale, ordered from least to most severe.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Consciousness {
    /// Alert and oriented.
    #[default]
    #[serde(alias = "a")]
    Alert,
    /// Responds to voice.
    #[serde(alias = "v")]
    Voice,
    /// Responds to pain only.
    #[serde(alias = "p")]
    Pain,
    /// No response.
    #[serde(alias = "u")]
    Unresponsive,
}

impl Consciousness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Voice => "voice",
            Self::Pain => "pain",
            Self::Unresponsive => "unresponsive",
        }
    }
}

impl fmt::Display for Consciousness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names a single field of [`VitalSigns`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VitalField {
    SystolicBp,
    DiastolicBp,
    HeartRate,
    RespiratoryRate,
    Temperature,
    OxygenSaturation,
    Glucose,
    Consciousness,
    GlasgowScore,
    PainScore,
}

impl VitalField {
    /// Readings that at least one classification rule reads.
    pub const RULE_READINGS: [VitalField; 6] = [
        VitalField::SystolicBp,
        VitalField::DiastolicBp,
        VitalField::HeartRate,
        VitalField::RespiratoryRate,
        VitalField::Temperature,
        VitalField::OxygenSaturation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystolicBp => "systolic_bp",
            Self::DiastolicBp => "diastolic_bp",
            Self::HeartRate => "heart_rate",
            Self::RespiratoryRate => "respiratory_rate",
            Self::Temperature => "temperature",
            Self::OxygenSaturation => "oxygen_saturation",
            Self::Glucose => "glucose",
            Self::Consciousness => "consciousness",
            Self::GlasgowScore => "glasgow_score",
            Self::PainScore => "pain_score",
        }
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a patient's vital signs.
///
/// Numeric readings are optional because intake fills them in progressively. An absent
/// reading never satisfies a classification rule.
#[derive(Clone, Debug, PartialEq)]
pub struct VitalSigns {
    /// Systolic blood pressure, mmHg.
    pub systolic_bp: Option<u16>,
    /// Diastolic blood pressure, mmHg.
    pub diastolic_bp: Option<u16>,
    /// Beats per minute.
    pub heart_rate: Option<u16>,
    /// Breaths per minute.
    pub respiratory_rate: Option<u16>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// SpO2, percent.
    pub oxygen_saturation: Option<u8>,
    /// Capillary glucose, mg/dL. Recorded for display; no rule reads it.
    pub glucose: Option<u16>,
    pub consciousness: Consciousness,
    /// Glasgow coma scale, 3 to 15.
    pub glasgow_score: u8,
    /// Self-reported pain, 0 to 10.
    pub pain_score: u8,
}

impl Default for VitalSigns {
    fn default() -> Self {
        Self::baseline()
    }
}

impl VitalSigns {
    /// The "normal baseline" a new encounter starts from: alert, GCS 15, no pain, no readings.
    pub fn baseline() -> Self {
        Self {
            systolic_bp: None,
            diastolic_bp: None,
            heart_rate: None,
            respiratory_rate: None,
            temperature: None,
            oxygen_saturation: None,
            glucose: None,
            consciousness: Consciousness::Alert,
            glasgow_score: BASELINE_GLASGOW,
            pain_score: BASELINE_PAIN_SCORE,
        }
    }

    /// Returns a new snapshot with `update` applied on top of `self`.
    pub fn merged(&self, update: &VitalsUpdate) -> Self {
        fn apply<T: Copy>(current: Option<T>, change: Option<Option<T>>) -> Option<T> {
            match change {
                Some(value) => value,
                None => current,
            }
        }

        Self {
            systolic_bp: apply(self.systolic_bp, update.systolic_bp),
            diastolic_bp: apply(self.diastolic_bp, update.diastolic_bp),
            heart_rate: apply(self.heart_rate, update.heart_rate),
            respiratory_rate: apply(self.respiratory_rate, update.respiratory_rate),
            temperature: apply(self.temperature, update.temperature),
            oxygen_saturation: apply(self.oxygen_saturation, update.oxygen_saturation),
            glucose: apply(self.glucose, update.glucose),
            consciousness: update.consciousness.unwrap_or(self.consciousness),
            glasgow_score: update.glasgow_score.unwrap_or(self.glasgow_score),
            pain_score: update.pain_score.unwrap_or(self.pain_score),
        }
    }

    /// Rule-relevant readings that have not been recorded, in field order.
    pub fn missing_rule_readings(&self) -> Vec<VitalField> {
        VitalField::RULE_READINGS
            .into_iter()
            .filter(|field| !self.has_reading(*field))
            .collect()
    }

    /// Whether `field` currently holds a recorded value. Scored fields always do.
    pub fn has_reading(&self, field: VitalField) -> bool {
        match field {
            VitalField::SystolicBp => self.systolic_bp.is_some(),
            VitalField::DiastolicBp => self.diastolic_bp.is_some(),
            VitalField::HeartRate => self.heart_rate.is_some(),
            VitalField::RespiratoryRate => self.respiratory_rate.is_some(),
            VitalField::Temperature => self.temperature.is_some(),
            VitalField::OxygenSaturation => self.oxygen_saturation.is_some(),
            VitalField::Glucose => self.glucose.is_some(),
            VitalField::Consciousness | VitalField::GlasgowScore | VitalField::PainScore => true,
        }
    }
}

/// A typed partial update to [`VitalSigns`].
///
/// Optional readings use a nested option: `Some(Some(v))` sets the reading,
/// `Some(None)` clears it, `None` leaves it untouched. Clearing a scored field
/// (consciousness, Glasgow, pain) restores its baseline value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VitalsUpdate {
    systolic_bp: Option<Option<u16>>,
    diastolic_bp: Option<Option<u16>>,
    heart_rate: Option<Option<u16>>,
    respiratory_rate: Option<Option<u16>>,
    temperature: Option<Option<f64>>,
    oxygen_saturation: Option<Option<u8>>,
    glucose: Option<Option<u16>>,
    consciousness: Option<Consciousness>,
    glasgow_score: Option<u8>,
    pain_score: Option<u8>,
}

impl VitalsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn systolic_bp(mut self, mmhg: u16) -> Self {
        self.systolic_bp = Some(Some(mmhg));
        self
    }

    pub fn diastolic_bp(mut self, mmhg: u16) -> Self {
        self.diastolic_bp = Some(Some(mmhg));
        self
    }

    /// Sets both blood pressure readings at once.
    pub fn blood_pressure(self, systolic: u16, diastolic: u16) -> Self {
        self.systolic_bp(systolic).diastolic_bp(diastolic)
    }

    pub fn heart_rate(mut self, bpm: u16) -> Self {
        self.heart_rate = Some(Some(bpm));
        self
    }

    pub fn respiratory_rate(mut self, per_minute: u16) -> Self {
        self.respiratory_rate = Some(Some(per_minute));
        self
    }

    pub fn temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(Some(celsius));
        self
    }

    pub fn oxygen_saturation(mut self, percent: u8) -> Self {
        self.oxygen_saturation = Some(Some(percent));
        self
    }

    pub fn glucose(mut self, mg_dl: u16) -> Self {
        self.glucose = Some(Some(mg_dl));
        self
    }

    pub fn consciousness(mut self, level: Consciousness) -> Self {
        self.consciousness = Some(level);
        self
    }

    pub fn glasgow_score(mut self, score: u8) -> Self {
        self.glasgow_score = Some(score);
        self
    }

    pub fn pain_score(mut self, score: u8) -> Self {
        self.pain_score = Some(score);
        self
    }

    /// Clears `field`, or restores its baseline value if it is a scored field.
    pub fn clear(mut self, field: VitalField) -> Self {
        match field {
            VitalField::SystolicBp => self.systolic_bp = Some(None),
            VitalField::DiastolicBp => self.diastolic_bp = Some(None),
            VitalField::HeartRate => self.heart_rate = Some(None),
            VitalField::RespiratoryRate => self.respiratory_rate = Some(None),
            VitalField::Temperature => self.temperature = Some(None),
            VitalField::OxygenSaturation => self.oxygen_saturation = Some(None),
            VitalField::Glucose => self.glucose = Some(None),
            VitalField::Consciousness => self.consciousness = Some(Consciousness::Alert),
            VitalField::GlasgowScore => self.glasgow_score = Some(BASELINE_GLASGOW),
            VitalField::PainScore => self.pain_score = Some(BASELINE_PAIN_SCORE),
        }
        self
    }

    /// Fields this update touches.
    pub fn fields(&self) -> Vec<VitalField> {
        let touched = [
            (VitalField::SystolicBp, self.systolic_bp.is_some()),
            (VitalField::DiastolicBp, self.diastolic_bp.is_some()),
            (VitalField::HeartRate, self.heart_rate.is_some()),
            (VitalField::RespiratoryRate, self.respiratory_rate.is_some()),
            (VitalField::Temperature, self.temperature.is_some()),
            (VitalField::OxygenSaturation, self.oxygen_saturation.is_some()),
            (VitalField::Glucose, self.glucose.is_some()),
            (VitalField::Consciousness, self.consciousness.is_some()),
            (VitalField::GlasgowScore, self.glasgow_score.is_some()),
            (VitalField::PainScore, self.pain_score.is_some()),
        ];
        touched
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_alert_with_no_readings() {
        let vitals = VitalSigns::baseline();
        assert_eq!(vitals.consciousness, Consciousness::Alert);
        assert_eq!(vitals.glasgow_score, 15);
        assert_eq!(vitals.pain_score, 0);
        assert_eq!(vitals.heart_rate, None);
        assert_eq!(vitals.missing_rule_readings(), VitalField::RULE_READINGS.to_vec());
    }

    #[test]
    fn merge_only_touches_named_fields() {
        let base = VitalSigns::baseline().merged(&VitalsUpdate::new().heart_rate(80).glucose(95));
        let merged = base.merged(&VitalsUpdate::new().temperature(37.9));

        assert_eq!(merged.heart_rate, Some(80));
        assert_eq!(merged.glucose, Some(95));
        assert_eq!(merged.temperature, Some(37.9));
        assert_eq!(merged.systolic_bp, None);
    }

    #[test]
    fn clear_removes_readings_and_resets_scores() {
        let filled = VitalSigns::baseline().merged(
            &VitalsUpdate::new()
                .heart_rate(130)
                .pain_score(6)
                .consciousness(Consciousness::Voice),
        );
        let cleared = filled.merged(
            &VitalsUpdate::new()
                .clear(VitalField::HeartRate)
                .clear(VitalField::PainScore)
                .clear(VitalField::Consciousness),
        );

        assert_eq!(cleared, VitalSigns::baseline());
    }

    #[test]
    fn update_reports_touched_fields() {
        let update = VitalsUpdate::new().blood_pressure(120, 80).pain_score(2);
        assert_eq!(
            update.fields(),
            vec![
                VitalField::SystolicBp,
                VitalField::DiastolicBp,
                VitalField::PainScore
            ]
        );
        assert!(VitalsUpdate::new().is_empty());
    }

    #[test]
    fn consciousness_orders_by_severity() {
        assert!(Consciousness::Alert < Consciousness::Voice);
        assert!(Consciousness::Voice < Consciousness::Pain);
        assert!(Consciousness::Pain < Consciousness::Unresponsive);
    }
}
