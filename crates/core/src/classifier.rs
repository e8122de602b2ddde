//! Risk classification.
//!
//! An ordered, first-match-wins cascade over fixed numeric thresholds:
//!
//! 1. **Red**: unresponsive; GCS <= 8; RR < 8 or > 35; SpO2 < 85; systolic < 80
//! 2. **Orange**: responds to pain; GCS <= 12; HR > 140 or < 40; systolic > 220;
//!    temperature > 39.5; pain >= 7
//! 3. **Yellow**: responds to voice; HR > 120; RR > 25; systolic > 180;
//!    diastolic > 110; temperature >= 38; pain >= 4
//! 4. **Green**: pain >= 1; temperature > 37.5; HR > 100; more than one symptom
//! 5. **Blue**: none of the above
//!
//! Each tier is a disjunction of [`Rule`]s. The first tier with any satisfied rule wins,
//! so a patient meeting criteria of several tiers lands on the most severe one.
//! Absent readings satisfy no rule.
//!
//! The decision depends only on vitals and the number of symptoms. Free-text matching
//! against the criteria catalogue lives in [`crate::criteria`] and is never consulted here.

use crate::constants::*;
use crate::tier::RiskTier;
use crate::validation::validate_vitals;
use crate::vitals::{Consciousness, VitalSigns};
use crate::TriageResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use triage_types::SymptomSet;

/// A single classification criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    // Red
    Unresponsive,
    SevereComa,
    CriticalRespiratoryRate,
    SevereHypoxaemia,
    SevereHypotension,
    // Orange
    RespondsToPain,
    ModerateComa,
    CriticalHeartRate,
    HypertensiveCrisis,
    VeryHighFever,
    SeverePain,
    // Yellow
    RespondsToVoice,
    Tachycardia,
    Tachypnoea,
    SevereSystolicHypertension,
    SevereDiastolicHypertension,
    Fever,
    ModeratePain,
    // Green
    MildPain,
    LowGradeFever,
    ElevatedHeartRate,
    MultipleSymptoms,
}

impl Rule {
    /// Every rule, grouped by tier in cascade order.
    pub const ALL: [Rule; 22] = [
        Rule::Unresponsive,
        Rule::SevereComa,
        Rule::CriticalRespiratoryRate,
        Rule::SevereHypoxaemia,
        Rule::SevereHypotension,
        Rule::RespondsToPain,
        Rule::ModerateComa,
        Rule::CriticalHeartRate,
        Rule::HypertensiveCrisis,
        Rule::VeryHighFever,
        Rule::SeverePain,
        Rule::RespondsToVoice,
        Rule::Tachycardia,
        Rule::Tachypnoea,
        Rule::SevereSystolicHypertension,
        Rule::SevereDiastolicHypertension,
        Rule::Fever,
        Rule::ModeratePain,
        Rule::MildPain,
        Rule::LowGradeFever,
        Rule::ElevatedHeartRate,
        Rule::MultipleSymptoms,
    ];

    /// The tier this rule promotes a patient to.
    pub fn tier(&self) -> RiskTier {
        use Rule::*;
        match self {
            Unresponsive | SevereComa | CriticalRespiratoryRate | SevereHypoxaemia
            | SevereHypotension => RiskTier::Red,
            RespondsToPain | ModerateComa | CriticalHeartRate | HypertensiveCrisis
            | VeryHighFever | SeverePain => RiskTier::Orange,
            RespondsToVoice | Tachycardia | Tachypnoea | SevereSystolicHypertension
            | SevereDiastolicHypertension | Fever | ModeratePain => RiskTier::Yellow,
            MildPain | LowGradeFever | ElevatedHeartRate | MultipleSymptoms => RiskTier::Green,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::Unresponsive => "Unresponsive (AVPU = U)",
            Rule::SevereComa => "Glasgow coma score 8 or below",
            Rule::CriticalRespiratoryRate => "Respiratory rate below 8 or above 35",
            Rule::SevereHypoxaemia => "Oxygen saturation below 85%",
            Rule::SevereHypotension => "Systolic pressure below 80 mmHg",
            Rule::RespondsToPain => "Responds to pain only (AVPU = P)",
            Rule::ModerateComa => "Glasgow coma score 12 or below",
            Rule::CriticalHeartRate => "Heart rate above 140 or below 40",
            Rule::HypertensiveCrisis => "Systolic pressure above 220 mmHg",
            Rule::VeryHighFever => "Temperature above 39.5 °C",
            Rule::SeverePain => "Pain score 7 or above",
            Rule::RespondsToVoice => "Responds to voice (AVPU = V)",
            Rule::Tachycardia => "Heart rate above 120",
            Rule::Tachypnoea => "Respiratory rate above 25",
            Rule::SevereSystolicHypertension => "Systolic pressure above 180 mmHg",
            Rule::SevereDiastolicHypertension => "Diastolic pressure above 110 mmHg",
            Rule::Fever => "Temperature 38 °C or above",
            Rule::ModeratePain => "Pain score 4 or above",
            Rule::MildPain => "Pain score 1 or above",
            Rule::LowGradeFever => "Temperature above 37.5 °C",
            Rule::ElevatedHeartRate => "Heart rate above 100",
            Rule::MultipleSymptoms => "More than one symptom reported",
        }
    }

    /// Whether this rule is satisfied. Absent readings never satisfy a rule.
    pub fn is_satisfied(&self, vitals: &VitalSigns, symptoms: &SymptomSet) -> bool {
        let v = vitals;
        let above = |reading: Option<u16>, limit: u16| reading.is_some_and(|x| x > limit);
        let below = |reading: Option<u16>, limit: u16| reading.is_some_and(|x| x < limit);

        match self {
            Rule::Unresponsive => v.consciousness == Consciousness::Unresponsive,
            Rule::SevereComa => v.glasgow_score <= RED_GLASGOW_MAX,
            Rule::CriticalRespiratoryRate => {
                below(v.respiratory_rate, RED_RESPIRATORY_RATE_BELOW)
                    || above(v.respiratory_rate, RED_RESPIRATORY_RATE_ABOVE)
            }
            Rule::SevereHypoxaemia => v
                .oxygen_saturation
                .is_some_and(|x| x < RED_OXYGEN_SATURATION_BELOW),
            Rule::SevereHypotension => below(v.systolic_bp, RED_SYSTOLIC_BELOW),

            Rule::RespondsToPain => v.consciousness == Consciousness::Pain,
            Rule::ModerateComa => v.glasgow_score <= ORANGE_GLASGOW_MAX,
            Rule::CriticalHeartRate => {
                above(v.heart_rate, ORANGE_HEART_RATE_ABOVE)
                    || below(v.heart_rate, ORANGE_HEART_RATE_BELOW)
            }
            Rule::HypertensiveCrisis => above(v.systolic_bp, ORANGE_SYSTOLIC_ABOVE),
            Rule::VeryHighFever => v.temperature.is_some_and(|t| t > ORANGE_TEMPERATURE_ABOVE),
            Rule::SeverePain => v.pain_score >= ORANGE_PAIN_MIN,

            Rule::RespondsToVoice => v.consciousness == Consciousness::Voice,
            Rule::Tachycardia => above(v.heart_rate, YELLOW_HEART_RATE_ABOVE),
            Rule::Tachypnoea => above(v.respiratory_rate, YELLOW_RESPIRATORY_RATE_ABOVE),
            Rule::SevereSystolicHypertension => above(v.systolic_bp, YELLOW_SYSTOLIC_ABOVE),
            Rule::SevereDiastolicHypertension => above(v.diastolic_bp, YELLOW_DIASTOLIC_ABOVE),
            Rule::Fever => v.temperature.is_some_and(|t| t >= YELLOW_TEMPERATURE_MIN),
            Rule::ModeratePain => v.pain_score >= YELLOW_PAIN_MIN,

            Rule::MildPain => v.pain_score >= GREEN_PAIN_MIN,
            Rule::LowGradeFever => v.temperature.is_some_and(|t| t > GREEN_TEMPERATURE_ABOVE),
            Rule::ElevatedHeartRate => above(v.heart_rate, GREEN_HEART_RATE_ABOVE),
            Rule::MultipleSymptoms => symptoms.len() > GREEN_SYMPTOM_COUNT_ABOVE,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of running the cascade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub tier: RiskTier,
    /// Every rule of the winning tier that fired. Empty for Blue.
    pub triggered: Vec<Rule>,
}

/// Stateless classifier; all methods are associated functions.
pub struct RiskClassifier;

impl RiskClassifier {
    /// Classifies a patient. Total: every input maps to exactly one tier.
    ///
    /// The chief complaint is accepted for interface symmetry with intake but does not
    /// influence the tier.
    pub fn classify(vitals: &VitalSigns, symptoms: &SymptomSet, chief_complaint: &str) -> RiskTier {
        Self::evaluate(vitals, symptoms, chief_complaint).tier
    }

    /// Runs the cascade and reports which rules of the winning tier fired.
    pub fn evaluate(
        vitals: &VitalSigns,
        symptoms: &SymptomSet,
        _chief_complaint: &str,
    ) -> Classification {
        for tier in RiskTier::ALL {
            let triggered: Vec<Rule> = Rule::ALL
                .into_iter()
                .filter(|rule| rule.tier() == tier && rule.is_satisfied(vitals, symptoms))
                .collect();
            if !triggered.is_empty() {
                tracing::debug!(%tier, rules = ?triggered, "classified");
                return Classification { tier, triggered };
            }
        }

        tracing::debug!(tier = %RiskTier::Blue, "classified, no rule fired");
        Classification {
            tier: RiskTier::Blue,
            triggered: Vec::new(),
        }
    }

    /// Validates the readings before classifying.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidVitals`](crate::TriageError::InvalidVitals) for
    /// out-of-range data instead of producing a tier from it.
    pub fn classify_checked(
        vitals: &VitalSigns,
        symptoms: &SymptomSet,
        chief_complaint: &str,
    ) -> TriageResult<RiskTier> {
        validate_vitals(vitals)?;
        Ok(Self::classify(vitals, symptoms, chief_complaint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::VitalsUpdate;
    use crate::TriageError;

    /// Fully recorded, unremarkable adult readings.
    fn normal() -> VitalsUpdate {
        VitalsUpdate::new()
            .blood_pressure(120, 80)
            .heart_rate(72)
            .respiratory_rate(16)
            .temperature(36.8)
            .oxygen_saturation(98)
    }

    fn vitals(update: VitalsUpdate) -> VitalSigns {
        VitalSigns::baseline().merged(&update)
    }

    fn symptoms(labels: &[&str]) -> SymptomSet {
        SymptomSet::try_from(labels.to_vec()).expect("valid symptom labels")
    }

    fn tier_of(update: VitalsUpdate) -> RiskTier {
        RiskClassifier::classify(&vitals(update), &SymptomSet::new(), "")
    }

    #[test]
    fn unresponsive_patient_is_red() {
        let tier = tier_of(normal().consciousness(Consciousness::Unresponsive));
        assert_eq!(tier, RiskTier::Red);
    }

    #[test]
    fn febrile_patient_in_moderate_pain_is_yellow() {
        let v = vitals(
            VitalsUpdate::new()
                .consciousness(Consciousness::Alert)
                .glasgow_score(15)
                .heart_rate(105)
                .respiratory_rate(18)
                .temperature(38.2)
                .oxygen_saturation(97)
                .pain_score(5),
        );
        let s = symptoms(&["fever", "abdominal pain", "nausea", "vomiting"]);

        let result = RiskClassifier::evaluate(&v, &s, "abdominal pain since yesterday");
        assert_eq!(result.tier, RiskTier::Yellow);
        assert_eq!(result.triggered, vec![Rule::Fever, Rule::ModeratePain]);
    }

    #[test]
    fn hypertensive_crisis_is_orange() {
        assert_eq!(tier_of(normal().systolic_bp(230)), RiskTier::Orange);
    }

    #[test]
    fn unremarkable_patient_is_blue() {
        let v = vitals(VitalsUpdate::new().heart_rate(72).temperature(36.8).pain_score(0));
        let result = RiskClassifier::evaluate(&v, &SymptomSet::new(), "");
        assert_eq!(result.tier, RiskTier::Blue);
        assert!(result.triggered.is_empty());
    }

    #[test]
    fn baseline_with_no_readings_is_blue() {
        assert_eq!(tier_of(VitalsUpdate::new()), RiskTier::Blue);
    }

    #[test]
    fn red_wins_over_lower_tier_criteria() {
        let v = vitals(
            normal()
                .oxygen_saturation(80)
                .pain_score(9)
                .temperature(40.0)
                .heart_rate(125),
        );
        let s = symptoms(&["cough", "fever"]);
        let result = RiskClassifier::evaluate(&v, &s, "");

        assert_eq!(result.tier, RiskTier::Red);
        assert_eq!(result.triggered, vec![Rule::SevereHypoxaemia]);
    }

    #[test]
    fn red_boundaries() {
        assert_eq!(tier_of(normal().glasgow_score(8)), RiskTier::Red);
        assert_eq!(tier_of(normal().respiratory_rate(7)), RiskTier::Red);
        assert_eq!(tier_of(normal().respiratory_rate(36)), RiskTier::Red);
        assert_eq!(tier_of(normal().oxygen_saturation(84)), RiskTier::Red);
        assert_eq!(tier_of(normal().blood_pressure(79, 50)), RiskTier::Red);

        // Exactly on the strict thresholds does not fire.
        assert_ne!(tier_of(normal().respiratory_rate(8)), RiskTier::Red);
        assert_ne!(tier_of(normal().respiratory_rate(35)), RiskTier::Red);
        assert_ne!(tier_of(normal().oxygen_saturation(85)), RiskTier::Red);
        assert_ne!(tier_of(normal().blood_pressure(80, 50)), RiskTier::Red);
    }

    #[test]
    fn orange_boundaries() {
        assert_eq!(tier_of(normal().consciousness(Consciousness::Pain)), RiskTier::Orange);
        assert_eq!(tier_of(normal().glasgow_score(12)), RiskTier::Orange);
        assert_eq!(tier_of(normal().glasgow_score(9)), RiskTier::Orange);
        assert_eq!(tier_of(normal().heart_rate(141)), RiskTier::Orange);
        assert_eq!(tier_of(normal().heart_rate(39)), RiskTier::Orange);
        assert_eq!(tier_of(normal().temperature(39.6)), RiskTier::Orange);
        assert_eq!(tier_of(normal().pain_score(7)), RiskTier::Orange);

        assert_eq!(tier_of(normal().heart_rate(40)), RiskTier::Blue);
        assert_eq!(tier_of(normal().systolic_bp(220)), RiskTier::Yellow);
        assert_eq!(tier_of(normal().temperature(39.5)), RiskTier::Yellow);
    }

    #[test]
    fn yellow_boundaries() {
        assert_eq!(tier_of(normal().consciousness(Consciousness::Voice)), RiskTier::Yellow);
        assert_eq!(tier_of(normal().heart_rate(121)), RiskTier::Yellow);
        assert_eq!(tier_of(normal().respiratory_rate(26)), RiskTier::Yellow);
        assert_eq!(tier_of(normal().systolic_bp(181)), RiskTier::Yellow);
        assert_eq!(tier_of(normal().diastolic_bp(111)), RiskTier::Yellow);
        assert_eq!(tier_of(normal().temperature(38.0)), RiskTier::Yellow);
        assert_eq!(tier_of(normal().pain_score(4)), RiskTier::Yellow);

        assert_eq!(tier_of(normal().heart_rate(120)), RiskTier::Green);
        assert_eq!(tier_of(normal().respiratory_rate(25)), RiskTier::Blue);
    }

    #[test]
    fn green_boundaries() {
        assert_eq!(tier_of(normal().pain_score(1)), RiskTier::Green);
        assert_eq!(tier_of(normal().temperature(37.6)), RiskTier::Green);
        assert_eq!(tier_of(normal().heart_rate(101)), RiskTier::Green);

        assert_eq!(tier_of(normal().temperature(37.5)), RiskTier::Blue);
        assert_eq!(tier_of(normal().heart_rate(100)), RiskTier::Blue);
    }

    #[test]
    fn symptom_count_only_matters_above_one() {
        let v = vitals(normal());
        assert_eq!(
            RiskClassifier::classify(&v, &symptoms(&["headache"]), ""),
            RiskTier::Blue
        );
        assert_eq!(
            RiskClassifier::classify(&v, &symptoms(&["headache", "dizziness"]), ""),
            RiskTier::Green
        );
    }

    #[test]
    fn chief_complaint_does_not_change_tier() {
        let v = vitals(normal());
        let s = SymptomSet::new();
        assert_eq!(
            RiskClassifier::classify(&v, &s, "cardiac arrest, unconscious"),
            RiskClassifier::classify(&v, &s, "")
        );
    }

    #[test]
    fn classify_checked_rejects_implausible_readings() {
        let v = vitals(normal().heart_rate(999));
        let err = RiskClassifier::classify_checked(&v, &SymptomSet::new(), "")
            .expect_err("implausible heart rate");
        assert!(matches!(err, TriageError::InvalidVitals(_)));
    }

    #[test]
    fn rules_are_grouped_by_tier_in_cascade_order() {
        let ranks: Vec<u8> = Rule::ALL.iter().map(|r| r.tier().severity_rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
        assert!(Rule::ALL.iter().all(|r| r.tier() != RiskTier::Blue));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn consciousness() -> impl Strategy<Value = Consciousness> {
            prop_oneof![
                Just(Consciousness::Alert),
                Just(Consciousness::Voice),
                Just(Consciousness::Pain),
                Just(Consciousness::Unresponsive),
            ]
        }

        prop_compose! {
            fn any_vitals()(
                systolic in proptest::option::of(0u16..=300),
                diastolic in proptest::option::of(0u16..=250),
                heart_rate in proptest::option::of(0u16..=300),
                respiratory_rate in proptest::option::of(0u16..=90),
                temperature in proptest::option::of(25.0f64..=45.0),
                oxygen_saturation in proptest::option::of(0u8..=100),
                glucose in proptest::option::of(0u16..=2000),
                consciousness in consciousness(),
                glasgow_score in 3u8..=15,
                pain_score in 0u8..=10,
            ) -> VitalSigns {
                VitalSigns {
                    systolic_bp: systolic,
                    diastolic_bp: diastolic,
                    heart_rate,
                    respiratory_rate,
                    temperature,
                    oxygen_saturation,
                    glucose,
                    consciousness,
                    glasgow_score,
                    pain_score,
                }
            }
        }

        fn any_symptoms() -> impl Strategy<Value = SymptomSet> {
            proptest::collection::vec("[a-z]{1,12}", 0..5).prop_map(|labels| {
                SymptomSet::try_from(labels).expect("generated labels are non-empty")
            })
        }

        proptest! {
            #[test]
            fn tier_matches_most_severe_satisfied_rule(v in any_vitals(), s in any_symptoms()) {
                let result = RiskClassifier::evaluate(&v, &s, "");
                let most_severe = Rule::ALL
                    .iter()
                    .filter(|rule| rule.is_satisfied(&v, &s))
                    .map(Rule::tier)
                    .min_by_key(RiskTier::severity_rank)
                    .unwrap_or(RiskTier::Blue);

                prop_assert_eq!(result.tier, most_severe);
                prop_assert!(result.triggered.iter().all(|r| r.tier() == result.tier));
            }

            #[test]
            fn classification_is_idempotent(v in any_vitals(), s in any_symptoms()) {
                let first = RiskClassifier::evaluate(&v, &s, "complaint");
                let second = RiskClassifier::evaluate(&v, &s, "complaint");
                prop_assert_eq!(first, second);
            }

            #[test]
            fn unresponsive_is_always_red(v in any_vitals(), s in any_symptoms()) {
                let v = VitalSigns { consciousness: Consciousness::Unresponsive, ..v };
                prop_assert_eq!(RiskClassifier::classify(&v, &s, ""), RiskTier::Red);
            }
        }
    }
}
