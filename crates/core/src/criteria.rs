//! Human-readable criteria shown next to a classification.
//!
//! This table is for explanation only. [`annotate`] does case-insensitive keyword
//! matching of symptom labels and the chief complaint against it, and the result is
//! an annotation for the operator. Nothing here is read by
//! [`RiskClassifier`](crate::RiskClassifier).

use crate::tier::RiskTier;
use triage_types::SymptomSet;

/// A displayable criterion with the keywords that suggest it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Criterion {
    pub tier: RiskTier,
    pub description: &'static str,
    keywords: &'static [&'static str],
}

const fn criterion(
    tier: RiskTier,
    description: &'static str,
    keywords: &'static [&'static str],
) -> Criterion {
    Criterion {
        tier,
        description,
        keywords,
    }
}

static CATALOGUE: &[Criterion] = &[
    criterion(RiskTier::Red, "Cardiorespiratory arrest", &["arrest", "no pulse", "not breathing"]),
    criterion(RiskTier::Red, "Airway obstruction", &["choking", "airway", "stridor"]),
    criterion(RiskTier::Red, "Shock", &["shock", "cold clammy", "mottled"]),
    criterion(RiskTier::Red, "Unresponsive patient", &["unresponsive", "unconscious"]),
    criterion(RiskTier::Red, "Active seizure", &["seizure", "convulsion", "fitting"]),
    criterion(RiskTier::Orange, "Severe chest pain", &["chest pain", "chest tightness"]),
    criterion(RiskTier::Orange, "Severe shortness of breath", &["short of breath", "breathless", "dyspnoea", "dyspnea"]),
    criterion(RiskTier::Orange, "Altered level of consciousness", &["confused", "confusion", "drowsy", "disoriented"]),
    criterion(RiskTier::Orange, "Acute neurological deficit", &["weakness", "slurred speech", "facial droop", "numbness"]),
    criterion(RiskTier::Orange, "Uncontrolled bleeding", &["bleeding", "haemorrhage", "hemorrhage"]),
    criterion(RiskTier::Orange, "Very high fever", &["very high fever", "hyperpyrexia"]),
    criterion(RiskTier::Yellow, "Moderate pain", &["abdominal pain", "back pain", "pain"]),
    criterion(RiskTier::Yellow, "Fever", &["fever", "febrile"]),
    criterion(RiskTier::Yellow, "Persistent vomiting", &["vomiting", "vomit"]),
    criterion(RiskTier::Yellow, "Moderate shortness of breath", &["wheeze", "wheezing", "cough with breathlessness"]),
    criterion(RiskTier::Yellow, "Head injury without loss of consciousness", &["head injury", "head trauma"]),
    criterion(RiskTier::Green, "Minor injury", &["sprain", "bruise", "minor cut", "laceration"]),
    criterion(RiskTier::Green, "Mild pain", &["mild pain", "ache", "headache"]),
    criterion(RiskTier::Green, "Cold or flu symptoms", &["cough", "sore throat", "runny nose", "congestion"]),
    criterion(RiskTier::Green, "Nausea without vomiting", &["nausea", "nauseous"]),
    criterion(RiskTier::Blue, "Routine consultation", &["routine", "check-up", "checkup"]),
    criterion(RiskTier::Blue, "Prescription renewal", &["prescription", "repeat medication"]),
    criterion(RiskTier::Blue, "Test results review", &["results", "test review"]),
    criterion(RiskTier::Blue, "Stable chronic complaint", &["chronic", "long-standing"]),
];

/// Criteria for `tier`, in display order.
pub fn criteria_for(tier: RiskTier) -> impl Iterator<Item = &'static Criterion> {
    CATALOGUE.iter().filter(move |c| c.tier == tier)
}

/// Display descriptions for `tier`.
pub fn descriptions_for(tier: RiskTier) -> Vec<&'static str> {
    criteria_for(tier).map(|c| c.description).collect()
}

/// Where a free-text match came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchSource {
    Symptom(String),
    ChiefComplaint,
}

/// An advisory hint that some entered text mentions a criterion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub criterion: &'static Criterion,
    pub keyword: &'static str,
    pub source: MatchSource,
}

impl Criterion {
    /// First keyword contained in `text`, compared case-insensitively.
    fn matching_keyword(&self, text: &str) -> Option<&'static str> {
        let text = text.to_lowercase();
        self.keywords.iter().copied().find(|kw| text.contains(kw))
    }
}

/// Best-effort keyword matching of entered text against the catalogue.
///
/// Each criterion is reported at most once per source. Results are ordered by tier
/// severity, then catalogue order.
pub fn annotate(symptoms: &SymptomSet, chief_complaint: &str) -> Vec<Annotation> {
    let mut sources: Vec<(MatchSource, &str)> = symptoms
        .iter()
        .map(|s| (MatchSource::Symptom(s.as_str().to_owned()), s.as_str()))
        .collect();
    if !chief_complaint.trim().is_empty() {
        sources.push((MatchSource::ChiefComplaint, chief_complaint));
    }

    let mut annotations = Vec::new();
    for criterion in CATALOGUE {
        for (source, text) in &sources {
            if let Some(keyword) = criterion.matching_keyword(text) {
                annotations.push(Annotation {
                    criterion,
                    keyword,
                    source: source.clone(),
                });
            }
        }
    }
    annotations.sort_by_key(|a| a.criterion.tier.severity_rank());
    annotations
}
