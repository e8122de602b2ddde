//! Validated text primitives shared across the triage crates.
//!
//! - [`NonEmptyText`]: trimmed text guaranteed to contain at least one visible character.
//! - [`SymptomSet`]: de-duplicated collection of free-text symptom labels.

use std::collections::BTreeMap;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input text exceeded the permitted length
    #[error("Text exceeds maximum length of {max} characters")]
    TooLong { max: usize },
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`], additionally bounding the length in characters.
    pub fn with_max_len(input: impl AsRef<str>, max: usize) -> Result<Self, TextError> {
        let text = Self::new(input)?;
        if text.0.chars().count() > max {
            return Err(TextError::TooLong { max });
        }
        Ok(text)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A set of free-text symptom labels as entered at intake.
///
/// Labels are compared case-insensitively, so "Fever" and "fever " collapse into one
/// entry. The first spelling inserted is the one kept for display. Iteration order is
/// stable (sorted by the case-folded key).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomSet {
    labels: BTreeMap<String, NonEmptyText>,
}

impl SymptomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label. Returns `Ok(false)` if an equivalent label was already present.
    pub fn insert(&mut self, label: impl AsRef<str>) -> Result<bool, TextError> {
        let label = NonEmptyText::new(label)?;
        let key = label.as_str().to_lowercase();
        if self.labels.contains_key(&key) {
            return Ok(false);
        }
        self.labels.insert(key, label);
        Ok(true)
    }

    /// Removes a label, matching case-insensitively.
    pub fn remove(&mut self, label: &str) -> bool {
        self.labels.remove(&label.trim().to_lowercase()).is_some()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains_key(&label.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NonEmptyText> {
        self.labels.values()
    }
}

impl<S: AsRef<str>> TryFrom<Vec<S>> for SymptomSet {
    type Error = TextError;

    fn try_from(labels: Vec<S>) -> Result<Self, Self::Error> {
        let mut set = SymptomSet::new();
        for label in labels {
            set.insert(label)?;
        }
        Ok(set)
    }
}

impl serde::Serialize for SymptomSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.labels.values())
    }
}

impl<'de> serde::Deserialize<'de> for SymptomSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let labels = Vec::<String>::deserialize(deserializer)?;
        SymptomSet::try_from(labels).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Ana Souza \n").expect("valid text");
        assert_eq!(text.as_str(), "Ana Souza");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn with_max_len_counts_characters() {
        assert!(NonEmptyText::with_max_len("dor", 3).is_ok());
        assert_eq!(
            NonEmptyText::with_max_len("dores", 3),
            Err(TextError::TooLong { max: 3 })
        );
    }

    #[test]
    fn symptom_set_collapses_case_insensitive_duplicates() {
        let mut set = SymptomSet::new();
        assert_eq!(set.insert("Fever"), Ok(true));
        assert_eq!(set.insert(" fever "), Ok(false));
        assert_eq!(set.insert("nausea"), Ok(true));

        assert_eq!(set.len(), 2);
        assert!(set.contains("FEVER"));
        let labels: Vec<&str> = set.iter().map(NonEmptyText::as_str).collect();
        assert_eq!(labels, vec!["Fever", "nausea"]);
    }

    #[test]
    fn symptom_set_rejects_blank_labels() {
        let err = SymptomSet::try_from(vec!["cough", " "]).expect_err("blank label");
        assert_eq!(err, TextError::Empty);
    }

    #[test]
    fn symptom_set_remove_matches_case_insensitively() {
        let mut set = SymptomSet::try_from(vec!["Headache"]).expect("valid labels");
        assert!(set.remove("headache"));
        assert!(set.is_empty());
        assert!(!set.remove("headache"));
    }

    #[test]
    fn symptom_set_deserialize_validates_labels() {
        let set: SymptomSet =
            serde_json::from_str(r#"["vomiting", "Vomiting", "dizziness"]"#).expect("parse");
        assert_eq!(set.len(), 2);

        let err = serde_json::from_str::<SymptomSet>(r#"["", "cough"]"#);
        assert!(err.is_err());
    }
}
