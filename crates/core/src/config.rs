//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the worklist
//! or into [`TriageRecord::conclude_with`](crate::TriageRecord::conclude_with). Core code
//! never reads environment variables while handling a record.

use crate::{TriageError, TriageResult};
use std::fmt;
use std::str::FromStr;

/// What `conclude` does when a reading that some rule depends on was never recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingVitalsPolicy {
    /// An absent reading satisfies no rule, so it behaves as a normal value.
    #[default]
    AssumeNormal,
    /// Refuse to conclude until every rule-relevant reading is present.
    Require,
}

impl MissingVitalsPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssumeNormal => "assume-normal",
            Self::Require => "require",
        }
    }
}

impl fmt::Display for MissingVitalsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingVitalsPolicy {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "assume-normal" => Ok(Self::AssumeNormal),
            "require" => Ok(Self::Require),
            other => Err(TriageError::InvalidInput(format!(
                "unknown missing-vitals policy '{other}' (expected 'assume-normal' or 'require')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct TriageConfig {
    missing_vitals: MissingVitalsPolicy,
}

impl TriageConfig {
    pub fn new(missing_vitals: MissingVitalsPolicy) -> Self {
        Self { missing_vitals }
    }

    pub fn missing_vitals(&self) -> MissingVitalsPolicy {
        self.missing_vitals
    }
}

/// Parse the missing-vitals policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn missing_vitals_policy_from_env_value(
    value: Option<String>,
) -> TriageResult<MissingVitalsPolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value
        .map(|v| v.parse::<MissingVitalsPolicy>())
        .transpose()?;

    Ok(parsed.unwrap_or_default())
}
