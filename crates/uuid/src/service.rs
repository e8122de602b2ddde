//! Implementation of the patient and encounter identifier types.

use crate::{IdError, IdResult};
use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";

fn is_canonical(input: &str) -> bool {
    input.len() == 32
        && input
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn parse_canonical(input: &str) -> IdResult<Uuid> {
    if !is_canonical(input) {
        return Err(IdError::InvalidInput(format!(
            "UUID must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )));
    }
    Uuid::parse_str(input)
        .map_err(|e| IdError::InvalidInput(format!("Invalid UUID '{}': {}", input, e)))
}

/// Patient identifier in canonical form (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is guaranteed canonical, so callers receiving
/// a `PatientId` never need to re-validate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(Uuid);

impl Default for PatientId {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientId {
    /// Generates a fresh random (v4) patient identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> IdResult<Self> {
        parse_canonical(input).map(Self)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical UUID form.
    pub fn is_canonical(input: &str) -> bool {
        is_canonical(input)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for PatientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientId::parse(s)
    }
}

/// Identifier of a single triage encounter.
///
/// Format: `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>`.
///
/// The timestamp is held at millisecond precision so that display and parse agree.
/// Ordering compares the timestamp first, then the UUID.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriageId {
    timestamp: DateTime<Utc>,
    uuid: Uuid,
}

impl TriageId {
    /// Generate a new identifier stamped with the current time.
    ///
    /// If `previous` is provided, the timestamp is guaranteed to be strictly greater
    /// than the previous one (by at least 1 ms).
    pub fn generate(previous: Option<&TriageId>) -> Self {
        Self::generate_at(Utc::now(), previous)
    }

    /// Same as [`TriageId::generate`] with an explicit clock reading.
    pub fn generate_at(now: DateTime<Utc>, previous: Option<&TriageId>) -> Self {
        let now = now.trunc_subsecs(3);
        let timestamp = match previous {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            timestamp,
            uuid: Uuid::new_v4(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl FromStr for TriageId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts_str, uuid_str) = s.split_once('-').ok_or_else(|| {
            IdError::InvalidInput(format!("Invalid triage id format: '{}'", s))
        })?;

        let ts_no_z = ts_str.strip_suffix('Z').ok_or_else(|| {
            IdError::InvalidInput(format!("Timestamp must end with 'Z': '{}'", ts_str))
        })?;

        let naive = NaiveDateTime::parse_from_str(ts_no_z, TIMESTAMP_FORMAT).map_err(|e| {
            IdError::InvalidInput(format!("Invalid timestamp format '{}': {}", ts_str, e))
        })?;

        Ok(Self {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
            uuid: parse_canonical(uuid_str)?,
        })
    }
}

impl fmt::Display for TriageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Z-{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.uuid.simple()
        )
    }
}

/// Issues strictly increasing [`TriageId`]s.
///
/// Holds the last identifier handed out so that two encounters opened within the same
/// millisecond still sort in creation order.
#[derive(Debug, Default)]
pub struct TriageIdGenerator {
    last: Option<TriageId>,
}

impl TriageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume after an existing identifier, for example the newest one loaded from storage.
    pub fn resume_after(last: TriageId) -> Self {
        Self { last: Some(last) }
    }

    pub fn next_id(&mut self) -> TriageId {
        self.next_id_at(Utc::now())
    }

    pub fn next_id_at(&mut self, now: DateTime<Utc>) -> TriageId {
        let id = TriageId::generate_at(now, self.last.as_ref());
        self.last = Some(id.clone());
        id
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{PatientId, TriageId};
    use std::str::FromStr;

    impl serde::Serialize for PatientId {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> serde::Deserialize<'de> for PatientId {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            PatientId::parse(&s).map_err(serde::de::Error::custom)
        }
    }

    impl serde::Serialize for TriageId {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> serde::Deserialize<'de> for TriageId {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            TriageId::from_str(&s).map_err(serde::de::Error::custom)
        }
    }
}
