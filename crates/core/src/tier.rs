//! Urgency tiers produced by the classifier.

use crate::TriageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clinical urgency tier, most to least severe: Red, Orange, Yellow, Green, Blue.
///
/// `RiskTier` does not implement `Ord`. "Greater" is ambiguous between severity and sort
/// position, so callers order tiers explicitly through
/// [`WaitPolicy::compare_priority`](crate::WaitPolicy::compare_priority) or
/// [`RiskTier::severity_rank`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Emergency, immediate care.
    Red,
    /// Very urgent.
    Orange,
    /// Urgent.
    Yellow,
    /// Standard.
    Green,
    /// Non-urgent.
    Blue,
}

impl RiskTier {
    /// All tiers in cascade order, most severe first.
    pub const ALL: [RiskTier; 5] = [
        RiskTier::Red,
        RiskTier::Orange,
        RiskTier::Yellow,
        RiskTier::Green,
        RiskTier::Blue,
    ];

    /// 0 for the most severe tier, 4 for the least.
    pub fn severity_rank(&self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Orange => 1,
            Self::Yellow => 2,
            Self::Green => 3,
            Self::Blue => 4,
        }
    }

    pub fn is_more_urgent_than(&self, other: RiskTier) -> bool {
        self.severity_rank() < other.severity_rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }

    /// Short label for worklist displays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Red => "Emergency",
            Self::Orange => "Very urgent",
            Self::Yellow => "Urgent",
            Self::Green => "Standard",
            Self::Blue => "Non-urgent",
        }
    }

    /// Display colour as a hex RGB string.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Red => "#d32f2f",
            Self::Orange => "#f57c00",
            Self::Yellow => "#fbc02d",
            Self::Green => "#388e3c",
            Self::Blue => "#1976d2",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "orange" => Ok(Self::Orange),
            "yellow" => Ok(Self::Yellow),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            _ => Err(TriageError::InvalidInput(format!("Invalid risk tier: {}", s))),
        }
    }
}
