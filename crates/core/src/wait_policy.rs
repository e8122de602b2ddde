//! Maximum-wait bounds and priority ordering over tiers.

use crate::constants::{
    BLUE_MAX_WAIT_MINUTES, GREEN_MAX_WAIT_MINUTES, ORANGE_MAX_WAIT_MINUTES, RED_MAX_WAIT_MINUTES,
    YELLOW_MAX_WAIT_MINUTES,
};
use crate::record::TriageRecord;
use crate::tier::RiskTier;
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

/// Wait-time policy operations.
///
/// Zero-sized namespace; all methods are associated functions over a fixed table.
pub struct WaitPolicy;

impl WaitPolicy {
    /// Longest a patient in `tier` may wait before being seen.
    pub fn max_wait_minutes(tier: RiskTier) -> u32 {
        match tier {
            RiskTier::Red => RED_MAX_WAIT_MINUTES,
            RiskTier::Orange => ORANGE_MAX_WAIT_MINUTES,
            RiskTier::Yellow => YELLOW_MAX_WAIT_MINUTES,
            RiskTier::Green => GREEN_MAX_WAIT_MINUTES,
            RiskTier::Blue => BLUE_MAX_WAIT_MINUTES,
        }
    }

    /// Orders tiers most urgent first: `Red` is `Less` than everything else.
    pub fn compare_priority(a: RiskTier, b: RiskTier) -> Ordering {
        a.severity_rank().cmp(&b.severity_rank())
    }

    /// `elapsed_minutes > max_wait_minutes(tier)`.
    pub fn is_overdue(tier: RiskTier, elapsed_minutes: u64) -> bool {
        elapsed_minutes > u64::from(Self::max_wait_minutes(tier))
    }

    /// Instant by which a patient classified at `from` must be seen, or `None` if it
    /// falls outside the representable date range.
    pub fn deadline(tier: RiskTier, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        from.checked_add_signed(Duration::minutes(i64::from(Self::max_wait_minutes(tier))))
    }

    /// Whole minutes from `since` to `now`. A `now` earlier than `since` counts as zero.
    pub fn elapsed_minutes(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - since).num_minutes()).unwrap_or(0)
    }

    pub fn is_overdue_at(tier: RiskTier, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        Self::is_overdue(tier, Self::elapsed_minutes(since, now))
    }

    /// Sorts concluded records by priority, oldest conclusion first within a tier.
    ///
    /// Records still pending sort after every concluded record, oldest first.
    pub fn sort_worklist(records: &mut [&TriageRecord]) {
        records.sort_by(|a, b| match (a.conclusion(), b.conclusion()) {
            (Some(ca), Some(cb)) => Self::compare_priority(ca.tier, cb.tier)
                .then(ca.concluded_at.cmp(&cb.concluded_at))
                .then_with(|| a.id().cmp(b.id())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id().cmp(b.id()),
        });
    }
}
