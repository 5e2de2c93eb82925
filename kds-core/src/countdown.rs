//! Per-item preparation countdown
//!
//! Derived state only: the remaining time is recomputed from absolute
//! timestamps on every tick and never drives a status transition.

use chrono::{DateTime, Utc};
use std::time::Duration;

use shared::ItemStatus;

use crate::reconcile::MergedItem;

/// Reference recompute granularity for the display
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining preparation time in seconds.
///
/// `None` means no timer renders (prep duration unresolved). Delivered
/// items always show 0, however much time is left on the clock.
pub fn remaining_secs(
    prep_duration_secs: Option<u64>,
    ticket_created_at: DateTime<Utc>,
    status: ItemStatus,
    now: DateTime<Utc>,
) -> Option<u64> {
    let prep = prep_duration_secs?;

    if status == ItemStatus::Delivered {
        return Some(0);
    }

    let elapsed = (now - ticket_created_at).num_seconds().max(0) as u64;
    Some(prep.saturating_sub(elapsed))
}

/// Convenience over a merged item
pub fn item_remaining_secs(item: &MergedItem, now: DateTime<Utc>) -> Option<u64> {
    remaining_secs(
        item.prep_duration_secs,
        item.ticket_created_at,
        item.status,
        now,
    )
}
