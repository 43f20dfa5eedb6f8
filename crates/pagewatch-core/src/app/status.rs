//! Poll counters for observability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running totals for the poll loop.
///
/// A failed tick still counts as a tick; `fetch_failures` tells the two
/// apart. `send_failures` counts notifications that were attempted but
/// rejected by the relay (the snapshot update is not rolled back for those).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollCounts {
    pub ticks: u64,
    pub records_listed: u64,
    pub changes_detected: u64,
    pub notifications_sent: u64,
    pub send_failures: u64,
    pub fetch_failures: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
}
