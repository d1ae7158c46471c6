use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only audit record proving an attendance closure occurred with
/// these exact field values. Never mutated or deleted once written.
///
/// `hash` is the keyed digest over (shift_id, worker_id, clock_in_at,
/// clock_out_at); any later edit to those fields is detectable because the
/// stored hash no longer matches a recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub shift_id: u64,
    pub organization_id: u64,
    pub worker_id: u64,
    pub clock_in_at: DateTime<Utc>,
    pub clock_out_at: DateTime<Utc>,
    pub auto_clock_out: bool,
    pub recorded_at: DateTime<Utc>,
    /// Lowercase hex HMAC-SHA256.
    pub hash: String,
}
