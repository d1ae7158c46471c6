use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which actor closed the record: the worker themselves or this subsystem.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ClockSource {
    Manual,
    Auto,
}

/// One attendance record per (worker, shift).
///
/// `clock_out_at` is null XOR set and never overwritten once set;
/// `source == auto` iff `auto_clock_out_at` is set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Timesheet {
    pub id: u64,
    pub organization_id: u64,
    pub worker_id: u64,
    pub shift_id: Option<u64>,
    pub clock_in_at: DateTime<Utc>,
    pub clock_out_at: Option<DateTime<Utc>>,
    /// Set only when this subsystem closed the record.
    pub auto_clock_out_at: Option<DateTime<Utc>>,
    pub source: ClockSource,
}
