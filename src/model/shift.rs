use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ShiftStatus {
    Draft,
    Published,
    Cancelled,
}

/// A scheduled work block. Owned by the scheduling feature; read-only from
/// the reconciliation worker's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shift {
    pub id: u64,
    pub organization_id: u64,
    /// Calendar day, no time component, UTC-normalized.
    pub day: NaiveDate,
    /// Wall-clock "HH:mm" start time-of-day.
    pub start: String,
    /// Wall-clock "HH:mm" end time-of-day.
    pub end: String,
    /// None while the shift is unfilled.
    pub assigned_worker_id: Option<u64>,
    pub status: ShiftStatus,
}
