pub mod mysql;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::alert::Alert;
use crate::model::ledger::LedgerEntry;
use crate::model::shift::Shift;
use crate::model::timesheet::Timesheet;

/// Store operations per staged closure: one timesheet update plus the
/// ledger and alert inserts.
pub const OPS_PER_CLOSURE: usize = 3;

/// The closing mutation for one timesheet. `clock_out_at` carries the
/// scheduled shift end, never wall-clock now, so auto-closed records show
/// no invented overtime.
#[derive(Debug, Clone)]
pub struct TimesheetClosure {
    pub timesheet_id: u64,
    pub clock_out_at: DateTime<Utc>,
    pub auto_clock_out_at: DateTime<Utc>,
}

/// One eligible record's worth of writes. The three parts must land in the
/// same atomic group: an alert is never created without its ledger entry,
/// and vice versa.
#[derive(Debug, Clone)]
pub struct StagedClosure {
    pub timesheet: TimesheetClosure,
    pub ledger: LedgerEntry,
    pub alert: Alert,
}

/// Seam over the shift/timesheet/ledger/alert collections. Constructed in
/// `main` and injected into the worker; there is no process-wide handle.
#[async_trait]
pub trait AttendanceStore {
    /// One page of records with a clock-in but no clock-out, oldest
    /// clock-in first, optionally scoped to one organization.
    ///
    /// The predicate itself is the idempotency mechanism: closed records
    /// drop out of every later page, so callers re-query on the next run
    /// instead of resuming a cursor.
    async fn find_open_timesheets(
        &self,
        page_size: u32,
        organization_id: Option<u64>,
    ) -> Result<Vec<Timesheet>, StoreError>;

    async fn shift_by_id(&self, shift_id: u64) -> Result<Option<Shift>, StoreError>;

    /// Applies one group of closures atomically: all writes land or none do.
    async fn commit_closures(&self, group: &[StagedClosure]) -> Result<(), StoreError>;
}
