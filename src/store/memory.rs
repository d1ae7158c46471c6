use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AttendanceStore, StagedClosure};
use crate::error::StoreError;
use crate::model::alert::Alert;
use crate::model::ledger::LedgerEntry;
use crate::model::shift::Shift;
use crate::model::timesheet::{ClockSource, Timesheet};

/// In-memory stand-in for the MySQL store. Commits apply all-or-nothing,
/// and a single commit failure can be injected to exercise the partial-run
/// contract.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    timesheets: HashMap<u64, Timesheet>,
    shifts: HashMap<u64, Shift>,
    ledger: Vec<LedgerEntry>,
    alerts: Vec<Alert>,
    commits: usize,
    fail_on_commit: Option<usize>,
}

impl MemoryStore {
    pub fn insert_shift(&self, shift: Shift) {
        self.inner.lock().unwrap().shifts.insert(shift.id, shift);
    }

    pub fn insert_timesheet(&self, timesheet: Timesheet) {
        self.inner
            .lock()
            .unwrap()
            .timesheets
            .insert(timesheet.id, timesheet);
    }

    /// Makes the n-th commit (0-based, counted across the store's lifetime)
    /// fail once; later commits succeed again.
    pub fn fail_on_commit(&self, index: usize) {
        self.inner.lock().unwrap().fail_on_commit = Some(index);
    }

    pub fn timesheet(&self, id: u64) -> Option<Timesheet> {
        self.inner.lock().unwrap().timesheets.get(&id).cloned()
    }

    pub fn open_timesheet_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .timesheets
            .values()
            .filter(|t| t.clock_out_at.is_none() && t.auto_clock_out_at.is_none())
            .count()
    }

    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.inner.lock().unwrap().ledger.clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.inner.lock().unwrap().alerts.clone()
    }

    pub fn commit_count(&self) -> usize {
        self.inner.lock().unwrap().commits
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find_open_timesheets(
        &self,
        page_size: u32,
        organization_id: Option<u64>,
    ) -> Result<Vec<Timesheet>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut open: Vec<Timesheet> = inner
            .timesheets
            .values()
            .filter(|t| t.clock_out_at.is_none() && t.auto_clock_out_at.is_none())
            .filter(|t| organization_id.is_none_or(|org| t.organization_id == org))
            .cloned()
            .collect();
        open.sort_by_key(|t| (t.clock_in_at, t.id));
        open.truncate(page_size as usize);
        Ok(open)
    }

    async fn shift_by_id(&self, shift_id: u64) -> Result<Option<Shift>, StoreError> {
        Ok(self.inner.lock().unwrap().shifts.get(&shift_id).cloned())
    }

    async fn commit_closures(&self, group: &[StagedClosure]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.fail_on_commit == Some(inner.commits) {
            inner.fail_on_commit = None;
            return Err(StoreError {
                message: "injected commit failure".to_string(),
            });
        }
        inner.commits += 1;

        for staged in group {
            if let Some(timesheet) = inner.timesheets.get_mut(&staged.timesheet.timesheet_id) {
                timesheet.clock_out_at = Some(staged.timesheet.clock_out_at);
                timesheet.auto_clock_out_at = Some(staged.timesheet.auto_clock_out_at);
                timesheet.source = ClockSource::Auto;
            }
            inner.ledger.push(staged.ledger.clone());
            inner.alerts.push(staged.alert.clone());
        }
        Ok(())
    }
}
