pub mod alert;
pub mod committer;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clock;
use crate::config::WorkerConfig;
use crate::error::{ConfigError, WorkerError};
use crate::ledger;
use crate::model::ledger::LedgerEntry;
use crate::store::{AttendanceStore, StagedClosure, TimesheetClosure};

use self::alert::build_late_clockout_alert;
use self::committer::BatchCommitter;
use crate::model::timesheet::Timesheet;

/// Why an open record was left untouched this run. Skipped records stay
/// open and are re-evaluated on the next scheduled invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingShiftRef,
    ShiftNotFound,
    Unassigned,
    InvalidShiftTimes,
    NotYetDue,
}

/// Per-record state machine outcome:
/// `Open -> { Skipped | EligibleForClose }`. A staged record counts as
/// closed only once its batch group commits.
enum Evaluation {
    Skipped(SkipReason),
    HashFailed,
    Eligible(StagedClosure),
}

/// Counters for one reconciliation pass, emitted with the completion log.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub scanned: usize,
    pub closed: usize,
    pub batches: usize,
    pub skipped_missing_shift: usize,
    pub skipped_unassigned: usize,
    pub skipped_invalid_times: usize,
    pub skipped_not_due: usize,
    pub hash_failures: usize,
}

impl RunSummary {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingShiftRef | SkipReason::ShiftNotFound => {
                self.skipped_missing_shift += 1
            }
            SkipReason::Unassigned => self.skipped_unassigned += 1,
            SkipReason::InvalidShiftTimes => self.skipped_invalid_times += 1,
            SkipReason::NotYetDue => self.skipped_not_due += 1,
        }
    }
}

/// Periodic batch job closing attendance records whose shift ended more
/// than the grace period ago. Single-threaded, one page of records per
/// invocation; the external trigger guarantees at most one live instance.
pub struct ReconciliationWorker<'a, S> {
    store: &'a S,
    config: WorkerConfig,
}

impl<'a, S: AttendanceStore> ReconciliationWorker<'a, S> {
    pub fn new(store: &'a S, config: WorkerConfig) -> Self {
        Self { store, config }
    }

    /// One reconciliation pass. `now` is injected so runs are replayable in
    /// tests.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary, WorkerError> {
        let run_id = Uuid::new_v4();

        // Fail closed before touching any store: a ledger entry written
        // without a valid salt would create false confidence in
        // auditability.
        let salt = match self.config.ledger_salt.as_deref() {
            Some(salt) if !salt.is_empty() => salt.to_string(),
            _ => {
                error!(
                    run_id = %run_id,
                    "LEDGER_HASH_SALT is not configured. Skipping reconciliation run."
                );
                return Err(ConfigError::MissingSalt.into());
            }
        };
        if self.config.grace_minutes < 0 {
            return Err(ConfigError::InvalidValue {
                name: "AUTO_CLOCKOUT_GRACE_MINUTES",
                value: self.config.grace_minutes.to_string(),
            }
            .into());
        }

        info!(
            run_id = %run_id,
            grace_minutes = self.config.grace_minutes,
            page_size = self.config.page_size,
            "Starting reconciliation run"
        );

        let open = self
            .store
            .find_open_timesheets(self.config.page_size, self.config.organization_id)
            .await?;

        if open.is_empty() {
            info!(run_id = %run_id, "No open timesheets found");
            return Ok(RunSummary::default());
        }

        let mut summary = RunSummary {
            scanned: open.len(),
            ..RunSummary::default()
        };

        let mut staged = Vec::new();
        for timesheet in &open {
            match self.evaluate(timesheet, now, &salt).await? {
                Evaluation::Skipped(reason) => summary.record_skip(reason),
                Evaluation::HashFailed => summary.hash_failures += 1,
                Evaluation::Eligible(closure) => staged.push(closure),
            }
        }

        let committer = BatchCommitter::new(self.store, self.config.max_batch_ops);
        let (outcome, commit_error) = committer.commit_all(staged).await;
        summary.closed = outcome.closed;
        summary.batches = outcome.groups;

        if let Some(e) = commit_error {
            error!(
                run_id = %run_id,
                error = %e,
                closed = summary.closed,
                "Reconciliation run aborted mid-commit"
            );
            return Err(e.into());
        }

        info!(
            run_id = %run_id,
            scanned = summary.scanned,
            closed = summary.closed,
            batches = summary.batches,
            skipped_not_due = summary.skipped_not_due,
            skipped_missing_shift = summary.skipped_missing_shift,
            hash_failures = summary.hash_failures,
            "Reconciliation run complete"
        );
        Ok(summary)
    }

    async fn evaluate(
        &self,
        timesheet: &Timesheet,
        now: DateTime<Utc>,
        salt: &str,
    ) -> Result<Evaluation, WorkerError> {
        let Some(shift_id) = timesheet.shift_id else {
            warn!(
                timesheet_id = timesheet.id,
                "Skipping timesheet with no shift reference"
            );
            return Ok(Evaluation::Skipped(SkipReason::MissingShiftRef));
        };

        let Some(shift) = self.store.shift_by_id(shift_id).await? else {
            warn!(
                timesheet_id = timesheet.id,
                shift_id, "Shift not found for open timesheet"
            );
            return Ok(Evaluation::Skipped(SkipReason::ShiftNotFound));
        };

        if shift.assigned_worker_id.is_none() {
            return Ok(Evaluation::Skipped(SkipReason::Unassigned));
        }

        let (start, end) = match (
            clock::parse_wall_clock(&shift.start),
            clock::parse_wall_clock(&shift.end),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(e), _) | (_, Err(e)) => {
                warn!(shift_id, error = %e, "Skipping shift with unparsable times");
                return Ok(Evaluation::Skipped(SkipReason::InvalidShiftTimes));
            }
        };
        if let Err(e) = clock::check_shift_span(start, end) {
            warn!(shift_id, error = %e, "Skipping shift with unsupported span");
            return Ok(Evaluation::Skipped(SkipReason::InvalidShiftTimes));
        }

        let shift_end = clock::shift_end_instant(shift.day, end);
        let cutoff = clock::cutoff_instant(shift_end, self.config.grace_minutes);
        if now < cutoff {
            return Ok(Evaluation::Skipped(SkipReason::NotYetDue));
        }

        let hash = match ledger::compute_hash(
            salt,
            shift.id,
            timesheet.worker_id,
            timesheet.clock_in_at,
            shift_end,
        ) {
            Ok(hash) => hash,
            Err(e) => {
                error!(
                    timesheet_id = timesheet.id,
                    shift_id,
                    error = %e,
                    "Failed to hash ledger entry; excluding record from this run"
                );
                return Ok(Evaluation::HashFailed);
            }
        };

        let alert =
            build_late_clockout_alert(timesheet, &shift, now, cutoff, self.config.grace_minutes);
        info!(
            timesheet_id = timesheet.id,
            worker_id = timesheet.worker_id,
            shift_id,
            severity = %alert.severity,
            "Timesheet is late; staging auto clock-out"
        );

        Ok(Evaluation::Eligible(StagedClosure {
            timesheet: TimesheetClosure {
                timesheet_id: timesheet.id,
                // Scheduled end, not wall-clock now.
                clock_out_at: shift_end,
                auto_clock_out_at: now,
            },
            ledger: LedgerEntry {
                shift_id: shift.id,
                organization_id: shift.organization_id,
                worker_id: timesheet.worker_id,
                clock_in_at: timesheet.clock_in_at,
                clock_out_at: shift_end,
                auto_clock_out: true,
                recorded_at: now,
                hash,
            },
            alert,
        }))
    }
}
