use chrono::{DateTime, Duration, Utc};

use crate::model::alert::{Alert, AlertType, Severity};
use crate::model::shift::Shift;
use crate::model::timesheet::Timesheet;

/// Severity policy: low while the record is within one extra grace window
/// past the cutoff, medium beyond that. Thresholds are policy, not
/// contract.
pub fn severity_for(
    now: DateTime<Utc>,
    cutoff: DateTime<Utc>,
    grace_minutes: i64,
) -> Severity {
    if now <= cutoff + Duration::minutes(grace_minutes) {
        Severity::Low
    } else {
        Severity::Medium
    }
}

/// Builds the `late_clockout` alert for an auto-closed record. Pure
/// construction; the insert lands in the same atomic group as the ledger
/// entry so neither exists without the other.
pub fn build_late_clockout_alert(
    timesheet: &Timesheet,
    shift: &Shift,
    now: DateTime<Utc>,
    cutoff: DateTime<Utc>,
    grace_minutes: i64,
) -> Alert {
    Alert {
        alert_type: AlertType::LateClockout,
        severity: severity_for(now, cutoff, grace_minutes),
        message: format!(
            "Worker {} was automatically clocked out for shift {}.",
            timesheet.worker_id, shift.id
        ),
        worker_id: timesheet.worker_id,
        shift_id: shift.id,
        organization_id: shift.organization_id,
        resolved: false,
        created_at: now,
    }
}
