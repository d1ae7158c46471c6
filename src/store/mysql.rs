use async_trait::async_trait;
use futures_util::StreamExt;
use sqlx::MySqlPool;

use super::{AttendanceStore, StagedClosure};
use crate::error::StoreError;
use crate::model::shift::Shift;
use crate::model::timesheet::Timesheet;

/// Production store over the shared MySQL pool.
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn find_open_timesheets(
        &self,
        page_size: u32,
        organization_id: Option<u64>,
    ) -> Result<Vec<Timesheet>, StoreError> {
        let mut sql = String::from(
            r#"
            SELECT id, organization_id, worker_id, shift_id,
                   clock_in_at, clock_out_at, auto_clock_out_at, source
            FROM timesheets
            WHERE clock_in_at IS NOT NULL
              AND clock_out_at IS NULL
              AND auto_clock_out_at IS NULL
            "#,
        );
        if organization_id.is_some() {
            sql.push_str(" AND organization_id = ?");
        }
        sql.push_str(" ORDER BY clock_in_at, id LIMIT ?");

        let mut query = sqlx::query_as::<_, Timesheet>(&sql);
        if let Some(org) = organization_id {
            query = query.bind(org);
        }

        let mut stream = query.bind(page_size).fetch(&self.pool);
        let mut page = Vec::with_capacity(page_size as usize);
        while let Some(row) = stream.next().await {
            page.push(row?);
        }
        Ok(page)
    }

    async fn shift_by_id(&self, shift_id: u64) -> Result<Option<Shift>, StoreError> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, organization_id, day, `start`, `end`, assigned_worker_id, status
            FROM shifts
            WHERE id = ?
            "#,
        )
        .bind(shift_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(shift)
    }

    async fn commit_closures(&self, group: &[StagedClosure]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for staged in group {
            // Last writer wins on clock_out_at: a manual clock-out racing
            // this update is acceptable because the re-query excludes the
            // record either way.
            sqlx::query(
                r#"
                UPDATE timesheets
                SET clock_out_at = ?, auto_clock_out_at = ?, source = 'auto', updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(staged.timesheet.clock_out_at)
            .bind(staged.timesheet.auto_clock_out_at)
            .bind(staged.timesheet.auto_clock_out_at)
            .bind(staged.timesheet.timesheet_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO attendance_ledger
                    (shift_id, organization_id, worker_id, clock_in_at, clock_out_at,
                     auto_clock_out, recorded_at, hash)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(staged.ledger.shift_id)
            .bind(staged.ledger.organization_id)
            .bind(staged.ledger.worker_id)
            .bind(staged.ledger.clock_in_at)
            .bind(staged.ledger.clock_out_at)
            .bind(staged.ledger.auto_clock_out)
            .bind(staged.ledger.recorded_at)
            .bind(staged.ledger.hash.as_str())
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO alerts
                    (alert_type, severity, message, worker_id, shift_id,
                     organization_id, resolved, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(staged.alert.alert_type)
            .bind(staged.alert.severity)
            .bind(staged.alert.message.as_str())
            .bind(staged.alert.worker_id)
            .bind(staged.alert.shift_id)
            .bind(staged.alert.organization_id)
            .bind(staged.alert.resolved)
            .bind(staged.alert.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
