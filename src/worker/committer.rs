use tracing::{debug, error};

use crate::error::StoreError;
use crate::store::{AttendanceStore, OPS_PER_CLOSURE, StagedClosure};

/// Upper bound on write operations per atomic group, matching the store's
/// batch limit.
pub const MAX_BATCH_OPS: usize = 500;

/// What a commit pass achieved before returning. On error the committed
/// prefix is durable; the uncommitted remainder stays open and is picked up
/// by the next scheduled run.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitOutcome {
    pub groups: usize,
    pub closed: usize,
}

/// Commits staged closures in bounded atomic groups, sequentially.
pub struct BatchCommitter<'a, S> {
    store: &'a S,
    max_ops: usize,
}

impl<'a, S: AttendanceStore> BatchCommitter<'a, S> {
    pub fn new(store: &'a S, max_ops: usize) -> Self {
        Self { store, max_ops }
    }

    /// Partitions `staged` into groups of at most `max_ops` store
    /// operations and commits each group atomically, one after another.
    /// Returns the durable progress alongside the first error, if any.
    pub async fn commit_all(
        &self,
        staged: Vec<StagedClosure>,
    ) -> (CommitOutcome, Option<StoreError>) {
        let per_group = (self.max_ops / OPS_PER_CLOSURE).max(1);
        let mut outcome = CommitOutcome::default();

        for group in staged.chunks(per_group) {
            if let Err(e) = self.store.commit_closures(group).await {
                error!(
                    error = %e,
                    committed_groups = outcome.groups,
                    committed_closures = outcome.closed,
                    "Batch commit failed; remainder will be retried next run"
                );
                return (outcome, Some(e));
            }
            outcome.groups += 1;
            outcome.closed += group.len();
            debug!(group_size = group.len(), "Committed closure group");
        }

        (outcome, None)
    }
}
