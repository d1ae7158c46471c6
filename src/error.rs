use chrono::NaiveTime;
use thiserror::Error;

/// Configuration problems. Fatal to a whole run: nothing is written and the
/// next scheduled tick retries once the environment is fixed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    MissingVar { name: &'static str },

    #[error("LEDGER_HASH_SALT is not configured")]
    MissingSalt,

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Rejected shift times. Per-record: the worker skips the shift and leaves
/// its timesheet open.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("invalid wall-clock time {value:?}")]
    InvalidWallClock {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("overnight span {start}..{end} is not supported")]
    OvernightSpan { start: NaiveTime, end: NaiveTime },
}

/// Ledger digest failures. Per-record: the record is excluded from its
/// batch group, the rest of the group still commits.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("ledger hash salt is empty")]
    EmptySalt,

    #[error("ledger hash key rejected")]
    InvalidKey,
}

/// Query or commit failure against the backing store.
#[derive(Debug, Error)]
#[error("store unavailable: {message}")]
pub struct StoreError {
    pub message: String,
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}

/// Run-fatal failures of the reconciliation worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Aborts the remainder of the run; batch groups already committed
    /// remain valid and drop out of the next run's query.
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}
