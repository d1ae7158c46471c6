use std::env;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::error::ConfigError;
use crate::worker::committer::MAX_BATCH_OPS;

/// Everything one reconciliation run needs. Constructed from the
/// environment in production and directly in tests.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub grace_minutes: i64,
    pub page_size: u32,
    /// Unset means reconcile across all organizations.
    pub organization_id: Option<u64>,
    /// Validated at the start of every run; a missing salt aborts the run
    /// before any write.
    pub ledger_salt: Option<String>,
    pub max_batch_ops: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            grace_minutes: 25,
            page_size: 500,
            organization_id: None,
            ledger_salt: None,
            max_batch_ops: MAX_BATCH_OPS,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub interval_secs: u64,
    pub worker: WorkerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let worker = WorkerConfig {
            grace_minutes: parse_or("AUTO_CLOCKOUT_GRACE_MINUTES", 25)?,
            page_size: parse_or("WORKER_PAGE_SIZE", 500)?,
            organization_id: parse_opt("WORKER_ORGANIZATION_ID")?,
            ledger_salt: env::var("LEDGER_HASH_SALT").ok().filter(|s| !s.is_empty()),
            max_batch_ops: MAX_BATCH_OPS,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar {
                name: "DATABASE_URL",
            })?,
            interval_secs: parse_or("WORKER_INTERVAL_SECS", 300)?, // default 5 min
            worker,
        })
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_opt<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        _ => Ok(None),
    }
}
