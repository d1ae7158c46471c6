use std::time::Duration;

use chrono::Utc;
use dotenvy::dotenv;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};
use tracing_appender::rolling;

mod clock;
mod config;
mod db;
mod error;
mod ledger;
mod model;
mod store;
mod worker;

use config::Config;
use db::init_db;
use store::mysql::MySqlAttendanceStore;
use worker::ReconciliationWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        interval_secs = config.interval_secs,
        "Reconciliation worker starting..."
    );

    let pool = init_db(&config.database_url).await;
    let store = MySqlAttendanceStore::new(pool);
    let worker = ReconciliationWorker::new(&store, config.worker.clone());

    // Each run is awaited to completion before the ticker sleeps again, so
    // at most one run is ever live in this process. Across processes the
    // external scheduler guarantees a single instance.
    let mut ticker = time::interval(Duration::from_secs(config.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match worker.run(Utc::now()).await {
            Ok(summary) => {
                if summary.closed > 0 {
                    info!(
                        closed = summary.closed,
                        batches = summary.batches,
                        "Auto clock-out applied"
                    );
                }
            }
            // Failed runs retry at the next tick; committed groups stay
            // durable.
            Err(e) => error!(error = %e, "Reconciliation run failed"),
        }
    }
}
