//! PostgreSQL mirror for the counters: a single `metrics_counters` row.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sqlx::PgPool;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::db::{create_pool, retry_fixed};
use crate::metrics::{CounterService, Counters, Snapshot};

pub const SETUP_ATTEMPTS: u32 = 60;
pub const SETUP_INTERVAL: Duration = Duration::from_secs(2);

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS metrics_counters (
        id SMALLINT PRIMARY KEY,
        visits BIGINT NOT NULL DEFAULT 0,
        generates BIGINT NOT NULL DEFAULT 0,
        updated_at TIMESTAMPTZ NULL
    )
"#;

const SEED_ROW: &str = "INSERT INTO metrics_counters (id, visits, generates, updated_at) \
                        VALUES (1, 0, 0, NULL) ON CONFLICT (id) DO NOTHING";

const WRITE_SNAPSHOT: &str = "UPDATE metrics_counters \
                              SET visits = $1, generates = $2, updated_at = NOW() \
                              WHERE id = 1";

/// Connects and creates the counter table, retrying at a fixed interval while
/// the database comes up. Callers treat an error as fatal.
pub async fn setup(database_url: &str) -> Result<PgPool> {
    retry_fixed(SETUP_ATTEMPTS, SETUP_INTERVAL, move || async move {
        let pool = create_pool(database_url).await?;
        ensure_schema(&pool).await?;
        Ok(pool)
    })
    .await
}

async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_TABLE).execute(pool).await?;
    if let Err(e) = sqlx::query(SEED_ROW).execute(pool).await {
        warn!("Seeding metrics row failed: {e}");
    }
    info!("metrics_counters table ready");
    Ok(())
}

/// Spawns the writer that copies the latest counter values to the database
/// whenever `notify` fires. Write failures are logged and the next
/// notification tries again.
pub fn spawn_mirror(pool: PgPool, counters: Counters, notify: Arc<Notify>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            notify.notified().await;
            let snapshot = counters.snapshot();
            match write_snapshot(&pool, snapshot).await {
                Ok(()) => debug!(?snapshot, "Counters mirrored"),
                Err(e) => warn!("Mirroring counters failed: {e}"),
            }
        }
    })
}

async fn write_snapshot(pool: &PgPool, snapshot: Snapshot) -> Result<(), sqlx::Error> {
    sqlx::query(WRITE_SNAPSHOT)
        .bind(to_bigint(snapshot.visits))
        .bind(to_bigint(snapshot.generates))
        .execute(pool)
        .await?;
    Ok(())
}

fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
