use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};
use time::OffsetDateTime;
use tracing::debug;

use crate::{
    application::repos::{ScheduleStore, StoreError, StoreHealth},
    domain::entities::ScheduleRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

const FETCH_ALL_SQL: &str = r#"
    SELECT id, start, stop, data
    FROM schedule
    ORDER BY id
"#;

// An empty table yields a single NULL row.
const LATEST_MODIFICATION_SQL: &str = r#"
    SELECT MAX(COALESCE(GREATEST(updated_at, created_at), now())) AS latest
    FROM schedule
"#;

fn record_from_row(row: &PgRow) -> Result<ScheduleRecord, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let payload: Option<String> = row.try_get("data")?;
    Ok(ScheduleRecord {
        id,
        start: timestamp_column(row, id, "start"),
        stop: timestamp_column(row, id, "stop"),
        payload: payload.unwrap_or_default(),
    })
}

/// A value that cannot be decoded is treated like NULL and left to the
/// normalizer to reject.
fn timestamp_column(row: &PgRow, id: i64, column: &str) -> Option<OffsetDateTime> {
    match row.try_get::<Option<OffsetDateTime>, _>(column) {
        Ok(value) => value,
        Err(err) => {
            debug!(id, column, error = %err, "schedule timestamp could not be decoded");
            None
        }
    }
}

#[async_trait]
impl ScheduleStore for PostgresRepositories {
    async fn fetch_all(&self) -> Result<Vec<ScheduleRecord>, StoreError> {
        let rows = sqlx::query(FETCH_ALL_SQL)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }

    async fn latest_modification(&self) -> Result<Option<OffsetDateTime>, StoreError> {
        sqlx::query_scalar::<_, Option<OffsetDateTime>>(LATEST_MODIFICATION_SQL)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl StoreHealth for PostgresRepositories {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.ping().await.map_err(map_sqlx_error)
    }
}
