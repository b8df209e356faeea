use crate::application::repos::StoreError;

const UNDEFINED_TABLE: &str = "42P01";
const UNDEFINED_COLUMN: &str = "42703";

pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db)
            if matches!(
                db.code().as_deref(),
                Some(UNDEFINED_TABLE) | Some(UNDEFINED_COLUMN)
            ) =>
        {
            StoreError::unsupported(db.message())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::unavailable(err),
        other => StoreError::query(other),
    }
}
