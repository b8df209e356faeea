//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::ScheduleRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store does not support this query: {0}")]
    Unsupported(String),
    #[error("store query failed: {0}")]
    Query(String),
}

impl StoreError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn unsupported(err: impl std::fmt::Display) -> Self {
        Self::Unsupported(err.to_string())
    }

    pub fn query(err: impl std::fmt::Display) -> Self {
        Self::Query(err.to_string())
    }
}

/// Source of truth for schedule rows.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Every row, in store iteration order.
    async fn fetch_all(&self) -> Result<Vec<ScheduleRecord>, StoreError>;

    /// Greatest modification timestamp across all rows, `None` for an empty
    /// table. Stores without modification columns return
    /// [`StoreError::Unsupported`].
    async fn latest_modification(&self) -> Result<Option<OffsetDateTime>, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;
}
