//! Schedule query facade.
//!
//! The only entry point HTTP handlers use. Bucket reads never fail: a valid
//! snapshot is served as is, anything else falls back to a direct scan of the
//! store and schedules a background refresh.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::{
    application::repos::{ScheduleStore, StoreError},
    cache::{
        RefreshTrigger, ScheduleCache, in_bucket,
        metrics::{METRIC_CACHE_HIT, METRIC_CACHE_MISS, METRIC_DIRECT_SCAN},
        normalize_all,
    },
    domain::{entities::NormalizedEntry, error::DomainError, lookup::TimeQuery, types::Bucket},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("{0}")]
    InvalidArgument(String),
}

impl From<DomainError> for QueryError {
    fn from(err: DomainError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Outcome of a forced refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
    pub cache_enabled: bool,
    pub entries: usize,
    pub skipped: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
}

/// Read-only view of the cache for operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    pub enabled: bool,
    pub ttl_seconds: i64,
    pub auto_refresh_interval_seconds: u64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub classified_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub computed_at: Option<OffsetDateTime>,
    pub entries: usize,
    pub previous: usize,
    pub now: usize,
    pub upnext: usize,
    pub skipped: usize,
}

#[derive(Clone)]
pub struct ScheduleService {
    cache: Arc<ScheduleCache>,
    store: Arc<dyn ScheduleStore>,
    trigger: RefreshTrigger,
}

impl ScheduleService {
    pub fn new(cache: Arc<ScheduleCache>, store: Arc<dyn ScheduleStore>) -> Self {
        let trigger = RefreshTrigger::new(cache.clone(), store.clone());
        Self {
            cache,
            store,
            trigger,
        }
    }

    pub fn trigger(&self) -> &RefreshTrigger {
        &self.trigger
    }

    pub fn cache(&self) -> &Arc<ScheduleCache> {
        &self.cache
    }

    /// Entries of `bucket`. Never fails; an unreachable store yields nothing.
    pub async fn get_bucket(&self, bucket: Bucket) -> Vec<NormalizedEntry> {
        let enabled = self.cache.config().is_enabled();

        if enabled {
            if self.cache.is_valid(self.store.as_ref()).await
                && let Some(snapshot) = self.cache.snapshot()
            {
                counter!(METRIC_CACHE_HIT).increment(1);
                return snapshot.bucket(bucket).to_vec();
            }
            counter!(METRIC_CACHE_MISS).increment(1);
        }

        let entries = self.direct_scan(bucket).await;

        if enabled {
            self.trigger.spawn_refresh("stale read");
        }

        entries
    }

    /// Case-insensitive substring search over titles and descriptions.
    /// Either term matching is enough; empty terms are ignored. Terms are
    /// matched verbatim, whitespace included.
    pub async fn search(
        &self,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Vec<NormalizedEntry>, QueryError> {
        let title = normalized_term(title);
        let description = normalized_term(description);
        if title.is_none() && description.is_none() {
            return Err(QueryError::InvalidArgument(
                "at least one of `title` or `description` is required".to_string(),
            ));
        }

        let matches = |entry: &NormalizedEntry, key: &str, term: &Option<String>| {
            term.as_deref().is_some_and(|term| {
                entry
                    .field_text(key)
                    .is_some_and(|value| value.to_lowercase().contains(term))
            })
        };

        Ok(self
            .get_bucket(Bucket::All)
            .await
            .into_iter()
            .filter(|entry| {
                matches(entry, "title", &title) || matches(entry, "description", &description)
            })
            .collect())
    }

    /// Entries airing at an instant, or at any point of a calendar day.
    pub async fn lookup_at(&self, input: &str) -> Result<Vec<NormalizedEntry>, QueryError> {
        let window = TimeQuery::parse(input)?.window();
        Ok(self
            .get_bucket(Bucket::All)
            .await
            .into_iter()
            .filter(|entry| entry.overlaps(window.start, window.end))
            .collect())
    }

    /// Rebuild the snapshot regardless of validity, even with caching off.
    pub async fn force_refresh(&self) -> Result<RefreshReport, StoreError> {
        let snapshot = self.cache.refresh(self.store.as_ref()).await?;
        Ok(RefreshReport {
            cache_enabled: self.cache.config().is_enabled(),
            entries: snapshot.len(),
            skipped: snapshot.skipped(),
            computed_at: snapshot.computed_at(),
        })
    }

    pub fn cache_status(&self) -> CacheStatus {
        let config = self.cache.config();
        let snapshot = self.cache.snapshot();
        let size = |bucket: Bucket| snapshot.as_ref().map_or(0, |s| s.bucket(bucket).len());
        CacheStatus {
            enabled: config.enabled,
            ttl_seconds: config.ttl_seconds,
            auto_refresh_interval_seconds: config.auto_refresh_interval_seconds,
            classified_at: snapshot.as_ref().map(|s| s.classified_at()),
            computed_at: snapshot.as_ref().map(|s| s.computed_at()),
            entries: size(Bucket::All),
            previous: size(Bucket::Previous),
            now: size(Bucket::Now),
            upnext: size(Bucket::UpNext),
            skipped: snapshot.as_ref().map_or(0, |s| s.skipped()),
        }
    }

    async fn direct_scan(&self, bucket: Bucket) -> Vec<NormalizedEntry> {
        counter!(METRIC_DIRECT_SCAN).increment(1);

        let records = match self.store.fetch_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    target = "chunt_schedule::application::schedule",
                    bucket = %bucket,
                    error = %err,
                    "Direct schedule scan failed; returning no entries"
                );
                return Vec::new();
            }
        };

        let now = self.cache.clock().now();
        let batch = normalize_all(records);
        debug!(bucket = %bucket, rows = batch.entries.len(), "Direct schedule scan");

        batch
            .entries
            .into_iter()
            .filter(|entry| in_bucket(bucket, entry, now))
            .collect()
    }
}

fn normalized_term(term: Option<&str>) -> Option<String> {
    term.filter(|term| !term.is_empty())
        .map(str::to_lowercase)
}
