//! The cache core: validity, refresh and bucket reads.

use std::{
    str::FromStr,
    sync::Arc,
    time::Instant,
};

use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::application::repos::{ScheduleStore, StoreError};
use crate::domain::{entities::NormalizedEntry, types::Bucket};

use super::classify::classify;
use super::clock::Clock;
use super::config::CacheConfig;
use super::decode::normalize_all;
use super::lock::SnapshotSlot;
use super::metrics::{
    METRIC_CACHE_HIT, METRIC_CACHE_MISS, METRIC_CACHE_REFRESH, METRIC_CACHE_REFRESH_FAILED,
    METRIC_CACHE_REFRESH_MS,
};
use super::snapshot::CacheSnapshot;

/// Holds the current [`CacheSnapshot`] and decides when it must be rebuilt.
///
/// The lock guards only the snapshot pointer. Store reads, decoding and
/// classification happen outside it, so a slow refresh never blocks readers
/// of the previous snapshot.
pub struct ScheduleCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    current: SnapshotSlot,
}

impl ScheduleCache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            current: SnapshotSlot::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        self.current.load()
    }

    /// Whether the held snapshot may be served.
    ///
    /// The store staleness check is skipped when the store cannot report a
    /// modification time; validity then rests on the TTL alone.
    pub async fn is_valid(&self, store: &dyn ScheduleStore) -> bool {
        if !self.config.is_enabled() {
            return false;
        }

        let Some(snapshot) = self.snapshot() else {
            return false;
        };
        let computed_at = snapshot.computed_at();

        if let Some(ttl) = self.config.ttl()
            && self.clock.now() - computed_at > ttl
        {
            debug!(computed_at = %computed_at, "Schedule snapshot expired");
            return false;
        }

        match store.latest_modification().await {
            Ok(Some(modified_at)) if modified_at > computed_at => {
                debug!(
                    computed_at = %computed_at,
                    modified_at = %modified_at,
                    "Schedule snapshot is older than store contents"
                );
                false
            }
            Ok(_) => true,
            Err(StoreError::Unsupported(reason)) => {
                debug!(reason = %reason, "Store staleness check unavailable; relying on TTL");
                true
            }
            Err(err) => {
                warn!(
                    target = "chunt_schedule::cache",
                    error = %err,
                    "Store staleness check failed; relying on TTL"
                );
                true
            }
        }
    }

    /// Rebuild the snapshot from the store and install it.
    ///
    /// Concurrent refreshes are not deduplicated. Of two racing refreshes the
    /// one with the later `computed_at` stays installed.
    pub async fn refresh(&self, store: &dyn ScheduleStore) -> Result<Arc<CacheSnapshot>, StoreError> {
        let started_at = Instant::now();
        counter!(METRIC_CACHE_REFRESH).increment(1);

        let records = store.fetch_all().await.inspect_err(|err| {
            counter!(METRIC_CACHE_REFRESH_FAILED).increment(1);
            warn!(
                target = "chunt_schedule::cache",
                error = %err,
                "Schedule cache refresh failed"
            );
        })?;

        let batch = normalize_all(records);
        let classified_at = self.clock.now();
        let buckets = classify(batch.entries, classified_at);
        let computed_at = self.clock.now();
        let snapshot = Arc::new(CacheSnapshot::new(
            buckets,
            classified_at,
            computed_at,
            batch.skipped,
        ));

        self.install(snapshot.clone());

        histogram!(METRIC_CACHE_REFRESH_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);
        info!(
            entries = snapshot.len(),
            previous = snapshot.buckets().previous.len(),
            now = snapshot.buckets().now.len(),
            upnext = snapshot.buckets().upnext.len(),
            skipped = snapshot.skipped(),
            computed_at = %computed_at,
            "Schedule cache refreshed"
        );

        Ok(snapshot)
    }

    /// Read a bucket, refreshing first when the snapshot is not valid.
    pub async fn get(
        &self,
        bucket: Bucket,
        store: &dyn ScheduleStore,
    ) -> Result<Vec<NormalizedEntry>, StoreError> {
        let cached = if self.is_valid(store).await {
            self.snapshot()
        } else {
            None
        };

        let snapshot = match cached {
            Some(snapshot) => {
                counter!(METRIC_CACHE_HIT).increment(1);
                snapshot
            }
            None => {
                counter!(METRIC_CACHE_MISS).increment(1);
                self.refresh(store).await?
            }
        };

        Ok(snapshot.bucket(bucket).to_vec())
    }

    /// As [`get`](Self::get), but by name; unknown names yield nothing.
    pub async fn get_named(
        &self,
        name: &str,
        store: &dyn ScheduleStore,
    ) -> Result<Vec<NormalizedEntry>, StoreError> {
        match Bucket::from_str(name) {
            Ok(bucket) => self.get(bucket, store).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    fn install(&self, snapshot: Arc<CacheSnapshot>) {
        let computed_at = snapshot.computed_at();
        if !self.current.replace_if_newer(snapshot) {
            debug!(
                discarded = %computed_at,
                "Newer schedule snapshot already installed"
            );
        }
    }
}
