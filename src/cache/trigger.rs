//! Refresh trigger.
//!
//! Starts cache refreshes outside the request that noticed they were needed:
//! fire-and-forget after a fallback read, once at startup, and on a timer.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::repos::ScheduleStore;

use super::schedule_cache::ScheduleCache;

#[derive(Clone)]
pub struct RefreshTrigger {
    cache: Arc<ScheduleCache>,
    store: Arc<dyn ScheduleStore>,
}

impl RefreshTrigger {
    pub fn new(cache: Arc<ScheduleCache>, store: Arc<dyn ScheduleStore>) -> Self {
        Self { cache, store }
    }

    pub fn cache(&self) -> &Arc<ScheduleCache> {
        &self.cache
    }

    /// Refresh in the background. The caller never waits and never sees the
    /// outcome; failures are logged by the cache itself.
    pub fn spawn_refresh(&self, reason: &'static str) -> JoinHandle<()> {
        let cache = self.cache.clone();
        let store = self.store.clone();
        debug!(reason, "Scheduling background cache refresh");
        tokio::spawn(async move {
            if cache.refresh(store.as_ref()).await.is_err() {
                debug!(reason, "Background cache refresh did not complete");
            }
        })
    }

    /// Build the first snapshot before the listeners accept traffic.
    pub async fn warmup_on_startup(&self) {
        if !self.cache.config().is_enabled() {
            debug!("Cache warmup skipped: cache disabled");
            return;
        }

        match self.cache.refresh(self.store.as_ref()).await {
            Ok(snapshot) => info!(entries = snapshot.len(), "Cache warmed on startup"),
            Err(err) => warn!(
                target = "chunt_schedule::cache::trigger",
                error = %err,
                "Cache warmup failed; requests will fall back to direct reads"
            ),
        }
    }

    /// Refresh every `interval` until the handle is aborted.
    pub fn spawn_auto_refresh(&self, interval: Duration) -> JoinHandle<()> {
        let trigger = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // Skip the first immediate tick
            loop {
                ticker.tick().await;
                let _ = trigger.cache.refresh(trigger.store.as_ref()).await;
            }
        })
    }
}
