#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chunt_schedule::{
    application::{
        admin_auth::AdminAuthenticator,
        repos::{ScheduleStore, StoreError, StoreHealth},
        schedule::ScheduleService,
    },
    cache::{CacheConfig, ManualClock, ScheduleCache},
    domain::entities::ScheduleRecord,
    infra::http::{AdminState, HttpState},
};
use time::{Duration, OffsetDateTime, macros::datetime};

pub const NOW: OffsetDateTime = datetime!(2024-03-10 12:00:00 UTC);
pub const ADMIN_KEY: &str = "test-admin-key";

/// In-memory schedule table.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ScheduleRecord>>,
    modified: Mutex<Option<OffsetDateTime>>,
    down: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<ScheduleRecord>) -> Self {
        let store = Self::default();
        store.replace_rows(rows, NOW - Duration::days(1));
        store
    }

    pub fn replace_rows(&self, rows: Vec<ScheduleRecord>, modified_at: OffsetDateTime) {
        *self.rows.lock().expect("rows") = rows;
        *self.modified.lock().expect("modified") = Some(modified_at);
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<ScheduleRecord>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        Ok(self.rows.lock().expect("rows").clone())
    }

    async fn latest_modification(&self) -> Result<Option<OffsetDateTime>, StoreError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        Ok(*self.modified.lock().expect("modified"))
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        Ok(())
    }
}

pub fn record(id: i64, start: OffsetDateTime, stop: OffsetDateTime, payload: &str) -> ScheduleRecord {
    ScheduleRecord {
        id,
        start: Some(start),
        stop: Some(stop),
        payload: payload.to_string(),
    }
}

/// One finished, one airing and one upcoming programme around [`NOW`].
pub fn three_shows() -> Vec<ScheduleRecord> {
    vec![
        record(
            1,
            NOW - Duration::hours(2),
            NOW - Duration::hours(1),
            r#"{"title": "Morning News", "description": "Headlines and weather"}"#,
        ),
        record(
            2,
            NOW - Duration::minutes(30),
            NOW + Duration::minutes(30),
            r#"{"title": "Jazz Hour", "description": "Late-morning standards"}"#,
        ),
        record(3, NOW + Duration::hours(1), NOW + Duration::hours(2), "not json at all"),
    ]
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub schedule: Arc<ScheduleService>,
}

impl Harness {
    pub fn new(rows: Vec<ScheduleRecord>, config: CacheConfig) -> Self {
        let store = Arc::new(MemoryStore::with_rows(rows));
        let clock = Arc::new(ManualClock::new(NOW));
        let cache = Arc::new(ScheduleCache::new(config, clock.clone()));
        let schedule = Arc::new(ScheduleService::new(cache, store.clone()));
        Self {
            store,
            clock,
            schedule,
        }
    }

    pub fn http_state(&self) -> HttpState {
        HttpState {
            schedule: self.schedule.clone(),
        }
    }

    pub fn admin_state(&self, api_key: Option<&str>) -> AdminState {
        AdminState {
            schedule: self.schedule.clone(),
            auth: Arc::new(AdminAuthenticator::new(api_key)),
            health: self.store.clone(),
        }
    }
}
