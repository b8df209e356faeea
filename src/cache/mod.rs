//! Schedule snapshot cache.
//!
//! Keeps one immutable [`CacheSnapshot`] of the whole schedule, classified
//! into `previous` / `now` / `upnext` at the moment it was computed. The
//! snapshot is replaced wholesale on refresh; readers hold an `Arc` to
//! whichever snapshot was current when they looked.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 300                  # <= 0 disables TTL expiry
//! auto_refresh_interval_seconds = 0  # 0 disables the refresh timer
//! ```

mod classify;
mod clock;
mod config;
mod decode;
mod lock;
pub mod metrics;
mod schedule_cache;
mod snapshot;
mod trigger;

pub use classify::{Buckets, Placement, classify, in_bucket, placement_of};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use decode::{DecodeError, MalformedRow, NormalizedBatch, decode_payload, normalize, normalize_all};
pub use schedule_cache::ScheduleCache;
pub use snapshot::CacheSnapshot;
pub use trigger::RefreshTrigger;
