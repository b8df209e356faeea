//! Metric names emitted by the cache and the read path.

pub const METRIC_CACHE_HIT: &str = "chunt_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "chunt_cache_miss_total";
pub const METRIC_CACHE_REFRESH: &str = "chunt_cache_refresh_total";
pub const METRIC_CACHE_REFRESH_FAILED: &str = "chunt_cache_refresh_failed_total";
pub const METRIC_CACHE_REFRESH_MS: &str = "chunt_cache_refresh_ms";
pub const METRIC_ROWS_SKIPPED: &str = "chunt_cache_rows_skipped_total";
pub const METRIC_DIRECT_SCAN: &str = "chunt_direct_scan_total";
