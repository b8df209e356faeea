//! Cache configuration.

use std::time::Duration as StdDuration;

use time::Duration;

const DEFAULT_TTL_SECONDS: i64 = 300;

/// Cache configuration from the `[cache]` section.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Serve reads from the snapshot. When off, every read is a direct scan.
    pub enabled: bool,
    /// Maximum snapshot age in seconds; `<= 0` disables TTL expiry.
    pub ttl_seconds: i64,
    /// Background refresh period in seconds; `0` disables the timer.
    pub auto_refresh_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            auto_refresh_interval_seconds: 0,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ttl_seconds: settings.ttl_seconds,
            auto_refresh_interval_seconds: settings.auto_refresh_interval_seconds,
        }
    }
}

impl CacheConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// TTL as a duration, `None` when expiry is disabled.
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_seconds > 0).then(|| Duration::seconds(self.ttl_seconds))
    }

    pub fn auto_refresh_interval(&self) -> Option<StdDuration> {
        (self.enabled && self.auto_refresh_interval_seconds > 0)
            .then(|| StdDuration::from_secs(self.auto_refresh_interval_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.ttl(), Some(Duration::seconds(300)));
        assert_eq!(config.auto_refresh_interval(), None);
    }

    #[test]
    fn non_positive_ttl_disables_expiry() {
        for ttl_seconds in [0, -1] {
            let config = CacheConfig {
                ttl_seconds,
                ..Default::default()
            };
            assert_eq!(config.ttl(), None);
        }
    }

    #[test]
    fn auto_refresh_requires_enabled_cache() {
        let config = CacheConfig {
            enabled: false,
            auto_refresh_interval_seconds: 60,
            ..Default::default()
        };
        assert_eq!(config.auto_refresh_interval(), None);

        let config = CacheConfig {
            auto_refresh_interval_seconds: 60,
            ..Default::default()
        };
        assert_eq!(config.auto_refresh_interval(), Some(StdDuration::from_secs(60)));
    }
}
