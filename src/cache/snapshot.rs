use time::OffsetDateTime;

use crate::domain::{entities::NormalizedEntry, types::Bucket};

use super::classify::Buckets;

/// Immutable, fully classified view of the schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    buckets: Buckets,
    classified_at: OffsetDateTime,
    computed_at: OffsetDateTime,
    skipped: usize,
}

impl CacheSnapshot {
    pub fn new(
        buckets: Buckets,
        classified_at: OffsetDateTime,
        computed_at: OffsetDateTime,
        skipped: usize,
    ) -> Self {
        Self {
            buckets,
            classified_at,
            computed_at,
            skipped,
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> &[NormalizedEntry] {
        self.buckets.get(bucket)
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// Instant the buckets were decided against.
    pub fn classified_at(&self) -> OffsetDateTime {
        self.classified_at
    }

    /// Freshness timestamp, taken after classification.
    pub fn computed_at(&self) -> OffsetDateTime {
        self.computed_at
    }

    /// Rows dropped as malformed while building this snapshot.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.buckets.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.all.is_empty()
    }
}
