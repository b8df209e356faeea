use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

use super::snapshot::CacheSnapshot;

/// Slot holding the current snapshot pointer.
///
/// A panic while the lock was held leaves at worst an older pointer behind,
/// so poisoning is logged and ignored.
#[derive(Debug, Default)]
pub(crate) struct SnapshotSlot {
    inner: RwLock<Option<Arc<CacheSnapshot>>>,
}

impl SnapshotSlot {
    pub(crate) fn load(&self) -> Option<Arc<CacheSnapshot>> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| {
                log_poisoned("read");
                PoisonError::into_inner(poisoned)
            })
            .clone()
    }

    /// Install `snapshot` unless the slot already holds one computed later.
    /// Returns whether the slot changed.
    pub(crate) fn replace_if_newer(&self, snapshot: Arc<CacheSnapshot>) -> bool {
        let mut current = self.inner.write().unwrap_or_else(|poisoned| {
            log_poisoned("write");
            PoisonError::into_inner(poisoned)
        });
        if let Some(existing) = current.as_ref()
            && existing.computed_at() > snapshot.computed_at()
        {
            return false;
        }
        *current = Some(snapshot);
        true
    }
}

fn log_poisoned(op: &'static str) {
    warn!(
        target = "chunt_schedule::cache::lock",
        op,
        result = "poisoned_recovered",
        "Recovered from poisoned snapshot lock"
    );
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use time::macros::datetime;

    use super::*;

    fn snapshot_at(at: time::OffsetDateTime) -> Arc<CacheSnapshot> {
        Arc::new(CacheSnapshot::new(Default::default(), at, at, 0))
    }

    #[test]
    fn later_snapshot_wins() {
        let slot = SnapshotSlot::default();
        let early = snapshot_at(datetime!(2024-03-10 12:00:00 UTC));
        let late = snapshot_at(datetime!(2024-03-10 12:05:00 UTC));

        assert!(slot.replace_if_newer(late.clone()));
        assert!(!slot.replace_if_newer(early));
        assert!(Arc::ptr_eq(&slot.load().expect("installed"), &late));
    }

    #[test]
    fn survives_a_poisoned_lock() {
        let slot = SnapshotSlot::default();
        let first = snapshot_at(datetime!(2024-03-10 12:00:00 UTC));
        slot.replace_if_newer(first.clone());

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = slot.inner.write().expect("fresh lock");
            panic!("poison the slot");
        }));
        assert!(slot.inner.is_poisoned());

        assert!(Arc::ptr_eq(&slot.load().expect("still readable"), &first));
        let second = snapshot_at(datetime!(2024-03-10 12:01:00 UTC));
        assert!(slot.replace_if_newer(second.clone()));
        assert!(Arc::ptr_eq(&slot.load().expect("replaced"), &second));
    }
}
