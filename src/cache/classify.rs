//! Bucket classification relative to a fixed instant.

use time::OffsetDateTime;

use crate::domain::{entities::NormalizedEntry, types::Bucket};

/// Entries partitioned by bucket. `all` keeps store order; every entry of
/// `all` is in exactly one of the other three.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub all: Vec<NormalizedEntry>,
    pub previous: Vec<NormalizedEntry>,
    pub now: Vec<NormalizedEntry>,
    pub upnext: Vec<NormalizedEntry>,
}

impl Buckets {
    pub fn get(&self, bucket: Bucket) -> &[NormalizedEntry] {
        match bucket {
            Bucket::All => &self.all,
            Bucket::Previous => &self.previous,
            Bucket::Now => &self.now,
            Bucket::UpNext => &self.upnext,
        }
    }
}

/// The single time bucket an entry falls into. `all` is not a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Previous,
    Now,
    UpNext,
}

impl From<Placement> for Bucket {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Previous => Bucket::Previous,
            Placement::Now => Bucket::Now,
            Placement::UpNext => Bucket::UpNext,
        }
    }
}

/// Which of `previous` / `now` / `upnext` an entry belongs to.
///
/// Checked in that order, so a row with `start > stop` still lands in
/// exactly one bucket. `start == stop == now` is `now`.
pub fn placement_of(entry: &NormalizedEntry, now: OffsetDateTime) -> Placement {
    if entry.stop < now {
        Placement::Previous
    } else if entry.start > now {
        Placement::UpNext
    } else {
        Placement::Now
    }
}

pub fn in_bucket(bucket: Bucket, entry: &NormalizedEntry, now: OffsetDateTime) -> bool {
    bucket == Bucket::All || Bucket::from(placement_of(entry, now)) == bucket
}

pub fn classify(
    entries: impl IntoIterator<Item = NormalizedEntry>,
    now: OffsetDateTime,
) -> Buckets {
    let mut buckets = Buckets::default();
    for entry in entries {
        let target = match placement_of(&entry, now) {
            Placement::Previous => &mut buckets.previous,
            Placement::Now => &mut buckets.now,
            Placement::UpNext => &mut buckets.upnext,
        };
        target.push(entry.clone());
        buckets.all.push(entry);
    }
    buckets
}
