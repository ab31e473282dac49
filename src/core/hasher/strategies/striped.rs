//! Batch-per-worker hashing into a map guarded by striped locks.
//!
//! Stripe `s` owns every bucket whose key is congruent to `s` modulo the
//! stripe count, so workers appending to disjoint stripes never contend
//! while the lock count stays well below one lock per bucket.

use crate::core::hasher::{
    batch_ranges, HashGroups, HashPartitioner, HashStrategyKind, LOCK_STRIPES,
};
use crate::core::tree::{HashKey, Tree, TreeId, HASH_BUCKETS};
use std::sync::{Mutex, PoisonError};
use std::thread;

/// Hashes contiguous batches on worker threads, appending under striped locks
#[derive(Debug, Clone)]
pub struct LockStripedHasher {
    workers: usize,
    record: bool,
}

impl LockStripedHasher {
    /// Create a lock-striped hasher with the given worker count
    pub fn new(workers: usize, record: bool) -> Self {
        Self { workers, record }
    }
}

impl HashPartitioner for LockStripedHasher {
    fn partition(&self, trees: &[Tree]) -> HashGroups {
        let ranges = batch_ranges(trees.len(), self.workers);
        tracing::debug!(
            workers = ranges.len(),
            stripes = LOCK_STRIPES,
            "Hashing with striped locks"
        );

        let buckets = StripedBuckets::new(LOCK_STRIPES);
        let record = self.record;

        thread::scope(|scope| {
            for range in ranges {
                let buckets = &buckets;
                scope.spawn(move || {
                    for tree_id in range {
                        let hash = trees[tree_id].hash();
                        if record {
                            buckets.push(hash, tree_id);
                        }
                    }
                });
            }
        });

        buckets.into_groups()
    }

    fn kind(&self) -> HashStrategyKind {
        HashStrategyKind::LockStriped
    }
}

/// Bucket map split across a fixed number of locks
struct StripedBuckets {
    stripes: Vec<Mutex<Vec<Vec<TreeId>>>>,
}

impl StripedBuckets {
    fn new(stripe_count: usize) -> Self {
        let slots = HASH_BUCKETS.div_ceil(stripe_count);
        Self {
            stripes: (0..stripe_count)
                .map(|_| Mutex::new(vec![Vec::new(); slots]))
                .collect(),
        }
    }

    fn push(&self, hash: HashKey, tree: TreeId) {
        let count = self.stripes.len();
        let mut stripe = self.stripes[hash % count]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        stripe[hash / count].push(tree);
    }

    fn into_groups(self) -> HashGroups {
        let count = self.stripes.len();
        let mut groups = HashGroups::new();

        for (stripe_index, stripe) in self.stripes.into_iter().enumerate() {
            let slots = stripe.into_inner().unwrap_or_else(PoisonError::into_inner);
            for (slot, ids) in slots.into_iter().enumerate() {
                let hash = slot * count + stripe_index;
                for tree in ids {
                    groups.push(hash, tree);
                }
            }
        }

        groups
    }
}
