//! Hash workers routing records to several consumers with private maps.
//!
//! A record goes to consumer `hash mod K`, so every bucket is written by
//! exactly one consumer and the hot path takes no locks. Once the producers
//! finish and the channels close, the private maps are concatenated into
//! the global one bucket by bucket.

use crate::core::hasher::{
    batch_ranges, HashGroups, HashPartitioner, HashStrategyKind, TreeHashRecord,
};
use crate::core::tree::{Tree, HASH_BUCKETS};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread;

/// Records buffered per hash worker on each consumer channel
const BUFFER_PER_WORKER: usize = 10;

/// Batch hash workers fanning out to hash-sharded consumers
#[derive(Debug, Clone)]
pub struct ShardedRelayHasher {
    hash_workers: usize,
    data_workers: usize,
    buffered: bool,
}

impl ShardedRelayHasher {
    /// Create a sharded relay with `hash_workers` producers and `data_workers` consumers
    pub fn new(hash_workers: usize, data_workers: usize, buffered: bool) -> Self {
        Self {
            hash_workers,
            data_workers,
            buffered,
        }
    }

    /// Consumers actually started for `trees` trees
    ///
    /// Records route by `hash % K`, so consumers past the bucket count or the
    /// tree count would never receive anything.
    fn consumer_count(&self, trees: usize) -> usize {
        let limit = HASH_BUCKETS.min(trees.max(1));
        let consumers = self.data_workers.clamp(1, limit);
        if consumers < self.data_workers {
            tracing::warn!(
                requested = self.data_workers,
                consumers,
                trees,
                "More data workers than can receive records; clamping"
            );
        }
        consumers
    }
}

impl HashPartitioner for ShardedRelayHasher {
    fn partition(&self, trees: &[Tree]) -> HashGroups {
        let ranges = batch_ranges(trees.len(), self.hash_workers);
        let consumers = self.consumer_count(trees.len());
        let capacity = if self.buffered {
            ranges.len().max(1).saturating_mul(BUFFER_PER_WORKER)
        } else {
            0
        };
        tracing::debug!(
            hash_workers = ranges.len(),
            consumers,
            capacity,
            "Hashing through sharded relay"
        );

        let (senders, receivers): (Vec<Sender<TreeHashRecord>>, Vec<Receiver<TreeHashRecord>>) =
            (0..consumers).map(|_| bounded(capacity)).unzip();

        thread::scope(|scope| {
            let locals: Vec<_> = receivers
                .into_iter()
                .map(|receiver| {
                    scope.spawn(move || {
                        let mut local = HashGroups::new();
                        for record in receiver.iter() {
                            local.push(record.hash, record.tree);
                        }
                        local
                    })
                })
                .collect();

            for range in ranges {
                let senders = senders.clone();
                scope.spawn(move || {
                    for tree_id in range {
                        let record = TreeHashRecord::compute(trees, tree_id);
                        if senders[record.hash % senders.len()].send(record).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(senders);

            let mut groups = HashGroups::new();
            for handle in locals {
                let local = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                groups.merge(local);
            }
            groups
        })
    }

    fn kind(&self) -> HashStrategyKind {
        HashStrategyKind::ShardedRelay
    }
}
