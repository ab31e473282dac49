//! # Hasher Module
//!
//! Stage one of the pipeline: assigns every tree to the bucket named by its
//! in-order hash.
//!
//! ## Strategies
//! - **Sequential** - one thread, appends in tree-id order
//! - **Lock-striped** - batch-per-worker threads appending under 128 striped locks
//! - **Channel relay** - workers send `(tree, hash)` records to a single writer
//! - **Sharded relay** - records routed by `hash mod K` to K private maps, merged at the end
//!
//! All strategies place the same set of tree ids in each bucket. Only the
//! order inside a bucket may differ, because concurrent appends interleave.
//!
//! ## Example
//! ```rust,ignore
//! use bst_dedup::core::hasher::PartitionerConfig;
//!
//! let partitioner = PartitionerConfig::new()
//!     .hash_workers(8)
//!     .data_workers(2)
//!     .build();
//!
//! let groups = partitioner.partition(&trees);
//! ```

mod strategies;
mod traits;

pub use strategies::{ChannelRelayHasher, LockStripedHasher, SequentialHasher, ShardedRelayHasher};
pub use traits::{HashPartitioner, HashStrategyKind, TreeHashRecord};

use crate::core::tree::{HashKey, TreeId, HASH_BUCKETS};
use serde::Serialize;
use std::ops::Range;

/// Number of locks guarding the shared bucket map in the lock-striped strategy
pub const LOCK_STRIPES: usize = 128;

/// Tree ids grouped by hash bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashGroups {
    buckets: Vec<Vec<TreeId>>,
}

impl HashGroups {
    /// Create a map with every bucket empty
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); HASH_BUCKETS],
        }
    }

    /// Append a tree id to a bucket
    pub fn push(&mut self, hash: HashKey, tree: TreeId) {
        self.buckets[hash].push(tree);
    }

    /// Tree ids in a bucket, in insertion order
    pub fn bucket(&self, hash: HashKey) -> &[TreeId] {
        self.buckets.get(hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Concatenate every bucket of `other` onto the matching bucket here
    pub fn merge(&mut self, other: HashGroups) {
        for (bucket, ids) in self.buckets.iter_mut().zip(other.buckets) {
            bucket.extend(ids);
        }
    }

    /// Non-empty buckets in key order
    pub fn iter(&self) -> impl Iterator<Item = (HashKey, &[TreeId])> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(hash, ids)| (hash, ids.as_slice()))
    }

    /// Buckets holding at least two trees, the only ones worth comparing
    pub fn candidates(&self) -> impl Iterator<Item = (HashKey, &[TreeId])> + '_ {
        self.iter().filter(|(_, ids)| ids.len() > 1)
    }

    /// Total number of tree ids across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Check if no tree has been recorded
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Copy with every bucket sorted by tree id
    ///
    /// Two results are strategy-equivalent iff their normalized forms are equal.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        for bucket in &mut normalized.buckets {
            bucket.sort_unstable();
        }
        normalized
    }
}

impl Default for HashGroups {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `0..len` into contiguous batches, one per worker
///
/// The worker count is clamped to `1..=len` and the batch size rounds up, so
/// the last batch absorbs the remainder and no batch is empty.
pub fn batch_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, len);
    let batch_size = len.div_ceil(workers);

    (0..workers)
        .map(|worker| {
            let start = (worker * batch_size).min(len);
            let end = (start + batch_size).min(len);
            start..end
        })
        .filter(|range| !range.is_empty())
        .collect()
}

/// Configuration builder for hash partitioners
///
/// The strategy is a pure function of the worker counts:
///
/// | hash workers | data workers        | strategy      |
/// |--------------|---------------------|---------------|
/// | 0 or 1       | any                 | Sequential    |
/// | > 1          | 0, or equal to hash | LockStriped   |
/// | > 1          | 1                   | ChannelRelay  |
/// | > 1          | > 1, not hash       | ShardedRelay  |
#[derive(Debug, Clone)]
pub struct PartitionerConfig {
    hash_workers: usize,
    data_workers: usize,
    buffered: bool,
    record: bool,
}

impl PartitionerConfig {
    /// Create a configuration for the sequential baseline
    pub fn new() -> Self {
        Self {
            hash_workers: 1,
            data_workers: 0,
            buffered: true,
            record: true,
        }
    }

    /// Set the number of threads computing hashes
    pub fn hash_workers(mut self, workers: usize) -> Self {
        self.hash_workers = workers;
        self
    }

    /// Set the number of threads writing into the bucket map
    pub fn data_workers(mut self, workers: usize) -> Self {
        self.data_workers = workers;
        self
    }

    /// Use buffered channels for the relay strategies
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    /// Record bucket membership (disable to time hashing alone)
    pub fn record(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    /// The strategy these worker counts select
    ///
    /// Without recording there is no map to relay into, so parallel hashing
    /// always runs lock-striped.
    pub fn kind(&self) -> HashStrategyKind {
        match (self.hash_workers, self.data_workers) {
            (0 | 1, _) => HashStrategyKind::Sequential,
            _ if !self.record => HashStrategyKind::LockStriped,
            (_, 0) => HashStrategyKind::LockStriped,
            (hash, data) if hash == data => HashStrategyKind::LockStriped,
            (_, 1) => HashStrategyKind::ChannelRelay,
            _ => HashStrategyKind::ShardedRelay,
        }
    }

    /// Build the selected partitioner
    pub fn build(self) -> Box<dyn HashPartitioner> {
        let kind = self.kind();
        tracing::debug!(
            strategy = %kind,
            hash_workers = self.hash_workers,
            data_workers = self.data_workers,
            buffered = self.buffered,
            record = self.record,
            "Selected hash strategy"
        );

        match kind {
            HashStrategyKind::Sequential => Box::new(SequentialHasher::new(self.record)),
            HashStrategyKind::LockStriped => {
                Box::new(LockStripedHasher::new(self.hash_workers, self.record))
            }
            HashStrategyKind::ChannelRelay => {
                Box::new(ChannelRelayHasher::new(self.hash_workers, self.buffered))
            }
            HashStrategyKind::ShardedRelay => Box::new(ShardedRelayHasher::new(
                self.hash_workers,
                self.data_workers,
                self.buffered,
            )),
        }
    }
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self::new()
    }
}
