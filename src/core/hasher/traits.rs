//! Trait definitions for hash partitioning strategies.

use super::HashGroups;
use crate::core::tree::{HashKey, Tree, TreeId};
use serde::{Deserialize, Serialize};

/// A strategy that buckets trees by their in-order hash
pub trait HashPartitioner: Send + Sync {
    /// Hash every tree and group the ids by bucket
    fn partition(&self, trees: &[Tree]) -> HashGroups;

    /// Get the strategy kind
    fn kind(&self) -> HashStrategyKind;
}

/// Available hash partitioning strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashStrategyKind {
    /// Single thread, deterministic baseline
    Sequential,
    /// Worker threads appending under striped locks
    LockStriped,
    /// Worker threads relaying records to one writer
    ChannelRelay,
    /// Worker threads routing records to several private maps
    ShardedRelay,
}

impl HashStrategyKind {
    /// Get a human-readable description of the strategy
    pub fn description(&self) -> &'static str {
        match self {
            HashStrategyKind::Sequential => "Sequential - hashes and appends in tree order",
            HashStrategyKind::LockStriped => {
                "Lock-striped - batch workers append under hash-striped locks"
            }
            HashStrategyKind::ChannelRelay => {
                "Channel relay - batch workers send records to a single map writer"
            }
            HashStrategyKind::ShardedRelay => {
                "Sharded relay - records routed by hash to private maps merged at the end"
            }
        }
    }
}

impl std::fmt::Display for HashStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashStrategyKind::Sequential => write!(f, "sequential"),
            HashStrategyKind::LockStriped => write!(f, "lock-striped"),
            HashStrategyKind::ChannelRelay => write!(f, "channel-relay"),
            HashStrategyKind::ShardedRelay => write!(f, "sharded-relay"),
        }
    }
}

/// A computed hash travelling from a hash worker to a map writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeHashRecord {
    /// Tree the hash belongs to
    pub tree: TreeId,
    /// Bucket key
    pub hash: HashKey,
}

impl TreeHashRecord {
    /// Hash one tree of the collection
    pub fn compute(trees: &[Tree], tree: TreeId) -> Self {
        Self {
            tree,
            hash: trees[tree].hash(),
        }
    }
}
