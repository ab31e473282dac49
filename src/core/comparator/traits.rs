//! Trait definitions for bucket grouping strategies.

use super::ComparisonGroups;
use crate::core::hasher::HashGroups;
use crate::core::tree::Tree;
use serde::{Deserialize, Serialize};

/// Strategy that confirms equality inside hash buckets
pub trait BucketGrouper: Send + Sync {
    /// Compare the trees of every bucket holding two or more ids
    fn group(&self, hash_groups: &HashGroups, trees: &[Tree]) -> ComparisonGroups;

    /// Get the strategy kind
    fn kind(&self) -> GroupingStrategyKind;
}

/// Available bucket grouping strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupingStrategyKind {
    /// Single thread walking each bucket in order
    Sequential,
    /// Fixed worker pool draining a bounded queue of pairs
    WorkQueue,
    /// One task per pair, writes serialized by a global mutex
    SpawnPerPair,
}

impl GroupingStrategyKind {
    /// Get a human-readable description of the strategy
    pub fn description(&self) -> &'static str {
        match self {
            GroupingStrategyKind::Sequential => {
                "Sequential - compares each unclaimed position against later ones"
            }
            GroupingStrategyKind::WorkQueue => {
                "Work queue - worker pool fed through a bounded pair queue"
            }
            GroupingStrategyKind::SpawnPerPair => {
                "Spawn per pair - one task per pair, claims under a global mutex"
            }
        }
    }
}

impl std::fmt::Display for GroupingStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingStrategyKind::Sequential => write!(f, "sequential"),
            GroupingStrategyKind::WorkQueue => write!(f, "work-queue"),
            GroupingStrategyKind::SpawnPerPair => write!(f, "spawn-per-pair"),
        }
    }
}
