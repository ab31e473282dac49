//! Single-threaded baseline.

use crate::core::hasher::{HashGroups, HashPartitioner, HashStrategyKind};
use crate::core::tree::Tree;

/// Hashes trees one after another on the calling thread
#[derive(Debug, Clone)]
pub struct SequentialHasher {
    record: bool,
}

impl SequentialHasher {
    /// Create a sequential hasher; with `record` off the map stays empty
    pub fn new(record: bool) -> Self {
        Self { record }
    }
}

impl Default for SequentialHasher {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HashPartitioner for SequentialHasher {
    fn partition(&self, trees: &[Tree]) -> HashGroups {
        let mut groups = HashGroups::new();

        for (tree_id, tree) in trees.iter().enumerate() {
            let hash = tree.hash();
            if self.record {
                groups.push(hash, tree_id);
            }
        }

        groups
    }

    fn kind(&self) -> HashStrategyKind {
        HashStrategyKind::Sequential
    }
}
