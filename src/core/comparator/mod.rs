//! # Comparator Module
//!
//! Stage two of the pipeline: confirms which trees inside a hash bucket are
//! truly equal.
//!
//! ## How It Works
//! 1. Skip buckets holding fewer than two trees
//! 2. Compare each unclaimed position against every later position
//! 3. Claim a later tree as a follower of the earlier one on a match
//! 4. Record the claim in the bucket's triangular adjacency matrix
//!
//! Hash collisions between different trees are expected; the pairwise
//! comparison discards them.
//!
//! ## Strategies
//! | Comp workers | Buffered | Strategy     |
//! |--------------|----------|--------------|
//! | 1            | any      | Sequential   |
//! | > 1          | yes      | WorkQueue    |
//! | > 1          | no       | SpawnPerPair |

mod claims;
mod grouper;
mod matrix;
mod strategies;
mod traits;

pub use claims::{Claim, ClaimFlags};
pub use grouper::EquivalenceGrouper;
pub use matrix::AdjacencyMatrix;
pub use strategies::{SequentialGrouper, SpawnPerPairGrouper, WorkQueueGrouper};
pub use traits::{BucketGrouper, GroupingStrategyKind};

use crate::core::hasher::HashGroups;
use crate::core::tree::{HashKey, TreeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of the grouping stage
#[derive(Debug)]
pub struct ComparisonGroups {
    /// One matrix per bucket that held at least two trees
    matrices: BTreeMap<HashKey, AdjacencyMatrix>,
    /// Follower flags indexed by tree id
    claims: ClaimFlags,
    /// Number of tree comparisons performed
    comparisons: usize,
}

impl ComparisonGroups {
    pub(crate) fn new(
        matrices: BTreeMap<HashKey, AdjacencyMatrix>,
        claims: ClaimFlags,
        comparisons: usize,
    ) -> Self {
        Self {
            matrices,
            claims,
            comparisons,
        }
    }

    /// Fill the matrices from settled claims: each follower marks the cell of its claimer
    pub(crate) fn from_claims(
        hash_groups: &HashGroups,
        claims: ClaimFlags,
        comparisons: usize,
    ) -> Self {
        let matrices = hash_groups
            .candidates()
            .map(|(hash, ids)| {
                let mut matrix = AdjacencyMatrix::new(ids.len());
                for (position, &tree) in ids.iter().enumerate() {
                    if let Some(claimer) = claims.claimer(tree) {
                        matrix.mark(claimer, position);
                    }
                }
                (hash, matrix)
            })
            .collect();

        Self::new(matrices, claims, comparisons)
    }

    /// Matrix of a bucket, if the bucket was compared
    pub fn matrix(&self, hash: HashKey) -> Option<&AdjacencyMatrix> {
        self.matrices.get(&hash)
    }

    /// Compared buckets in key order
    pub fn matrices(&self) -> impl Iterator<Item = (HashKey, &AdjacencyMatrix)> + '_ {
        self.matrices.iter().map(|(&hash, matrix)| (hash, matrix))
    }

    /// Follower flags indexed by tree id
    pub fn claims(&self) -> &ClaimFlags {
        &self.claims
    }

    /// Check if a tree was claimed as a duplicate of an earlier one
    pub fn is_follower(&self, tree: TreeId) -> bool {
        self.claims.is_claimed(tree)
    }

    /// Number of tree comparisons performed
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }
}

/// A set of mutually equal trees sharing one hash bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Hash bucket the trees share
    pub hash: HashKey,
    /// Tree ids in ascending order
    pub trees: Vec<TreeId>,
}

impl DuplicateGroup {
    /// Create a group, sorting the member ids
    pub fn new(hash: HashKey, mut trees: Vec<TreeId>) -> Self {
        trees.sort_unstable();
        Self { hash, trees }
    }

    /// Get the number of duplicates (excluding the first tree)
    pub fn duplicate_count(&self) -> usize {
        self.trees.len().saturating_sub(1)
    }
}

/// Configuration builder for bucket groupers
#[derive(Debug, Clone)]
pub struct GrouperConfig {
    workers: usize,
    buffered: bool,
}

impl GrouperConfig {
    /// Create a configuration for the sequential grouper
    pub fn new() -> Self {
        Self {
            workers: 1,
            buffered: true,
        }
    }

    /// Set the number of comparison workers
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Use the bounded work queue (otherwise spawn one task per pair)
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    /// The strategy this configuration selects
    pub fn kind(&self) -> GroupingStrategyKind {
        match (self.workers, self.buffered) {
            (0 | 1, _) => GroupingStrategyKind::Sequential,
            (_, true) => GroupingStrategyKind::WorkQueue,
            (_, false) => GroupingStrategyKind::SpawnPerPair,
        }
    }

    /// Build the selected grouper
    pub fn build(self) -> Box<dyn BucketGrouper> {
        let kind = self.kind();
        tracing::debug!(strategy = %kind, workers = self.workers, "Selected grouping strategy");

        match kind {
            GroupingStrategyKind::Sequential => Box::new(SequentialGrouper::new()),
            GroupingStrategyKind::WorkQueue => Box::new(WorkQueueGrouper::new(self.workers)),
            GroupingStrategyKind::SpawnPerPair => Box::new(SpawnPerPairGrouper::new()),
        }
    }
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self::new()
    }
}
