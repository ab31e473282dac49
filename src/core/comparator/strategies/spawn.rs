//! One task per candidate pair, claims serialized by a global mutex.
//!
//! Comparisons run unsynchronized on the rayon pool. Every claim and matrix
//! update for every bucket goes through one mutex, so fan-out is unbounded
//! but writes never scale past that lock.

use crate::core::comparator::{
    AdjacencyMatrix, BucketGrouper, Claim, ClaimFlags, ComparisonGroups, GroupingStrategyKind,
};
use crate::core::hasher::HashGroups;
use crate::core::tree::{trees_equal, HashKey, Tree};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Spawns a scoped task for every pair of trees sharing a bucket
#[derive(Debug, Clone, Default)]
pub struct SpawnPerPairGrouper;

impl SpawnPerPairGrouper {
    /// Create a spawn-per-pair grouper
    pub fn new() -> Self {
        Self
    }
}

impl BucketGrouper for SpawnPerPairGrouper {
    fn group(&self, hash_groups: &HashGroups, trees: &[Tree]) -> ComparisonGroups {
        let claims = ClaimFlags::new(trees.len());
        let comparisons = AtomicUsize::new(0);
        let matrices: Mutex<BTreeMap<HashKey, AdjacencyMatrix>> = Mutex::new(BTreeMap::new());

        rayon::scope(|scope| {
            for (hash, ids) in hash_groups.candidates() {
                matrices
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(hash, AdjacencyMatrix::new(ids.len()));

                for (i, &tree_i) in ids.iter().enumerate() {
                    if claims.is_claimed(tree_i) {
                        continue;
                    }
                    for (j, &tree_j) in ids.iter().enumerate().skip(i + 1) {
                        let claims = &claims;
                        let comparisons = &comparisons;
                        let matrices = &matrices;
                        scope.spawn(move |_| {
                            comparisons.fetch_add(1, Ordering::Relaxed);
                            if !trees_equal(&trees[tree_i], &trees[tree_j]) {
                                return;
                            }

                            let mut matrices =
                                matrices.lock().unwrap_or_else(PoisonError::into_inner);
                            if claims.is_claimed(tree_i) {
                                return;
                            }
                            let Some(matrix) = matrices.get_mut(&hash) else {
                                return;
                            };
                            match claims.claim(tree_j, i) {
                                Claim::First => matrix.mark(i, j),
                                Claim::Lowered { previous } => {
                                    matrix.clear(previous, j);
                                    matrix.mark(i, j);
                                }
                                Claim::Kept => {}
                            }
                        });
                    }
                }
            }
        });

        let matrices = matrices.into_inner().unwrap_or_else(PoisonError::into_inner);
        ComparisonGroups::new(matrices, claims, comparisons.into_inner())
    }

    fn kind(&self) -> GroupingStrategyKind {
        GroupingStrategyKind::SpawnPerPair
    }
}
