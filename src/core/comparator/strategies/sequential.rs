//! Single-threaded bucket grouping.

use crate::core::comparator::{
    AdjacencyMatrix, BucketGrouper, ClaimFlags, ComparisonGroups, GroupingStrategyKind,
};
use crate::core::hasher::HashGroups;
use crate::core::tree::{trees_equal, Tree};
use std::collections::BTreeMap;

/// Walks every bucket on the calling thread
#[derive(Debug, Clone, Default)]
pub struct SequentialGrouper;

impl SequentialGrouper {
    /// Create a sequential grouper
    pub fn new() -> Self {
        Self
    }
}

impl BucketGrouper for SequentialGrouper {
    fn group(&self, hash_groups: &HashGroups, trees: &[Tree]) -> ComparisonGroups {
        let claims = ClaimFlags::new(trees.len());
        let mut matrices = BTreeMap::new();
        let mut comparisons = 0;

        for (hash, ids) in hash_groups.candidates() {
            let mut matrix = AdjacencyMatrix::new(ids.len());

            for (i, &tree_i) in ids.iter().enumerate() {
                if claims.is_claimed(tree_i) {
                    continue;
                }
                for (j, &tree_j) in ids.iter().enumerate().skip(i + 1) {
                    if claims.is_claimed(tree_j) {
                        continue;
                    }
                    comparisons += 1;
                    if trees_equal(&trees[tree_i], &trees[tree_j]) {
                        claims.claim(tree_j, i);
                        matrix.mark(i, j);
                    }
                }
            }

            matrices.insert(hash, matrix);
        }

        ComparisonGroups::new(matrices, claims, comparisons)
    }

    fn kind(&self) -> GroupingStrategyKind {
        GroupingStrategyKind::Sequential
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::strategies::fixtures::sample;

    #[test]
    fn claims_followers_of_first_match() {
        let (trees, groups) = sample();
        let comparison = SequentialGrouper::new().group(&groups, &trees);

        // bucket 145 holds trees [0, 1, 5], all equal
        let matrix = comparison.matrix(145).unwrap();
        assert!(matrix.is_marked(0, 1));
        assert!(matrix.is_marked(0, 2));
        assert!(!matrix.is_marked(1, 2));
        assert!(comparison.is_follower(1));
        assert!(comparison.is_follower(5));
        assert!(!comparison.is_follower(0));
    }

    #[test]
    fn rejects_hash_collisions() {
        let (trees, groups) = sample();
        let comparison = SequentialGrouper::new().group(&groups, &trees);

        // trees 3 ([0]) and 4 ([500]) share bucket 4 but differ
        let matrix = comparison.matrix(4).unwrap();
        assert_eq!(matrix.marked_count(), 0);
        assert!(!comparison.is_follower(4));
    }

    #[test]
    fn singleton_buckets_get_no_matrix() {
        let (trees, groups) = sample();
        let comparison = SequentialGrouper::new().group(&groups, &trees);

        assert!(comparison.matrix(548).is_none());
        // 145: two comparisons (0-1, 0-5); 1 and 5 then claimed
        // 14, 4, 550: one each
        assert_eq!(comparison.comparisons(), 5);
    }
}
