//! Reads equivalence groups out of the comparison matrices.
//!
//! Every unclaimed position that has at least one marked follower leads a
//! group made of itself plus those followers. Groups come back ordered by
//! hash, then by smallest member, so the listing is identical whichever
//! strategy produced the matrices.

use super::{ComparisonGroups, DuplicateGroup};
use crate::core::hasher::HashGroups;

/// Collects duplicate groups from comparison results
pub struct EquivalenceGrouper;

impl EquivalenceGrouper {
    /// Create a new equivalence grouper
    pub fn new() -> Self {
        Self
    }

    /// Collect every group of two or more equal trees
    pub fn group(
        &self,
        comparison: &ComparisonGroups,
        hash_groups: &HashGroups,
    ) -> Vec<DuplicateGroup> {
        let mut groups = Vec::new();

        for (hash, matrix) in comparison.matrices() {
            let ids = hash_groups.bucket(hash);

            for (leader_position, &leader) in ids.iter().enumerate().take(matrix.size()) {
                if comparison.is_follower(leader) {
                    continue;
                }

                let mut members: Vec<_> = matrix
                    .followers(leader_position)
                    .filter_map(|position| ids.get(position).copied())
                    .collect();
                if members.is_empty() {
                    continue;
                }

                members.push(leader);
                groups.push(DuplicateGroup::new(hash, members));
            }
        }

        groups.sort_by_key(|group| (group.hash, group.trees.first().copied()));
        groups
    }
}

impl Default for EquivalenceGrouper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::strategies::fixtures::sample;
    use crate::core::comparator::{BucketGrouper, SequentialGrouper};
    use crate::core::hasher::{HashPartitioner, SequentialHasher};
    use crate::core::tree::Tree;

    #[test]
    fn collects_groups_in_hash_order() {
        let (trees, hash_groups) = sample();
        let comparison = SequentialGrouper::new().group(&hash_groups, &trees);

        let groups = EquivalenceGrouper::new().group(&comparison, &hash_groups);

        assert_eq!(
            groups,
            vec![
                DuplicateGroup::new(14, vec![2, 9]),
                DuplicateGroup::new(145, vec![0, 1, 5]),
                DuplicateGroup::new(550, vec![6, 7]),
            ]
        );
    }

    #[test]
    fn no_comparisons_means_no_groups() {
        let trees = vec![Tree::from_values([1]), Tree::from_values([2])];
        let hash_groups = SequentialHasher::default().partition(&trees);
        let comparison = SequentialGrouper::new().group(&hash_groups, &trees);

        assert_eq!(comparison.comparisons(), 0);
        assert!(EquivalenceGrouper::new()
            .group(&comparison, &hash_groups)
            .is_empty());
    }

    #[test]
    fn collision_only_bucket_yields_nothing() {
        let trees = vec![Tree::from_values([0]), Tree::from_values([500])];
        let hash_groups = SequentialHasher::default().partition(&trees);
        let comparison = SequentialGrouper::new().group(&hash_groups, &trees);

        assert_eq!(comparison.comparisons(), 1);
        assert!(EquivalenceGrouper::new()
            .group(&comparison, &hash_groups)
            .is_empty());
    }
}
