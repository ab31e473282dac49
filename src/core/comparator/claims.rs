//! Per-tree follower flags shared by every grouping worker.
//!
//! Each slot holds the bucket position of the tree that claimed it, or
//! nothing. A claim is an atomic fetch-min, so:
//! - the first claim is the one and only `Unclaimed -> Claimed` transition
//! - later claims can only lower the recorded claimer
//! - a claimed tree never becomes unclaimed again
//!
//! Equality of in-order sequences is an equivalence relation, so the final
//! claimer of every follower is the smallest equal position in its bucket no
//! matter how the workers interleave.

use crate::core::tree::TreeId;
use std::sync::atomic::{AtomicUsize, Ordering};

const UNCLAIMED: usize = usize::MAX;

/// Outcome of a claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The tree was unclaimed and is now claimed
    First,
    /// The tree was already claimed by a later position and moved to this one
    Lowered { previous: usize },
    /// The tree was already claimed by this or an earlier position
    Kept,
}

/// Follower flags indexed by tree id
#[derive(Debug)]
pub struct ClaimFlags {
    claimers: Vec<AtomicUsize>,
}

impl ClaimFlags {
    /// Create flags for `len` trees, all unclaimed
    pub fn new(len: usize) -> Self {
        Self {
            claimers: (0..len).map(|_| AtomicUsize::new(UNCLAIMED)).collect(),
        }
    }

    /// Number of trees tracked
    pub fn len(&self) -> usize {
        self.claimers.len()
    }

    /// Check if no trees are tracked
    pub fn is_empty(&self) -> bool {
        self.claimers.is_empty()
    }

    /// Claim `tree` for the bucket position `position`
    pub fn claim(&self, tree: TreeId, position: usize) -> Claim {
        let previous = self.claimers[tree].fetch_min(position, Ordering::AcqRel);
        if previous == UNCLAIMED {
            Claim::First
        } else if position < previous {
            Claim::Lowered { previous }
        } else {
            Claim::Kept
        }
    }

    /// Check if `tree` has been claimed as a follower
    pub fn is_claimed(&self, tree: TreeId) -> bool {
        self.claimer(tree).is_some()
    }

    /// Bucket position of the tree that claimed `tree`
    pub fn claimer(&self, tree: TreeId) -> Option<usize> {
        match self.claimers[tree].load(Ordering::Acquire) {
            UNCLAIMED => None,
            position => Some(position),
        }
    }

    /// Number of claimed trees
    pub fn claimed_count(&self) -> usize {
        (0..self.len()).filter(|&tree| self.is_claimed(tree)).count()
    }

    /// Plain boolean view, one flag per tree id
    pub fn to_flags(&self) -> Vec<bool> {
        (0..self.len()).map(|tree| self.is_claimed(tree)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_unclaimed() {
        let flags = ClaimFlags::new(3);
        assert_eq!(flags.to_flags(), vec![false, false, false]);
        assert_eq!(flags.claimer(1), None);
    }

    #[test]
    fn first_claim_transitions() {
        let flags = ClaimFlags::new(2);
        assert_eq!(flags.claim(1, 4), Claim::First);
        assert!(flags.is_claimed(1));
        assert_eq!(flags.claimer(1), Some(4));
    }

    #[test]
    fn later_claims_only_lower() {
        let flags = ClaimFlags::new(1);
        flags.claim(0, 4);
        assert_eq!(flags.claim(0, 6), Claim::Kept);
        assert_eq!(flags.claim(0, 4), Claim::Kept);
        assert_eq!(flags.claim(0, 1), Claim::Lowered { previous: 4 });
        assert_eq!(flags.claimer(0), Some(1));
    }

    #[test]
    fn concurrent_claims_transition_once() {
        let flags = ClaimFlags::new(1);
        let firsts: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|position| {
                    let flags = &flags;
                    scope.spawn(move || flags.claim(0, position) == Claim::First)
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| usize::from(handle.join().unwrap()))
                .sum()
        });

        assert_eq!(firsts, 1);
        assert_eq!(flags.claimer(0), Some(0));
    }
}
