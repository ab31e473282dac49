//! Worker pool fed through a bounded queue of candidate pairs.
//!
//! The producer walks every bucket and enqueues `(i, j)` pairs; it blocks
//! whenever the queue is full, which bounds memory even for huge buckets.
//! Workers claim followers through the atomic [`ClaimFlags`], and the
//! matrices are filled from the final claims once the pool has drained.

use crate::core::comparator::{BucketGrouper, ClaimFlags, ComparisonGroups, GroupingStrategyKind};
use crate::core::hasher::HashGroups;
use crate::core::tree::{trees_equal, Tree, TreeId};
use crossbeam_channel::bounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Queue slots per worker
const QUEUE_SLOTS_PER_WORKER: usize = 10;

/// One candidate pair inside a bucket
#[derive(Debug, Clone, Copy)]
struct PairWork {
    /// Bucket position of the earlier tree
    position: usize,
    earlier: TreeId,
    later: TreeId,
}

/// Fixed pool of comparison workers behind a bounded channel
#[derive(Debug, Clone)]
pub struct WorkQueueGrouper {
    workers: usize,
}

impl WorkQueueGrouper {
    /// Create a pool with the given number of workers (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Workers actually started: never more than there are pairs to compare
    fn pool_size(&self, pairs: usize) -> usize {
        let pool = self.workers.min(pairs.max(1));
        if pool < self.workers {
            tracing::warn!(
                requested = self.workers,
                pool,
                pairs,
                "More comparison workers than candidate pairs; clamping"
            );
        }
        pool
    }
}

/// Number of `(i, j)` pairs across every candidate bucket
fn candidate_pairs(hash_groups: &HashGroups) -> usize {
    hash_groups
        .candidates()
        .map(|(_, ids)| ids.len().saturating_mul(ids.len() - 1) / 2)
        .fold(0, usize::saturating_add)
}

impl BucketGrouper for WorkQueueGrouper {
    fn group(&self, hash_groups: &HashGroups, trees: &[Tree]) -> ComparisonGroups {
        let claims = ClaimFlags::new(trees.len());
        let comparisons = AtomicUsize::new(0);
        let pool = self.pool_size(candidate_pairs(hash_groups));
        let capacity = pool.saturating_mul(QUEUE_SLOTS_PER_WORKER);
        let (sender, receiver) = bounded::<PairWork>(capacity);

        tracing::debug!(
            workers = pool,
            capacity,
            "Grouping through bounded work queue"
        );

        thread::scope(|scope| {
            for _ in 0..pool {
                let receiver = receiver.clone();
                let claims = &claims;
                let comparisons = &comparisons;
                scope.spawn(move || {
                    for work in receiver.iter() {
                        if claims.is_claimed(work.earlier) {
                            continue;
                        }
                        if matches!(claims.claimer(work.later), Some(c) if c <= work.position) {
                            continue;
                        }
                        comparisons.fetch_add(1, Ordering::Relaxed);
                        if trees_equal(&trees[work.earlier], &trees[work.later]) {
                            claims.claim(work.later, work.position);
                        }
                    }
                });
            }
            drop(receiver);

            'buckets: for (_, ids) in hash_groups.candidates() {
                for (position, &earlier) in ids.iter().enumerate() {
                    if claims.is_claimed(earlier) {
                        continue;
                    }
                    for &later in &ids[position + 1..] {
                        let work = PairWork {
                            position,
                            earlier,
                            later,
                        };
                        if sender.send(work).is_err() {
                            break 'buckets;
                        }
                    }
                }
            }
            // Workers exit once the queue is closed and drained
            drop(sender);
        });

        ComparisonGroups::from_claims(hash_groups, claims, comparisons.into_inner())
    }

    fn kind(&self) -> GroupingStrategyKind {
        GroupingStrategyKind::WorkQueue
    }
}
