//! Hash workers relaying records to a single map writer.
//!
//! Only the consumer touches the map, so appends need no lock. A buffered
//! relay never blocks producers on the consumer; an unbuffered relay hands
//! every record over in a rendezvous. Both fill the map with the same ids.

use crate::core::hasher::{
    batch_ranges, HashGroups, HashPartitioner, HashStrategyKind, TreeHashRecord,
};
use crate::core::tree::Tree;
use crossbeam_channel::{bounded, unbounded};
use std::thread;

/// Batch hash workers feeding one consumer over a channel
#[derive(Debug, Clone)]
pub struct ChannelRelayHasher {
    workers: usize,
    buffered: bool,
}

impl ChannelRelayHasher {
    /// Create a relay hasher with the given number of hash workers
    pub fn new(workers: usize, buffered: bool) -> Self {
        Self { workers, buffered }
    }
}

impl HashPartitioner for ChannelRelayHasher {
    fn partition(&self, trees: &[Tree]) -> HashGroups {
        let ranges = batch_ranges(trees.len(), self.workers);
        tracing::debug!(
            workers = ranges.len(),
            buffered = self.buffered,
            "Hashing through single-consumer relay"
        );

        let (sender, receiver) = if self.buffered {
            unbounded::<TreeHashRecord>()
        } else {
            bounded::<TreeHashRecord>(0)
        };
        let mut groups = HashGroups::new();

        thread::scope(|scope| {
            for range in ranges {
                let sender = sender.clone();
                scope.spawn(move || {
                    for tree_id in range {
                        let record = TreeHashRecord::compute(trees, tree_id);
                        if sender.send(record).is_err() {
                            break;
                        }
                    }
                });
            }
            // Close our end so the drain below stops once the workers finish
            drop(sender);

            for record in receiver.iter() {
                groups.push(record.hash, record.tree);
            }
        });

        groups
    }

    fn kind(&self) -> HashStrategyKind {
        HashStrategyKind::ChannelRelay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::strategies::fixtures::sample_trees;
    use crate::core::hasher::SequentialHasher;

    #[test]
    fn buffered_and_unbuffered_converge() {
        let trees = sample_trees();
        let expected = SequentialHasher::default().partition(&trees);

        for workers in [2, 3, 7, 32] {
            for buffered in [true, false] {
                let groups = ChannelRelayHasher::new(workers, buffered).partition(&trees);
                assert_eq!(
                    groups.normalized(),
                    expected,
                    "workers = {workers}, buffered = {buffered}"
                );
            }
        }
    }

    #[test]
    fn empty_input_spawns_nothing() {
        let groups = ChannelRelayHasher::new(4, false).partition(&[]);
        assert!(groups.is_empty());
    }
}
