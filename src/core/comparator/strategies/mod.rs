//! Bucket grouping strategy implementations.

mod sequential;
mod spawn;
mod work_queue;

pub use sequential::SequentialGrouper;
pub use spawn::SpawnPerPairGrouper;
pub use work_queue::WorkQueueGrouper;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::core::hasher::{HashGroups, HashPartitioner, SequentialHasher};
    use crate::core::tree::Tree;

    /// Trees with a three-way duplicate, a pair, a collision and singletons
    pub fn sample() -> (Vec<Tree>, HashGroups) {
        let rows: [&[i32]; 10] = [
            &[1, 2, 3],
            &[3, 2, 1],
            &[5],
            &[0],
            &[500],
            &[2, 1, 3],
            &[10, 20],
            &[20, 10],
            &[7, 7, 7],
            &[5],
        ];
        let trees: Vec<Tree> = rows
            .iter()
            .map(|row| Tree::from_values(row.iter().copied()))
            .collect();
        let groups = SequentialHasher::default().partition(&trees);
        (trees, groups)
    }
}
