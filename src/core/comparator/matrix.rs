//! Triangular adjacency matrix for one hash bucket.

use serde::Serialize;

/// Upper-triangular boolean matrix over the positions of one bucket
///
/// Stored as `size * (size + 1) / 2` cells. Cell `(i, j)` with `i < j` is set
/// when the tree at position `j` was claimed as a duplicate of position `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// Create an all-false matrix for a bucket of `size` trees
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * (size + 1) / 2],
        }
    }

    /// Number of bucket positions covered
    pub fn size(&self) -> usize {
        self.size
    }

    /// Record that position `j` duplicates position `i`
    pub fn mark(&mut self, i: usize, j: usize) {
        let index = self.index(i, j);
        self.cells[index] = true;
    }

    /// Remove a previously recorded pair
    pub fn clear(&mut self, i: usize, j: usize) {
        let index = self.index(i, j);
        self.cells[index] = false;
    }

    /// Check whether position `j` was recorded as a duplicate of position `i`
    pub fn is_marked(&self, i: usize, j: usize) -> bool {
        i < j && j < self.size && self.cells[self.index(i, j)]
    }

    /// Positions recorded as duplicates of position `i`
    pub fn followers(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        (i + 1..self.size).filter(move |&j| self.is_marked(i, j))
    }

    /// Number of marked cells
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    // Row i starts at i * (2n - i + 1) / 2 and holds n - i cells
    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < j && j < self.size, "cell ({i}, {j}) outside {}", self.size);
        i * (2 * self.size - i + 1) / 2 + (j - i)
    }
}
