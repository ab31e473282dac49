//! # Tree Module
//!
//! Immutable-after-build binary search trees of integers.
//!
//! ## Representation
//! Nodes are stored in a per-tree arena and children are referenced by
//! index, so ownership stays strictly tree-shaped while traversal, hashing
//! and drop never recurse. A degenerate (list-shaped) tree with millions of
//! nodes is as safe to handle as a balanced one.
//!
//! ## Hash
//! The in-order hash folds every value `v` into an accumulator starting at 1:
//! `acc = (acc * (v + 2) + (v + 2)) mod 1000`. The result doubles as the
//! bucket key used by the hash partitioner.

mod equality;

pub use equality::trees_equal;

/// Number of distinct hash values (and therefore hash buckets)
pub const HASH_BUCKETS: usize = 1000;

/// Stable identity of a tree: its index in the input collection
pub type TreeId = usize;

/// Bucket key produced by [`Tree::hash`], always in `0..HASH_BUCKETS`
pub type HashKey = usize;

type NodeIndex = usize;

#[derive(Debug, Clone)]
struct Node {
    value: i32,
    left: Option<NodeIndex>,
    right: Option<NodeIndex>,
}

impl Node {
    fn leaf(value: i32) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }
}

/// A binary search tree built once from an input row
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeIndex>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by inserting values in order; the first value seeds the root
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let values = values.into_iter();
        let mut tree = Self {
            nodes: Vec::with_capacity(values.size_hint().0),
            root: None,
        };
        for value in values {
            tree.insert(value);
        }
        tree
    }

    /// Insert a value: smaller goes left, equal or larger goes right
    pub fn insert(&mut self, value: i32) {
        let new_index = self.nodes.len();
        self.nodes.push(Node::leaf(value));

        let Some(mut current) = self.root else {
            self.root = Some(new_index);
            return;
        };

        loop {
            let node = &mut self.nodes[current];
            let slot = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
            match *slot {
                Some(next) => current = next,
                None => {
                    *slot = Some(new_index);
                    return;
                }
            }
        }
    }

    /// Number of values stored in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds no values
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the values in sorted (in-order) sequence
    pub fn in_order(&self) -> InOrder<'_> {
        InOrder {
            tree: self,
            stack: Vec::new(),
            next: self.root,
        }
    }

    /// Call `visit` on every value in in-order sequence
    pub fn visit_in_order<F>(&self, mut visit: F)
    where
        F: FnMut(i32),
    {
        let mut stack: Vec<NodeIndex> = Vec::new();
        let mut current = self.root;

        loop {
            while let Some(index) = current {
                stack.push(index);
                current = self.nodes[index].left;
            }
            let Some(index) = stack.pop() else {
                return;
            };
            visit(self.nodes[index].value);
            current = self.nodes[index].right;
        }
    }

    /// Compute the in-order hash by folding over the iterator
    pub fn hash(&self) -> HashKey {
        self.in_order().fold(1, fold_hash)
    }

    /// Compute the in-order hash through the closure-based visitor
    ///
    /// Always equal to [`Tree::hash`]; both walk the values in the same order.
    pub fn hash_with_visitor(&self) -> HashKey {
        let mut acc = 1;
        self.visit_in_order(|value| acc = fold_hash(acc, value));
        acc
    }
}

/// One step of the in-order hash recurrence
///
/// Runs in 64-bit with a Euclidean modulo so negative values stay in range.
fn fold_hash(acc: HashKey, value: i32) -> HashKey {
    let weight = i64::from(value) + 2;
    let modulus = HASH_BUCKETS as i64;
    (acc as i64 * weight + weight).rem_euclid(modulus) as HashKey
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        trees_equal(self, other)
    }
}

impl Eq for Tree {}

/// In-order iterator backed by an explicit stack
pub struct InOrder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
    next: Option<NodeIndex>,
}

impl Iterator for InOrder<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        while let Some(index) = self.next {
            self.stack.push(index);
            self.next = self.tree.nodes[index].left;
        }
        let index = self.stack.pop()?;
        let node = &self.tree.nodes[index];
        self.next = node.right;
        Some(node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_is_sorted() {
        let tree = Tree::from_values([5, 3, 8, 1, 4, 9, 7]);
        let values: Vec<_> = tree.in_order().collect();
        assert_eq!(values, vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn ties_go_right() {
        let tree = Tree::from_values([2, 2, 1, 2]);
        let values: Vec<_> = tree.in_order().collect();
        assert_eq!(values, vec![1, 2, 2, 2]);
        assert_eq!(tree.nodes[0].right, Some(1));
        assert_eq!(tree.nodes[1].right, Some(3));
        assert_eq!(tree.nodes[0].left, Some(2));
    }

    #[test]
    fn hash_matches_recurrence() {
        // acc: 1 -> 1*3+3=6 -> 6*4+4=28 -> 28*5+5=145
        let tree = Tree::from_values([1, 2, 3]);
        assert_eq!(tree.hash(), 145);

        // 1*7+7=14
        assert_eq!(Tree::from_values([5]).hash(), 14);
    }

    #[test]
    fn hash_depends_only_on_in_order_sequence() {
        let ascending = Tree::from_values([1, 2, 3]);
        let descending = Tree::from_values([3, 2, 1]);
        let balanced = Tree::from_values([2, 1, 3]);
        assert_eq!(ascending.hash(), descending.hash());
        assert_eq!(ascending.hash(), balanced.hash());
    }

    #[test]
    fn visitor_and_fold_agree() {
        let rows: [&[i32]; 5] = [
            &[],
            &[42],
            &[10, 4, 17, 4, 99, -3, 0],
            &[-7, -2, -1000, 31],
            &[i32::MAX, i32::MIN, 0],
        ];
        for row in rows {
            let tree = Tree::from_values(row.iter().copied());
            assert_eq!(tree.hash(), tree.hash_with_visitor(), "row {row:?}");
        }
    }

    #[test]
    fn hash_stays_in_bucket_range_for_negative_values() {
        let tree = Tree::from_values([-3, -5, -100, i32::MIN]);
        assert!(tree.hash() < HASH_BUCKETS);
    }

    #[test]
    fn empty_tree_hashes_to_seed() {
        let tree = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.hash(), 1);
        assert_eq!(tree.in_order().count(), 0);
    }

    #[test]
    fn degenerate_tree_does_not_overflow_the_stack() {
        // Descending inserts build a left spine as deep as the tree is long
        let tree = Tree::from_values((0..10_000).rev());
        assert_eq!(tree.len(), 10_000);
        assert_eq!(tree.hash(), tree.hash_with_visitor());
        assert_eq!(tree.in_order().next(), Some(0));
        assert_eq!(tree.in_order().last(), Some(9_999));
        assert!(trees_equal(&tree, &tree.clone()));
    }
}
