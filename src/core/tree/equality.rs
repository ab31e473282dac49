//! Iterative structural equality between two trees.
//!
//! Two trees are equal when their in-order value sequences are identical
//! element for element and run out at the same time. Each side keeps its
//! own explicit stack, so arbitrarily unbalanced trees are compared without
//! recursion. Trees are read-only, so this is safe to call from any number
//! of threads at once.

use super::Tree;

/// Compare two trees by their in-order sequences
pub fn trees_equal(a: &Tree, b: &Tree) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut left = a.in_order();
    let mut right = b.in_order();
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) if x == y => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}
