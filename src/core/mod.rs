//! # Core Module
//!
//! The duplicate tree detection engine.
//!
//! ## Modules
//! - `tree` - Arena binary search tree, in-order traversal and hashing
//! - `reader` - Parses the line-per-tree input format
//! - `hasher` - Buckets trees by hash with interchangeable strategies
//! - `comparator` - Confirms equality inside buckets and extracts groups
//! - `pipeline` - Orchestrates the full workflow

pub mod comparator;
pub mod hasher;
pub mod pipeline;
pub mod reader;
pub mod tree;

// Re-export commonly used types
pub use comparator::{DuplicateGroup, GroupingStrategyKind};
pub use hasher::{HashGroups, HashStrategyKind};
pub use pipeline::{Pipeline, PipelineResult};
pub use tree::{HashKey, Tree, TreeId};
