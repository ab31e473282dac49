//! # BST Dedup
//!
//! Finds groups of binary search trees that hold the same in-order sequence.
//!
//! ## Approach
//! - **Hash first** - a cheap order-sensitive hash buckets every tree
//! - **Compare second** - full in-order comparison inside each bucket
//! - **Same answer, any schedule** - every worker configuration yields identical groups
//!
//! ## Architecture
//! - `core` - Trees, input reader and the two pipeline stages
//! - `events` - Stage progress events for front ends
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DedupError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Log output goes to
/// stderr so stdout carries only the report.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
