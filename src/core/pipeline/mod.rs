//! # Pipeline Module
//!
//! Orchestrates the two-stage duplicate detection workflow.
//!
//! ## Pipeline Stages
//! 1. **Hash** - Bucket every tree by its in-order hash
//! 2. **Compare** - Confirm true equality inside each bucket
//!
//! ## Parallelism
//! The worker counts select one strategy per stage; every combination
//! produces the same duplicate groups and only the timings differ.

mod executor;

pub use executor::{GroupingOutcome, Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
