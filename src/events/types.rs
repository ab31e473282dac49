//! Event type definitions for progress reporting.

use crate::core::comparator::GroupingStrategyKind;
use crate::core::hasher::HashStrategyKind;
use serde::{Deserialize, Serialize};

/// All events emitted by the duplicate tree pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Hashing stage events
    Hash(HashEvent),
    /// Comparison stage events
    Compare(CompareEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the hashing stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Hashing has started
    Started {
        total_trees: usize,
        strategy: HashStrategyKind,
    },
    /// Hashing completed
    Completed {
        /// Buckets holding at least one tree
        buckets: usize,
        /// Buckets holding two or more trees
        candidate_buckets: usize,
        elapsed_secs: f64,
    },
}

/// Events during the comparison stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompareEvent {
    /// Comparison has started
    Started {
        candidate_buckets: usize,
        strategy: GroupingStrategyKind,
    },
    /// Comparison completed
    Completed {
        comparisons: usize,
        duplicate_groups: usize,
        elapsed_secs: f64,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Hashing,
    Comparing,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Trees in the input collection
    pub total_trees: usize,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Trees that duplicate an earlier tree
    pub duplicate_count: usize,
    /// Hashing stage duration
    pub hash_secs: f64,
    /// Comparison stage duration, if it ran
    pub compare_secs: Option<f64>,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Hashing => write!(f, "Hashing"),
            PipelinePhase::Comparing => write!(f, "Comparing"),
        }
    }
}

impl From<HashEvent> for Event {
    fn from(event: HashEvent) -> Self {
        Event::Hash(event)
    }
}

impl From<CompareEvent> for Event {
    fn from(event: CompareEvent) -> Self {
        Event::Compare(event)
    }
}

impl From<PipelineEvent> for Event {
    fn from(event: PipelineEvent) -> Self {
        Event::Pipeline(event)
    }
}
