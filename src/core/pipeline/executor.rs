//! Pipeline execution implementation.

use crate::core::comparator::{
    ComparisonGroups, DuplicateGroup, EquivalenceGrouper, GrouperConfig, GroupingStrategyKind,
};
use crate::core::hasher::{HashGroups, HashStrategyKind, PartitionerConfig};
use crate::core::tree::Tree;
use crate::error::DedupError;
use crate::events::{
    null_sender, CompareEvent, EventSender, HashEvent, PipelineEvent, PipelinePhase,
    PipelineSummary,
};
use std::time::{Duration, Instant};

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Trees in the input collection
    pub total_trees: usize,
    /// Strategy used for hashing
    pub hash_strategy: HashStrategyKind,
    /// Tree ids by hash bucket
    pub hash_groups: HashGroups,
    /// Time spent in the hashing stage
    pub hash_elapsed: Duration,
    /// Comparison stage output, if comparison workers were configured
    pub grouping: Option<GroupingOutcome>,
}

impl PipelineResult {
    /// Duplicate groups found (empty when the comparison stage did not run)
    pub fn groups(&self) -> &[DuplicateGroup] {
        self.grouping
            .as_ref()
            .map(|outcome| outcome.groups.as_slice())
            .unwrap_or(&[])
    }

    /// Trees that duplicate an earlier tree
    pub fn duplicate_count(&self) -> usize {
        self.groups().iter().map(DuplicateGroup::duplicate_count).sum()
    }
}

/// Output of the comparison stage
#[derive(Debug)]
pub struct GroupingOutcome {
    /// Strategy used for comparison
    pub strategy: GroupingStrategyKind,
    /// Matrices and follower flags
    pub comparison: ComparisonGroups,
    /// Equivalence groups of two or more trees
    pub groups: Vec<DuplicateGroup>,
    /// Time spent comparing
    pub elapsed: Duration,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Threads computing hashes
    pub hash_workers: usize,
    /// Threads writing the bucket map (0 lets hash workers write it)
    pub data_workers: usize,
    /// Threads comparing trees (0 skips the comparison stage)
    pub comp_workers: usize,
    /// Buffered channels for the hash relays
    pub data_buffered: bool,
    /// Bounded work queue (otherwise one task per pair) for comparison
    pub comp_buffered: bool,
    /// Compute hashes without recording buckets
    pub hash_only: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            hash_workers: 1,
            data_workers: 0,
            comp_workers: 0,
            data_buffered: true,
            comp_buffered: true,
            hash_only: false,
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the number of hash workers
    pub fn hash_workers(mut self, workers: usize) -> Self {
        self.config.hash_workers = workers;
        self
    }

    /// Set the number of map-writing workers
    pub fn data_workers(mut self, workers: usize) -> Self {
        self.config.data_workers = workers;
        self
    }

    /// Set the number of comparison workers
    pub fn comp_workers(mut self, workers: usize) -> Self {
        self.config.comp_workers = workers;
        self
    }

    /// Use buffered channels for the hash relays
    pub fn data_buffered(mut self, buffered: bool) -> Self {
        self.config.data_buffered = buffered;
        self
    }

    /// Use the bounded work queue for comparison
    pub fn comp_buffered(mut self, buffered: bool) -> Self {
        self.config.comp_buffered = buffered;
        self
    }

    /// Only time hashing; buckets stay empty
    pub fn hash_only(mut self, hash_only: bool) -> Self {
        self.config.hash_only = hash_only;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the pipeline
    ///
    /// Out-of-range worker counts are clamped; only contradictory settings fail.
    pub fn build(self) -> Result<Pipeline, DedupError> {
        let mut config = self.config;

        if config.hash_only && config.comp_workers > 0 {
            return Err(DedupError::Config(
                "comparison needs hash buckets; drop --hash-only or set --comp-workers 0"
                    .to_string(),
            ));
        }

        if config.hash_workers == 0 {
            tracing::warn!("hash workers must be at least 1; running sequentially");
            config.hash_workers = 1;
        }

        Ok(Pipeline { config })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The duplicate tree pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// The effective configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self, trees: &[Tree]) -> PipelineResult {
        self.run_with_events(trees, &null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, trees: &[Tree], events: &EventSender) -> PipelineResult {
        let config = &self.config;
        events.send(PipelineEvent::Started);

        // Stage 1: Hashing
        events.send(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Hashing,
        });

        let partitioner = PartitionerConfig::new()
            .hash_workers(config.hash_workers)
            .data_workers(config.data_workers)
            .buffered(config.data_buffered)
            .record(!config.hash_only)
            .build();
        let hash_strategy = partitioner.kind();

        events.send(HashEvent::Started {
            total_trees: trees.len(),
            strategy: hash_strategy,
        });

        let start = Instant::now();
        let hash_groups = partitioner.partition(trees);
        let hash_elapsed = start.elapsed();

        let candidate_buckets = hash_groups.candidates().count();
        tracing::info!(
            strategy = %hash_strategy,
            trees = trees.len(),
            candidate_buckets,
            elapsed_secs = hash_elapsed.as_secs_f64(),
            "Hashing complete"
        );
        events.send(HashEvent::Completed {
            buckets: hash_groups.iter().count(),
            candidate_buckets,
            elapsed_secs: hash_elapsed.as_secs_f64(),
        });

        // Stage 2: Comparing
        let grouping = (config.comp_workers > 0).then(|| {
            events.send(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Comparing,
            });
            self.compare(trees, &hash_groups, candidate_buckets, events)
        });

        let result = PipelineResult {
            total_trees: trees.len(),
            hash_strategy,
            hash_groups,
            hash_elapsed,
            grouping,
        };

        events.send(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_trees: result.total_trees,
                duplicate_groups: result.groups().len(),
                duplicate_count: result.duplicate_count(),
                hash_secs: result.hash_elapsed.as_secs_f64(),
                compare_secs: result
                    .grouping
                    .as_ref()
                    .map(|outcome| outcome.elapsed.as_secs_f64()),
            },
        });

        result
    }

    fn compare(
        &self,
        trees: &[Tree],
        hash_groups: &HashGroups,
        candidate_buckets: usize,
        events: &EventSender,
    ) -> GroupingOutcome {
        let grouper = GrouperConfig::new()
            .workers(self.config.comp_workers)
            .buffered(self.config.comp_buffered)
            .build();
        let strategy = grouper.kind();

        events.send(CompareEvent::Started {
            candidate_buckets,
            strategy,
        });

        let start = Instant::now();
        let comparison = grouper.group(hash_groups, trees);
        let elapsed = start.elapsed();

        let groups = EquivalenceGrouper::new().group(&comparison, hash_groups);

        tracing::info!(
            strategy = %strategy,
            comparisons = comparison.comparisons(),
            groups = groups.len(),
            elapsed_secs = elapsed.as_secs_f64(),
            "Comparison complete"
        );
        events.send(CompareEvent::Completed {
            comparisons: comparison.comparisons(),
            duplicate_groups: groups.len(),
            elapsed_secs: elapsed.as_secs_f64(),
        });

        GroupingOutcome {
            strategy,
            comparison,
            groups,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::parse_trees;
    use crate::events::{Event, EventChannel};

    #[test]
    fn pipeline_builder_applies_settings() {
        let pipeline = Pipeline::builder()
            .hash_workers(4)
            .data_workers(2)
            .comp_workers(3)
            .comp_buffered(false)
            .build()
            .unwrap();

        assert_eq!(pipeline.config().hash_workers, 4);
        assert_eq!(pipeline.config().comp_workers, 3);
        assert!(!pipeline.config().comp_buffered);
    }

    #[test]
    fn zero_hash_workers_is_clamped() {
        let pipeline = Pipeline::builder().hash_workers(0).build().unwrap();
        assert_eq!(pipeline.config().hash_workers, 1);
    }

    #[test]
    fn oversized_worker_counts_run_to_completion() {
        let trees = parse_trees("1 2 3\n3 2 1\n5\n").unwrap();

        let sharded = Pipeline::builder()
            .hash_workers(2)
            .data_workers(40_000)
            .build()
            .unwrap()
            .run(&trees);
        assert_eq!(sharded.hash_strategy, HashStrategyKind::ShardedRelay);
        assert_eq!(sharded.hash_groups.len(), 3);

        for comp_buffered in [true, false] {
            let result = Pipeline::builder()
                .comp_workers(40_000)
                .comp_buffered(comp_buffered)
                .build()
                .unwrap()
                .run(&trees);
            assert_eq!(result.groups(), &[DuplicateGroup::new(145, vec![0, 1])]);
        }
    }

    #[test]
    fn hash_only_with_comparison_is_rejected() {
        let result = Pipeline::builder().hash_only(true).comp_workers(2).build();
        assert!(matches!(result, Err(DedupError::Config(_))));
    }

    #[test]
    fn scenario_groups_equal_in_order_sequences() {
        let trees = parse_trees("1 2 3\n3 2 1\n5\n").unwrap();
        let pipeline = Pipeline::builder().comp_workers(1).build().unwrap();

        let result = pipeline.run(&trees);

        assert_eq!(result.hash_groups.bucket(145), &[0, 1]);
        assert_eq!(result.hash_groups.bucket(14), &[2]);
        assert_eq!(result.groups(), &[DuplicateGroup::new(145, vec![0, 1])]);
        assert_eq!(result.duplicate_count(), 1);
    }

    #[test]
    fn zero_comp_workers_skips_comparison() {
        let trees = parse_trees("1 2 3\n3 2 1\n").unwrap();
        let result = Pipeline::builder().build().unwrap().run(&trees);

        assert!(result.grouping.is_none());
        assert!(result.groups().is_empty());
        assert_eq!(result.hash_groups.len(), 2);
    }

    #[test]
    fn empty_collection_runs_cleanly() {
        let result = Pipeline::builder()
            .hash_workers(8)
            .data_workers(3)
            .comp_workers(4)
            .build()
            .unwrap()
            .run(&[]);

        assert_eq!(result.total_trees, 0);
        assert!(result.hash_groups.is_empty());
        assert!(result.groups().is_empty());
    }

    #[test]
    fn events_bracket_both_stages() {
        let trees = parse_trees("4 2 6\n6 4 2\n9\n").unwrap();
        let (sender, receiver) = EventChannel::new();

        let pipeline = Pipeline::builder()
            .hash_workers(2)
            .data_workers(1)
            .comp_workers(2)
            .build()
            .unwrap();
        let _ = pipeline.run_with_events(&trees, &sender);
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(events.first(), Some(Event::Pipeline(PipelineEvent::Started))));
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Compare(CompareEvent::Completed {
                duplicate_groups: 1,
                ..
            })
        )));
        match events.last() {
            Some(Event::Pipeline(PipelineEvent::Completed { summary })) => {
                assert_eq!(summary.total_trees, 3);
                assert_eq!(summary.duplicate_count, 1);
                assert!(summary.compare_secs.is_some());
            }
            other => panic!("Expected Completed event, got {other:?}"),
        }
    }
}
