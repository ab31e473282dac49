//! # CLI Module
//!
//! Command-line interface for the duplicate tree finder.
//!
//! ## Usage
//! ```bash
//! # Hash sequentially, then compare with the bounded work queue
//! bst-dedup --input coarse.txt --comp-workers 4
//!
//! # Sharded relay hashing with unbuffered channels
//! bst-dedup --input fine.txt --hash-workers 8 --data-workers 3 --data-buffered false
//!
//! # Time hashing alone
//! bst-dedup --input fine.txt --hash-workers 8 --hash-only
//!
//! # JSON output
//! bst-dedup --input coarse.txt --comp-workers 2 --output json
//! ```

use bst_dedup::core::pipeline::{Pipeline, PipelineResult};
use bst_dedup::core::reader::read_trees;
use bst_dedup::core::{DuplicateGroup, HashKey, TreeId};
use bst_dedup::error::Result;
use bst_dedup::events::{CompareEvent, Event, EventChannel, HashEvent, PipelineEvent};
use clap::{ArgAction, Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// BST Dedup - Find binary search trees with identical contents
#[derive(Parser, Debug)]
#[command(name = "bst-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file, one tree per line
    #[arg(short, long)]
    input: PathBuf,

    /// Threads computing tree hashes
    #[arg(long, default_value_t = 1)]
    hash_workers: usize,

    /// Threads writing the bucket map (0 lets hash workers write it).
    /// Buckets are always filled; use --hash-only to time hashing alone
    #[arg(long, default_value_t = 0)]
    data_workers: usize,

    /// Threads comparing trees (0 skips comparison)
    #[arg(long, default_value_t = 0)]
    comp_workers: usize,

    /// Buffered channels between hash and map workers
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    data_buffered: bool,

    /// Bounded work queue for comparison (false spawns a task per pair)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    comp_buffered: bool,

    /// Time hashing without recording buckets
    #[arg(long)]
    hash_only: bool,

    /// Print timings and counts only, without bucket and group listings
    #[arg(short, long)]
    brief: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Plain timing and listing lines
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let term = Term::stderr();

    if matches!(cli.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("BST Dedup").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder()
        .hash_workers(cli.hash_workers)
        .data_workers(cli.data_workers)
        .comp_workers(cli.comp_workers)
        .data_buffered(cli.data_buffered)
        .comp_buffered(cli.comp_buffered)
        .hash_only(cli.hash_only)
        .build()?;

    let trees = read_trees(&cli.input)?;

    let (sender, receiver) = EventChannel::new();

    // Spinner for pretty output
    let progress = matches!(cli.output, OutputFormat::Pretty).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(spinner);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{phase}..."));
                }
                Event::Hash(HashEvent::Started {
                    total_trees,
                    strategy,
                }) => {
                    pb.set_message(format!("Hashing {total_trees} trees ({strategy})"));
                }
                Event::Hash(HashEvent::Completed {
                    candidate_buckets, ..
                }) => {
                    pb.set_message(format!("{candidate_buckets} buckets to compare"));
                }
                Event::Compare(CompareEvent::Started {
                    candidate_buckets,
                    strategy,
                }) => {
                    pb.set_message(format!(
                        "Comparing {candidate_buckets} buckets ({strategy})"
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&trees, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    match cli.output {
        OutputFormat::Pretty => print_pretty_results(&result, cli.brief),
        OutputFormat::Json => print_json_results(&result, cli.brief)?,
        OutputFormat::Minimal => print_minimal_results(&result, cli.data_workers, cli.brief),
    }

    Ok(())
}

fn print_pretty_results(result: &PipelineResult, brief: bool) {
    let term = Term::stdout();

    term.write_line(&format!("{} Run Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} trees hashed in {:.6}s ({})",
        style(result.total_trees).cyan(),
        result.hash_elapsed.as_secs_f64(),
        style(result.hash_strategy).dim()
    ))
    .ok();
    term.write_line(&format!(
        "    {}",
        style(result.hash_strategy.description()).dim()
    ))
    .ok();
    term.write_line(&format!(
        "  {} buckets with two or more trees",
        style(result.hash_groups.candidates().count()).cyan()
    ))
    .ok();

    let Some(grouping) = &result.grouping else {
        term.write_line(&format!("  {}", style("Comparison skipped").dim()))
            .ok();
        if !brief {
            print_pretty_buckets(&term, result);
        }
        return;
    };

    term.write_line(&format!(
        "  {} comparisons in {:.6}s ({})",
        style(grouping.comparison.comparisons()).cyan(),
        grouping.elapsed.as_secs_f64(),
        style(grouping.strategy).dim()
    ))
    .ok();
    term.write_line(&format!(
        "    {}",
        style(grouping.strategy.description()).dim()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicate groups, {} duplicate trees",
        style(grouping.groups.len()).cyan(),
        style(result.duplicate_count()).cyan()
    ))
    .ok();
    term.write_line("").ok();

    if brief {
        return;
    }

    if grouping.groups.is_empty() {
        term.write_line(&format!("  {}", style("No duplicate trees found").green()))
            .ok();
        return;
    }

    term.write_line(&format!(
        "{}",
        style("Duplicate Groups:").bold().underlined()
    ))
    .ok();
    for (i, group) in grouping.groups.iter().enumerate() {
        term.write_line(&format!(
            "  {} {} {}",
            style(format!("Group {i}:")).bold(),
            join_ids(&group.trees),
            style(format!("(hash {})", group.hash)).dim()
        ))
        .ok();
    }
}

fn print_pretty_buckets(term: &Term, result: &PipelineResult) {
    let mut buckets = result.hash_groups.candidates().peekable();
    if buckets.peek().is_none() {
        return;
    }

    term.write_line("").ok();
    term.write_line(&format!("{}", style("Hash Buckets:").bold().underlined()))
        .ok();
    for (hash, ids) in buckets {
        term.write_line(&format!(
            "  {} {}",
            style(format!("{hash}:")).yellow(),
            join_ids(ids)
        ))
        .ok();
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total_trees: usize,
    hash_strategy: String,
    hash_secs: f64,
    candidate_buckets: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    buckets: Option<Vec<JsonBucket<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<JsonComparison<'a>>,
}

#[derive(Serialize)]
struct JsonBucket<'a> {
    hash: HashKey,
    trees: &'a [TreeId],
}

#[derive(Serialize)]
struct JsonComparison<'a> {
    strategy: String,
    comparisons: usize,
    compare_secs: f64,
    duplicate_groups: usize,
    duplicate_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<&'a [DuplicateGroup]>,
}

fn print_json_results(result: &PipelineResult, brief: bool) -> Result<()> {
    let report = JsonReport {
        total_trees: result.total_trees,
        hash_strategy: result.hash_strategy.to_string(),
        hash_secs: result.hash_elapsed.as_secs_f64(),
        candidate_buckets: result.hash_groups.candidates().count(),
        buckets: (!brief).then(|| {
            result
                .hash_groups
                .candidates()
                .map(|(hash, trees)| JsonBucket { hash, trees })
                .collect()
        }),
        comparison: result.grouping.as_ref().map(|grouping| JsonComparison {
            strategy: grouping.strategy.to_string(),
            comparisons: grouping.comparison.comparisons(),
            compare_secs: grouping.elapsed.as_secs_f64(),
            duplicate_groups: grouping.groups.len(),
            duplicate_count: result.duplicate_count(),
            groups: (!brief).then_some(grouping.groups.as_slice()),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_minimal_results(result: &PipelineResult, data_workers: usize, brief: bool) {
    let hash_secs = result.hash_elapsed.as_secs_f64();
    println!("hashTime: {hash_secs:.6}");
    if data_workers > 0 {
        println!("hashGroupTime: {hash_secs:.6}");
    }
    if !brief {
        for (hash, ids) in result.hash_groups.candidates() {
            println!("{hash}: {}", join_ids(ids));
        }
    }

    let Some(grouping) = &result.grouping else {
        return;
    };

    println!("compareTreeTime: {:.6}", grouping.elapsed.as_secs_f64());
    if !brief {
        for (i, group) in grouping.groups.iter().enumerate() {
            println!("group {i}: {}", join_ids(&group.trees));
        }
    }
}

fn join_ids(ids: &[TreeId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn buffered_flags_default_to_true() {
        let cli = Cli::try_parse_from(["bst-dedup", "--input", "trees.txt"]).unwrap();
        assert!(cli.data_buffered);
        assert!(cli.comp_buffered);
        assert_eq!(cli.hash_workers, 1);
        assert_eq!(cli.comp_workers, 0);
    }

    #[test]
    fn buffered_flags_accept_false() {
        let cli = Cli::try_parse_from([
            "bst-dedup",
            "--input",
            "trees.txt",
            "--data-buffered",
            "false",
            "--comp-buffered",
            "false",
        ])
        .unwrap();
        assert!(!cli.data_buffered);
        assert!(!cli.comp_buffered);
    }

    #[test]
    fn ids_are_space_separated() {
        assert_eq!(join_ids(&[0, 1, 5]), "0 1 5");
        assert_eq!(join_ids(&[]), "");
    }
}
