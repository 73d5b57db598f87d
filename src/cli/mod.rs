//! # CLI Module
//!
//! Command-line interface for the media sweeper.
//!
//! ## Usage
//! ```bash
//! # Scan a directory for duplicate and similar photos
//! media-sweep scan ~/Pictures
//!
//! # With custom thresholds
//! media-sweep scan ~/Pictures --duplicate-threshold 5 --similar-threshold 15
//!
//! # JSON output
//! media-sweep scan ~/Pictures --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use media_sweeper::core::clusterer::{DuplicateGroup, SimilarGroup};
use media_sweeper::core::orchestrator::{LibraryScanner, ScanConfig};
use media_sweeper::core::store::FsMediaStore;
use media_sweeper::error::{Result, SweepError};
use media_sweeper::events::{ScanProgress, ScanResult};

/// Media Sweeper - find duplicate and near-duplicate photos
#[derive(Parser, Debug)]
#[command(name = "media-sweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a directory tree for duplicate and similar photos
    Scan {
        /// Directory holding the media library
        path: PathBuf,

        /// Hamming distance at or below which photos are duplicates (0-64)
        #[arg(long, default_value = "10")]
        duplicate_threshold: u32,

        /// Hamming distance at or below which photos are similar (0-64)
        #[arg(long, default_value = "20")]
        similar_threshold: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (deletion candidates only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    media_sweeper::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            duplicate_threshold,
            similar_threshold,
            output,
            verbose,
        } => run_scan(path, duplicate_threshold, similar_threshold, output, verbose),
    }
}

fn run_scan(
    path: PathBuf,
    duplicate_threshold: u32,
    similar_threshold: u32,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    if duplicate_threshold > 64 || similar_threshold > 64 {
        return Err(SweepError::Config(
            "thresholds must be between 0 and 64".to_string(),
        ));
    }
    if duplicate_threshold >= similar_threshold {
        return Err(SweepError::Config(
            "duplicate threshold must be below the similar threshold".to_string(),
        ));
    }

    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Media Sweeper").bold().cyan(),
            style("v0.1.0").dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let scanner = LibraryScanner::with_config(
        FsMediaStore::new(&path),
        ScanConfig {
            duplicate_threshold,
            similar_threshold,
        },
    );

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let receiver = scanner.start_scan();

    let mut final_result: Option<ScanResult> = None;
    for state in receiver.iter() {
        match state {
            ScanProgress::Scanning { processed, total } => {
                if let Some(ref pb) = progress {
                    pb.set_length(total as u64);
                    pb.set_position(processed as u64);
                    pb.set_message("Scanning");
                }
            }
            ScanProgress::Hashing { processed, total } => {
                if let Some(ref pb) = progress {
                    pb.set_length(total as u64);
                    pb.set_position(processed as u64);
                    pb.set_message("Hashing");
                }
            }
            ScanProgress::Completed(result) => {
                if let Some(ref pb) = progress {
                    pb.finish_and_clear();
                }
                final_result = Some(result);
                break;
            }
            ScanProgress::Failed(message) => {
                if let Some(ref pb) = progress {
                    pb.finish_and_clear();
                }
                term.write_line(&format!(
                    "{} {}",
                    style("✗").red().bold(),
                    style(&message).red()
                ))
                .ok();
                term.write_line(&format!(
                    "  {}",
                    style("Check the path and permissions, then try again.").dim()
                ))
                .ok();
                return Err(SweepError::Scan(message));
            }
            ScanProgress::Idle => {}
        }
    }

    let Some(result) = final_result else {
        // Stream ended without a terminal state (cancelled)
        return Ok(());
    };

    let duplicate_groups = scanner.duplicate_groups();
    let similar_groups = scanner.similar_groups();

    match output {
        OutputFormat::Pretty => {
            print_pretty_results(&term, &result, &duplicate_groups, &similar_groups, verbose)
        }
        OutputFormat::Json => print_json_results(&result, &duplicate_groups, &similar_groups),
        OutputFormat::Minimal => print_minimal_results(&duplicate_groups),
    }

    Ok(())
}

fn print_pretty_results(
    term: &Term,
    result: &ScanResult,
    duplicate_groups: &[DuplicateGroup],
    similar_groups: &[SimilarGroup],
    verbose: bool,
) {
    term.write_line("").ok();
    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} items ({} photos, {} videos, {} screenshots), {}",
        style(result.total_items).cyan(),
        result.total_photos,
        result.total_videos,
        result.total_screenshots,
        style(format_bytes(result.total_size_bytes)).cyan()
    ))
    .ok();

    term.write_line(&format!(
        "  {} duplicate groups ({} photos, {})",
        style(result.duplicate_group_count).cyan(),
        result.duplicate_item_count,
        format_bytes(result.duplicate_size_bytes)
    ))
    .ok();

    term.write_line(&format!(
        "  {} similar groups ({} photos, {})",
        style(result.similar_group_count).cyan(),
        result.similar_item_count,
        format_bytes(result.similar_size_bytes)
    ))
    .ok();

    let savings: u64 = duplicate_groups
        .iter()
        .map(DuplicateGroup::potential_savings)
        .sum();
    term.write_line(&format!(
        "  {} potential space savings",
        style(format_bytes(savings)).yellow()
    ))
    .ok();

    if result.failed_hash_count > 0 {
        term.write_line(&format!(
            "  {} photos could not be decoded",
            style(result.failed_hash_count).dim()
        ))
        .ok();
    }

    term.write_line("").ok();

    if duplicate_groups.is_empty() && similar_groups.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("🎉").green()))
            .ok();
    }

    if !duplicate_groups.is_empty() {
        term.write_line(&format!("{}", style("Duplicate Groups:").bold().underlined()))
            .ok();
        term.write_line("").ok();

        for (i, group) in duplicate_groups.iter().enumerate() {
            term.write_line(&format!(
                "  {} ({} photos, {})",
                style(format!("Group {}:", i + 1)).bold(),
                group.len(),
                format_bytes(group.total_size())
            ))
            .ok();
            print_group_members(term, &group.items, group.best_index);
            term.write_line("").ok();
        }
    }

    if !similar_groups.is_empty() {
        term.write_line(&format!("{}", style("Similar Groups:").bold().underlined()))
            .ok();
        term.write_line("").ok();

        for (i, group) in similar_groups.iter().enumerate() {
            term.write_line(&format!(
                "  {} ({} photos, {}, avg distance {})",
                style(format!("Group {}:", i + 1)).bold(),
                group.len(),
                format_bytes(group.total_size()),
                group.average_distance
            ))
            .ok();
            print_group_members(term, &group.items, group.best_index);
            term.write_line("").ok();
        }
    }

    if verbose && (!duplicate_groups.is_empty() || !similar_groups.is_empty()) {
        term.write_line(&format!(
            "  {}",
            style("The starred (★) photo in each group is the one to keep.").dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    term.write_line(&format!(
        "{}",
        style("Remember: No files were deleted. Review carefully before taking action.").dim()
    ))
    .ok();
}

fn print_group_members(
    term: &Term,
    items: &[media_sweeper::core::hasher::ItemHash],
    best_index: usize,
) {
    for (index, item) in items.iter().enumerate() {
        let marker = if index == best_index {
            style("★").green().to_string()
        } else {
            style("○").dim().to_string()
        };
        term.write_line(&format!("    {} {}", marker, item.id)).ok();
    }
}

fn print_json_results(
    result: &ScanResult,
    duplicate_groups: &[DuplicateGroup],
    similar_groups: &[SimilarGroup],
) {
    let output = serde_json::json!({
        "result": result,
        "duplicate_groups": duplicate_groups,
        "similar_groups": similar_groups,
        "potential_savings_bytes": duplicate_groups
            .iter()
            .map(DuplicateGroup::potential_savings)
            .sum::<u64>(),
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn print_minimal_results(duplicate_groups: &[DuplicateGroup]) {
    for group in duplicate_groups {
        for (index, item) in group.items.iter().enumerate() {
            if index != group.best_index {
                println!("{}", item.id);
            }
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
