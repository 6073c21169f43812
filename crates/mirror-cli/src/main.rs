//! dirmirror CLI
//!
//! Mirrors a source directory into a target directory, logging every action
//! to the console and to a log file.

mod cli;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use mirror_core::{SyncOptions, SyncReport, Synchronizer};
use mirror_fs::ConfigStore;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path, cli.verbose, cli.json)?;
    tracing::debug!(log = %log_path.display(), "Logging initialized");

    let base = match &cli.config {
        Some(path) => ConfigStore::new().load::<SyncOptions>(path)?,
        None => SyncOptions::default(),
    };
    let options = cli.apply_overrides(base);
    tracing::debug!(?options, "Resolved options");

    // The synchronizer logs the failure itself; main only prints the summary
    let report = Synchronizer::new(&cli.source, &cli.target)
        .with_options(options)
        .run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&cli, &report);
    }
    Ok(())
}

fn print_summary(cli: &Cli, report: &SyncReport) {
    let stats = &report.stats;
    let label = if report.dry_run {
        "dry-run".yellow().bold()
    } else {
        "mirrored".green().bold()
    };
    println!(
        "{} {} -> {}",
        label,
        cli.source.display(),
        cli.target.display()
    );
    println!(
        "  {} copied ({} bytes), {} removed, {} unchanged, {} directories created, {} directories removed",
        stats.files_copied,
        stats.bytes_copied,
        stats.files_removed,
        stats.files_unchanged,
        stats.directories_created,
        stats.directories_removed,
    );
    if stats.entries_skipped > 0 {
        println!(
            "  {} {} symlinks or special files skipped",
            "note:".cyan(),
            stats.entries_skipped
        );
    }
}
