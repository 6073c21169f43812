//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::SyncOptions;

/// dirmirror - Make a target directory an exact copy of a source directory
///
/// Files are compared by content fingerprint. Target entries with no source
/// counterpart are removed.
#[derive(Parser, Debug)]
#[command(name = "dirmirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to mirror from
    pub source: PathBuf,

    /// Directory to mirror into (created if missing)
    pub target: PathBuf,

    /// Log file, appended to [default: dirmirror_YYYYMMDD.log]
    #[arg(long, value_name = "PATH", env = "DIRMIRROR_LOG")]
    pub log: Option<PathBuf>,

    /// Options file (.toml, .json, .yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report what would change without touching the target
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep target directories that are absent from the source
    #[arg(long)]
    pub keep_stale_dirs: bool,

    /// Do not copy modification times
    #[arg(long)]
    pub no_times: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line flags on top of options read from a file.
    ///
    /// Flags only ever switch a behavior on or off relative to `base`;
    /// an absent flag keeps the file's value.
    pub fn apply_overrides(&self, mut base: SyncOptions) -> SyncOptions {
        if self.dry_run {
            base.dry_run = true;
        }
        if self.keep_stale_dirs {
            base.prune_directories = false;
        }
        if self.no_times {
            base.preserve_times = false;
        }
        base
    }
}
