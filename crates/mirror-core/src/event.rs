//! Progress and diagnostic events emitted during a pass

use std::fmt;
use std::path::Path;

use mirror_fs::RelativePath;
use tracing::Level;

use crate::{Error, SyncReport};

/// Why a file is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyReason {
    /// No entry of that name in the target directory
    Missing,
    /// Target file content differs
    Changed,
    /// Target entry is a symlink or directory and gets replaced
    Replaced,
}

impl CopyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "new",
            Self::Changed => "changed",
            Self::Replaced => "replaced",
        }
    }
}

/// A change applied to the target tree (or planned, in a dry run).
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    CreateDirectory(&'a RelativePath),
    CopyFile {
        path: &'a RelativePath,
        reason: CopyReason,
        bytes: u64,
    },
    RemoveFile(&'a RelativePath),
    RemoveDirectory(&'a RelativePath),
}

impl Action<'_> {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::CreateDirectory(path)
            | Self::RemoveFile(path)
            | Self::RemoveDirectory(path)
            | Self::CopyFile { path, .. } => *path,
        }
    }
}

/// Event delivered to a [`DiagnosticSink`](crate::DiagnosticSink).
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    Started {
        source: &'a Path,
        target: &'a Path,
        dry_run: bool,
    },
    Action {
        action: Action<'a>,
        dry_run: bool,
    },
    FileUnchanged(&'a RelativePath),
    /// Source entry that is neither a regular file nor a directory
    EntrySkipped(&'a RelativePath),
    Completed(&'a SyncReport),
    Failed(&'a Error),
}

impl SyncEvent<'_> {
    pub fn level(&self) -> Level {
        match self {
            Self::Started { .. } | Self::Action { .. } | Self::Completed(_) => Level::INFO,
            Self::FileUnchanged(_) | Self::EntrySkipped(_) => Level::DEBUG,
            Self::Failed(_) => Level::ERROR,
        }
    }
}

impl fmt::Display for SyncEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started {
                source,
                target,
                dry_run,
            } => {
                if *dry_run {
                    f.write_str("[dry-run] ")?;
                }
                write!(
                    f,
                    "Starting sync from {} to {}",
                    source.display(),
                    target.display()
                )
            }
            Self::Action {
                action,
                dry_run: true,
            } => match action {
                Action::CreateDirectory(path) => write!(f, "[dry-run] Would create directory {path}"),
                Action::CopyFile { path, reason, bytes } => write!(
                    f,
                    "[dry-run] Would copy {path} ({}, {bytes} bytes)",
                    reason.as_str()
                ),
                Action::RemoveFile(path) => write!(f, "[dry-run] Would remove extra file {path}"),
                Action::RemoveDirectory(path) => {
                    write!(f, "[dry-run] Would remove extra directory {path}")
                }
            },
            Self::Action {
                action,
                dry_run: false,
            } => match action {
                Action::CreateDirectory(path) => write!(f, "Created directory {path}"),
                Action::CopyFile { path, reason, bytes } => {
                    write!(f, "Copied {path} ({}, {bytes} bytes)", reason.as_str())
                }
                Action::RemoveFile(path) => write!(f, "Removed extra file {path}"),
                Action::RemoveDirectory(path) => write!(f, "Removed extra directory {path}"),
            },
            Self::FileUnchanged(path) => write!(f, "Unchanged {path}"),
            Self::EntrySkipped(path) => write!(f, "Skipped {path} (not a regular file or directory)"),
            Self::Completed(report) => {
                let stats = &report.stats;
                if report.dry_run {
                    f.write_str("[dry-run] ")?;
                }
                write!(
                    f,
                    "Sync completed successfully: {} copied, {} unchanged, {} removed, {} directories created, {} directories removed",
                    stats.files_copied,
                    stats.files_unchanged,
                    stats.files_removed,
                    stats.directories_created,
                    stats.directories_removed
                )
            }
            Self::Failed(error) => write!(f, "Error during sync: {error}"),
        }
    }
}
