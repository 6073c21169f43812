//! The Synchronizer
//!
//! A pass walks the source tree top-down with an explicit stack. Each
//! directory is handled in one step: ensure the target directory exists,
//! copy new or changed files, then remove stale target entries. The first
//! error aborts the pass; nothing already applied is rolled back.

use std::fs::{self, Metadata};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_fs::{Fingerprint, RelativePath, io};

use crate::event::Action;
use crate::{
    CopyReason, DiagnosticSink, DirListing, Error, Result, SyncEvent, SyncOptions, SyncReport,
    TracingSink,
};

/// Mirror `source` onto `target` with default options, logging via `tracing`.
///
/// Returns `true` on success. Failures are reported as error events.
pub fn sync(source: impl AsRef<Path>, target: impl AsRef<Path>) -> bool {
    Synchronizer::new(source.as_ref(), target.as_ref()).sync()
}

/// One-way mirror from a source root to a target root.
pub struct Synchronizer {
    source: PathBuf,
    target: PathBuf,
    options: SyncOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Synchronizer {
    /// Create a synchronizer with default options and a [`TracingSink`].
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            options: SyncOptions::default(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Send this synchronizer's events to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run a pass and reduce the outcome to success or failure.
    pub fn sync(&self) -> bool {
        self.run().is_ok()
    }

    /// Run a pass.
    ///
    /// Emits `Completed` on success and `Failed` with the error before
    /// returning it.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceMissing`] before anything under the target is touched
    /// - [`Error::OverlappingRoots`] if either root contains the other
    /// - [`Error::Fs`] for any I/O failure; earlier changes stay applied
    pub fn run(&self) -> Result<SyncReport> {
        let span = tracing::info_span!(
            "sync",
            source = %self.source.display(),
            target = %self.target.display(),
        );
        let _entered = span.enter();

        match self.run_pass() {
            Ok(report) => {
                self.emit(SyncEvent::Completed(&report));
                Ok(report)
            }
            Err(error) => {
                self.emit(SyncEvent::Failed(&error));
                Err(error)
            }
        }
    }

    fn run_pass(&self) -> Result<SyncReport> {
        if !self.source.is_dir() {
            return Err(Error::SourceMissing {
                path: self.source.clone(),
            });
        }
        self.check_roots()?;

        self.emit(SyncEvent::Started {
            source: &self.source,
            target: &self.target,
            dry_run: self.options.dry_run,
        });

        let mut report = SyncReport::new(self.options.dry_run);
        let mut pending = vec![RelativePath::root()];

        while let Some(dir) = pending.pop() {
            let subdirs = self.sync_directory(&dir, &mut report)?;
            // Reversed so subdirectories are visited in name order
            pending.extend(subdirs.into_iter().rev());
        }

        Ok(report)
    }

    /// Reject roots where one contains the other.
    fn check_roots(&self) -> Result<()> {
        let resolve_error = |path: &Path, source| Error::ResolveRoot {
            path: path.to_path_buf(),
            source,
        };
        let target_in_source = mirror_fs::is_within(&self.target, &self.source)
            .map_err(|e| resolve_error(&self.target, e))?;
        let source_in_target = self.target.exists()
            && mirror_fs::is_within(&self.source, &self.target)
                .map_err(|e| resolve_error(&self.source, e))?;

        if target_in_source || source_in_target {
            return Err(Error::OverlappingRoots {
                source_root: self.source.clone(),
                target: self.target.clone(),
            });
        }
        Ok(())
    }

    /// Mirror one directory level and return its subdirectories.
    fn sync_directory(&self, dir: &RelativePath, report: &mut SyncReport) -> Result<Vec<RelativePath>> {
        let source_dir = dir.resolve(&self.source);
        let target_dir = dir.resolve(&self.target);

        let source = DirListing::read(&source_dir)?;
        self.ensure_directory(dir, &target_dir, report)?;
        // Only false in a dry run, where the directory was never created
        let target_present = target_dir.is_dir();

        for (name, metadata) in &source.files {
            self.sync_file(&dir.join(name), metadata, target_present, report)?;
        }

        for name in source.specials() {
            report.stats.entries_skipped += 1;
            self.emit(SyncEvent::EntrySkipped(&dir.join(name)));
        }

        self.remove_stale(dir, &target_dir, &source, report)?;

        Ok(source.dirs.iter().map(|name| dir.join(name)).collect())
    }

    fn ensure_directory(&self, dir: &RelativePath, target_dir: &Path, report: &mut SyncReport) -> Result<()> {
        if target_dir.is_dir() {
            return Ok(());
        }
        if !self.options.dry_run {
            io::ensure_dir(target_dir)?;
        }
        report.stats.directories_created += 1;
        self.apply(Action::CreateDirectory(dir));
        Ok(())
    }

    fn sync_file(
        &self,
        path: &RelativePath,
        source_meta: &Metadata,
        target_present: bool,
        report: &mut SyncReport,
    ) -> Result<()> {
        let source_file = path.resolve(&self.source);
        let target_file = path.resolve(&self.target);

        if !target_present {
            return self.copy_file(path, &source_file, &target_file, source_meta, CopyReason::Missing, report);
        }

        let reason = match fs::symlink_metadata(&target_file) {
            Err(e) if e.kind() == IoErrorKind::NotFound => Some(CopyReason::Missing),
            Err(e) => return Err(mirror_fs::Error::io("stat", &target_file, e).into()),
            Ok(target_meta) if target_meta.is_dir() => {
                if !self.options.prune_directories {
                    return Err(Error::TypeConflict { path: target_file });
                }
                self.remove_directory(path, &target_file, report)?;
                Some(CopyReason::Replaced)
            }
            Ok(target_meta) if target_meta.is_file() => {
                if contents_match(&source_file, source_meta, &target_file, &target_meta)? {
                    None
                } else {
                    Some(CopyReason::Changed)
                }
            }
            // Symlink or special file: replaced, never followed
            Ok(_) => Some(CopyReason::Replaced),
        };

        let Some(reason) = reason else {
            report.stats.files_unchanged += 1;
            self.emit(SyncEvent::FileUnchanged(path));
            return Ok(());
        };

        self.copy_file(path, &source_file, &target_file, source_meta, reason, report)
    }

    fn copy_file(
        &self,
        path: &RelativePath,
        source_file: &Path,
        target_file: &Path,
        source_meta: &Metadata,
        reason: CopyReason,
        report: &mut SyncReport,
    ) -> Result<()> {
        let bytes = if self.options.dry_run {
            source_meta.len()
        } else {
            io::copy_file_atomic(source_file, target_file, self.options.copy_options())?
        };
        report.stats.files_copied += 1;
        report.stats.bytes_copied += bytes;
        self.apply(Action::CopyFile { path, reason, bytes });
        Ok(())
    }

    /// Remove target entries of `dir` with no source counterpart.
    ///
    /// Files are always candidates; directories only with pruning on.
    /// Names matching a skipped source entry are left alone.
    fn remove_stale(
        &self,
        dir: &RelativePath,
        target_dir: &Path,
        source: &DirListing,
        report: &mut SyncReport,
    ) -> Result<()> {
        if !target_dir.is_dir() {
            return Ok(());
        }
        let target = DirListing::read(target_dir)?;

        for name in target.non_directories() {
            if source.has_file(name) || source.has_special(name) {
                continue;
            }
            if !self.options.dry_run {
                io::remove_file(&target_dir.join(name))?;
            }
            report.stats.files_removed += 1;
            self.apply(Action::RemoveFile(&dir.join(name)));
        }

        if self.options.prune_directories {
            for name in &target.dirs {
                // Names in source.files were replaced in sync_file
                if source.has_dir(name) || source.has_file(name) || source.has_special(name) {
                    continue;
                }
                self.remove_directory(&dir.join(name), &target_dir.join(name), report)?;
            }
        }

        Ok(())
    }

    fn remove_directory(&self, path: &RelativePath, target: &Path, report: &mut SyncReport) -> Result<()> {
        if !self.options.dry_run {
            io::remove_dir_all(target)?;
        }
        report.stats.directories_removed += 1;
        self.apply(Action::RemoveDirectory(path));
        Ok(())
    }

    fn apply(&self, action: Action<'_>) {
        self.emit(SyncEvent::Action {
            action,
            dry_run: self.options.dry_run,
        });
    }

    fn emit(&self, event: SyncEvent<'_>) {
        self.sink.record(&event);
    }
}

/// Compare two regular files by content.
///
/// A length mismatch settles it without hashing.
fn contents_match(source: &Path, source_meta: &Metadata, target: &Path, target_meta: &Metadata) -> Result<bool> {
    if source_meta.len() != target_meta.len() {
        return Ok(false);
    }
    let source_fp = Fingerprint::of_file(source)?;
    let target_fp = Fingerprint::of_file(target)?;
    tracing::trace!(%source_fp, %target_fp, "Compared fingerprints");
    Ok(source_fp == target_fp)
}
