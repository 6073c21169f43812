//! Atomic file copies and context-carrying filesystem helpers

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use filetime::FileTime;

use crate::{Error, Result};

/// What to carry over besides file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Copy the source's modification time (best effort).
    pub preserve_times: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            preserve_times: true,
        }
    }
}

/// Name prefix of the temp files staged beside a destination.
///
/// Temp names never embed the destination's name, so they stay short even
/// when that name is close to the filesystem limit.
const TEMP_PREFIX: &str = ".dirmirror.";

/// Copy `src` over `dest` atomically, preserving permission bits.
///
/// Contents are written to a temp file beside `dest`, which receives the
/// source permissions (and mtime, if requested) and is then renamed over
/// `dest`. A read-only `dest` is therefore replaceable, and a failed copy
/// leaves `dest` untouched. Returns the number of bytes copied.
pub fn copy_file_atomic(src: &Path, dest: &Path, options: CopyOptions) -> Result<u64> {
    let mut reader = File::open(src).map_err(|e| Error::io("open", src, e))?;
    let metadata = reader.metadata().map_err(|e| Error::io("stat", src, e))?;

    // Same directory so the final rename stays on one filesystem
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Dropping the handle on any error path deletes the temp file
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::io("create temp file in", parent, e))?;

    let bytes = io::copy(&mut reader, temp.as_file_mut()).map_err(|e| Error::copy(src, dest, e))?;
    temp.as_file_mut()
        .flush()
        .map_err(|e| Error::copy(src, dest, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::io("flush", temp.path(), e))?;

    if options.preserve_times {
        let mtime = FileTime::from_last_modification_time(&metadata);
        if let Err(e) = filetime::set_file_mtime(temp.path(), mtime) {
            tracing::warn!(path = %dest.display(), error = %e, "Could not preserve modification time");
        }
    }

    temp.as_file()
        .set_permissions(metadata.permissions())
        .map_err(|e| Error::io("set permissions on", temp.path(), e))?;

    temp.persist(dest)
        .map_err(|e| Error::io("replace", dest, e.error))?;

    Ok(bytes)
}

/// Create a directory and any missing ancestors.
///
/// Returns `true` if the directory did not exist before.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| Error::io("create directory", path, e))?;
    Ok(true)
}

/// Remove a single file or symlink.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io("remove", path, e))
}

/// Remove a directory and everything below it.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::io("remove directory", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_works_for_names_at_the_length_limit() {
        let dir = tempfile::tempdir().unwrap();
        let name = "n".repeat(255);
        let src = dir.path().join("src");
        std::fs::write(&src, "long").unwrap();

        copy_file_atomic(&src, &dir.path().join(&name), CopyOptions::default()).unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join(&name)).unwrap(), "long");
    }

    #[test]
    fn ensure_dir_reports_creation_once() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        assert!(ensure_dir(&nested).unwrap());
        assert!(!ensure_dir(&nested).unwrap());
        assert!(nested.is_dir());
    }
}
