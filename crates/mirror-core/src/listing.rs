//! Single-level directory snapshots

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::path::Path;

use mirror_fs::Error;

/// Entries directly inside one directory, grouped by type.
///
/// A symlink that resolves to a regular file counts as that file. Other
/// symlinks are never followed. Names are sorted so a pass visits entries
/// in a stable order.
#[derive(Debug, Default)]
pub struct DirListing {
    /// Regular files with their metadata
    pub files: BTreeMap<OsString, Metadata>,
    pub dirs: BTreeSet<OsString>,
    /// Symlinks to directories, dangling symlinks
    pub symlinks: BTreeSet<OsString>,
    /// Sockets, FIFOs, devices
    pub other: BTreeSet<OsString>,
}

impl DirListing {
    /// Read the entries of `dir`.
    pub fn read(dir: &Path) -> mirror_fs::Result<Self> {
        let mut listing = Self::default();
        let entries = fs::read_dir(dir).map_err(|e| Error::io("read directory", dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read directory", dir, e))?;
            let name = entry.file_name();
            let file_type = entry
                .file_type()
                .map_err(|e| Error::io("stat", entry.path(), e))?;

            if file_type.is_file() {
                let metadata = entry
                    .metadata()
                    .map_err(|e| Error::io("stat", entry.path(), e))?;
                listing.files.insert(name, metadata);
            } else if file_type.is_dir() {
                listing.dirs.insert(name);
            } else if file_type.is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(metadata) if metadata.is_file() => {
                        listing.files.insert(name, metadata);
                    }
                    _ => {
                        listing.symlinks.insert(name);
                    }
                }
            } else {
                listing.other.insert(name);
            }
        }

        Ok(listing)
    }

    pub fn has_file(&self, name: &OsStr) -> bool {
        self.files.contains_key(name)
    }

    pub fn has_dir(&self, name: &OsStr) -> bool {
        self.dirs.contains(name)
    }

    /// Whether `name` is a symlink or special entry.
    pub fn has_special(&self, name: &OsStr) -> bool {
        self.symlinks.contains(name) || self.other.contains(name)
    }

    /// Names of everything that is not a directory.
    pub fn non_directories(&self) -> impl Iterator<Item = &OsString> {
        self.files.keys().chain(&self.symlinks).chain(&self.other)
    }

    /// Names of symlinks and special entries.
    pub fn specials(&self) -> impl Iterator<Item = &OsString> {
        self.symlinks.iter().chain(&self.other)
    }
}
