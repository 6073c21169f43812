//! Options for a sync pass

use mirror_fs::CopyOptions;
use serde::{Deserialize, Serialize};

/// Options for a sync pass.
///
/// Deserializable so they can be read from a config file; missing keys take
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncOptions {
    /// If true, decide and report every action without modifying the
    /// target tree.
    pub dry_run: bool,
    /// Remove target subdirectories that have no counterpart in the source
    /// directory. When false only stale files are removed.
    pub prune_directories: bool,
    /// Copy modification times along with contents (best effort).
    pub preserve_times: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            prune_directories: true,
            preserve_times: true,
        }
    }
}

impl SyncOptions {
    pub(crate) fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            preserve_times: self.preserve_times,
        }
    }
}
