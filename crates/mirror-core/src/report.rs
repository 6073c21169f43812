//! Outcome of a successful sync pass

use serde::{Deserialize, Serialize};

/// Counters accumulated over a pass.
///
/// In a dry run the counters describe what would have happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    pub directories_created: u64,
    pub files_copied: u64,
    pub bytes_copied: u64,
    pub files_unchanged: u64,
    pub files_removed: u64,
    pub directories_removed: u64,
    /// Directory symlinks, dangling symlinks and special files in the source
    pub entries_skipped: u64,
}

impl SyncStats {
    /// Number of changes applied (or planned) to the target.
    pub fn changes(&self) -> u64 {
        self.directories_created + self.files_copied + self.files_removed + self.directories_removed
    }
}

/// Report from a sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether the pass ran without modifying the target
    pub dry_run: bool,
    pub stats: SyncStats,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            stats: SyncStats::default(),
        }
    }

    /// True if the target already matched the source.
    pub fn is_noop(&self) -> bool {
        self.stats.changes() == 0
    }
}
