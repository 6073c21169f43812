//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a sync pass
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source root absent or not a directory
    #[error("Source directory {path} does not exist")]
    SourceMissing { path: PathBuf },

    /// One root is the other or lies inside it
    #[error("Source {source_root} and target {target} overlap")]
    OverlappingRoots {
        source_root: PathBuf,
        target: PathBuf,
    },

    /// Roots could not be resolved for the nesting check
    #[error("Failed to resolve {path}: {source}")]
    ResolveRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file maps onto a target directory and pruning is off
    #[error("Cannot replace directory {path} with a file while stale directories are kept")]
    TypeConflict { path: PathBuf },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceMissing,
    InvalidRoots,
    TypeConflict,
    Io,
    /// Reading a file for its fingerprint failed
    Hash,
}

impl ErrorKind {
    /// Hash failures are a kind of I/O failure.
    pub fn is_io(self) -> bool {
        matches!(self, Self::Io | Self::Hash)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceMissing { .. } => ErrorKind::SourceMissing,
            Self::OverlappingRoots { .. } | Self::ResolveRoot { .. } => ErrorKind::InvalidRoots,
            Self::TypeConflict { .. } => ErrorKind::TypeConflict,
            Self::Fs(mirror_fs::Error::Fingerprint { .. }) => ErrorKind::Hash,
            Self::Fs(_) => ErrorKind::Io,
        }
    }
}
