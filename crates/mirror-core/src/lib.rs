//! One-way directory mirroring
//!
//! The [`Synchronizer`] walks a source tree top-down and makes a target tree
//! match it: missing directories are created, new or changed files (by
//! content fingerprint) are copied with their permission bits, and target
//! files with no source counterpart are removed. Each pass is stateless and
//! aborts on the first error, leaving already-applied changes in place.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mirror_core::{MemorySink, SyncOptions, Synchronizer};
//!
//! let sink = Arc::new(MemorySink::new());
//! let report = Synchronizer::new("photos", "/mnt/backup/photos")
//!     .with_options(SyncOptions::default())
//!     .with_sink(sink.clone())
//!     .run()?;
//! println!("{} files copied", report.stats.files_copied);
//! # Ok::<(), mirror_core::Error>(())
//! ```

pub mod error;
pub mod event;
pub mod listing;
pub mod options;
pub mod report;
pub mod sink;
pub mod sync;

pub use error::{Error, ErrorKind, Result};
pub use event::{CopyReason, SyncEvent};
pub use listing::DirListing;
pub use options::SyncOptions;
pub use report::{SyncReport, SyncStats};
pub use sink::{DiagnosticSink, MemorySink, RecordedEvent, TracingSink};
pub use sync::{Synchronizer, sync};
