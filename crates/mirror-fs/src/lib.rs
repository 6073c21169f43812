//! Filesystem primitives for dirmirror
//!
//! Provides content fingerprints, atomic file copies, tree-relative paths
//! and format-agnostic config loading.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use fingerprint::Fingerprint;
pub use io::CopyOptions;
pub use path::{RelativePath, is_within};
