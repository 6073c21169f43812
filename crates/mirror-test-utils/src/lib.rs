//! Shared test utilities for the dirmirror workspace.
//!
//! This crate provides directory-tree fixtures so crate test suites do not
//! each reimplement temp-dir setup and assertions. It is a dev-dependency
//! only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder and [`TreeEntry`] snapshots

pub mod tree;

pub use tree::{TestTree, TreeEntry, snapshot_dir};
