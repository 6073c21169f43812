//! Multi-pass mirroring scenarios
//!
//! Each test drives a source tree through a series of edits and checks the
//! target after every pass.

use mirror_core::{MemorySink, SyncOptions, SyncReport, Synchronizer};
use mirror_fs::ConfigStore;
use mirror_test_utils::{TestTree, TreeEntry};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn pass(source: &Path, target: &Path, options: SyncOptions) -> SyncReport {
    Synchronizer::new(source, target)
        .with_options(options)
        .with_sink(Arc::new(MemorySink::new()))
        .run()
        .unwrap_or_else(|e| panic!("sync pass failed: {e}"))
}

/// Relative path to file contents, with `None` for directories
fn contents(tree: &TestTree) -> BTreeMap<String, Option<Vec<u8>>> {
    tree.snapshot()
        .into_iter()
        .map(|(rel, entry)| match entry {
            TreeEntry::File { content, .. } => (rel, Some(content)),
            TreeEntry::Dir => (rel, None),
            TreeEntry::Symlink(link) => panic!("unexpected symlink {rel} -> {}", link.display()),
        })
        .collect()
}

fn assert_mirrored(source: &TestTree, target: &TestTree) {
    assert_eq!(contents(target), contents(source));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_tree_evolves_over_several_passes() {
    let source = TestTree::new();
    source.write("docs/guide.md", "# Guide");
    source.write("docs/api/index.md", "# API");
    source.write("src/main.txt", "main");
    source.mkdir("build");
    let target = TestTree::new();

    let first = pass(source.root(), target.root(), SyncOptions::default());
    assert_mirrored(&source, &target);
    assert_eq!(first.stats.files_copied, 3);

    // Edit, delete, add
    source.write("docs/guide.md", "# Guide v2");
    std::fs::remove_file(source.path("src/main.txt")).unwrap();
    source.write("src/lib.txt", "lib");
    std::fs::remove_dir_all(source.path("docs/api")).unwrap();
    source.mkdir("build/cache");

    let second = pass(source.root(), target.root(), SyncOptions::default());
    assert_mirrored(&source, &target);
    assert_eq!(second.stats.files_copied, 2);
    assert_eq!(second.stats.files_removed, 1);
    assert_eq!(second.stats.directories_removed, 1);
    assert_eq!(second.stats.directories_created, 1);

    let third = pass(source.root(), target.root(), SyncOptions::default());
    assert!(third.is_noop(), "third pass should change nothing: {third:?}");
}

#[test]
fn test_entries_swap_between_file_and_directory() {
    let source = TestTree::new();
    source.write("swap", "file first");
    source.write("other/inner.txt", "dir first");
    let target = TestTree::new();

    pass(source.root(), target.root(), SyncOptions::default());
    assert_mirrored(&source, &target);

    std::fs::remove_file(source.path("swap")).unwrap();
    source.write("swap/inner.txt", "now a dir");
    std::fs::remove_dir_all(source.path("other")).unwrap();
    source.write("other", "now a file");

    pass(source.root(), target.root(), SyncOptions::default());
    assert_mirrored(&source, &target);
}

#[test]
fn test_dry_run_plan_matches_real_pass() {
    let source = TestTree::new();
    source.write("a.txt", "a");
    source.write("deep/er/b.txt", "bb");
    let target = TestTree::new();
    target.write("a.txt", "old");
    target.write("gone.txt", "x");
    target.write("gone_dir/x.txt", "x");

    let planned = pass(
        source.root(),
        target.root(),
        SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        },
    );
    let applied = pass(source.root(), target.root(), SyncOptions::default());

    assert!(planned.dry_run);
    assert!(!applied.dry_run);
    assert_eq!(planned.stats, applied.stats);
    assert_mirrored(&source, &target);
}

#[test]
fn test_missing_target_root_is_created_with_ancestors() {
    let source = TestTree::new();
    source.write("a.txt", "a");
    source.mkdir("empty");
    let scratch = TestTree::new();
    let target = scratch.path("backups/today/mirror");

    pass(source.root(), &target, SyncOptions::default());

    assert_eq!(std::fs::read_to_string(target.join("a.txt")).unwrap(), "a");
    assert!(target.join("empty").is_dir());
}

#[test]
fn test_empty_source_empties_target() {
    let source = TestTree::new();
    let target = TestTree::new();
    target.write("a.txt", "a");
    target.write("d/b.txt", "b");

    pass(source.root(), target.root(), SyncOptions::default());

    assert!(target.snapshot().is_empty());
    target.assert_dir("");
}

// =============================================================================
// Options from config files
// =============================================================================

#[test]
fn test_options_loaded_from_each_config_format() {
    let configs = TestTree::new();
    configs.write("opts.toml", "dry_run = true\n");
    configs.write("opts.json", r#"{ "dry_run": true }"#);
    configs.write("opts.yaml", "dry_run: true\n");
    let store = ConfigStore::new();

    for name in ["opts.toml", "opts.json", "opts.yaml"] {
        let options: SyncOptions = store.load(&configs.path(name)).unwrap();
        assert!(options.dry_run, "{name} did not enable dry_run");
        assert!(options.prune_directories, "{name} lost the default");

        let source = TestTree::new();
        source.write("a.txt", "a");
        let target = TestTree::new();
        let report = pass(source.root(), target.root(), options);

        assert_eq!(report.stats.files_copied, 1);
        target.assert_missing("a.txt");
    }
}

#[test]
fn test_kept_stale_directories_lose_only_their_files() {
    let source = TestTree::new();
    source.write("keep/a.txt", "a");
    let target = TestTree::new();
    target.write("keep/stale.txt", "x");
    target.write("orphan/file.txt", "y");
    let options = SyncOptions {
        prune_directories: false,
        ..SyncOptions::default()
    };

    pass(source.root(), target.root(), options);

    target.assert_file("keep/a.txt", "a");
    target.assert_missing("keep/stale.txt");
    // Never visited, since the walk follows the source tree
    target.assert_file("orphan/file.txt", "y");
}
