//! Property tests over randomly generated source and target trees

use mirror_core::{MemorySink, SyncOptions, Synchronizer};
use mirror_test_utils::{TestTree, TreeEntry};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

type Layout = Vec<(Vec<&'static str>, Vec<u8>)>;

/// Source layouts keep directory and file names disjoint.
fn source_layout() -> impl Strategy<Value = Layout> {
    let dirs = prop::sample::select(vec!["d_a", "d_b", "d_c"]);
    let files = prop::sample::select(vec!["f_1", "f_2", "f_3", "f_4"]);
    let entry = (
        prop::collection::vec(dirs, 0..3),
        files,
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(mut path, file, content)| {
            path.push(file);
            (path, content)
        });
    prop::collection::vec(entry, 0..12)
}

/// Target layouts reuse source names in either role, forcing type swaps.
fn target_layout() -> impl Strategy<Value = Layout> {
    let names = prop::sample::select(vec!["d_a", "f_1", "f_2", "extra"]);
    let entry = (
        prop::collection::vec(names.clone(), 0..3),
        names,
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(mut path, file, content)| {
            path.push(file);
            (path, content)
        });
    prop::collection::vec(entry, 0..12)
}

/// Write `layout`, skipping entries that would collide with an earlier one.
fn build(tree: &TestTree, layout: &Layout) {
    for (components, content) in layout {
        let blocked = (1..components.len())
            .any(|end| tree.path(&components[..end].join("/")).is_file());
        let rel = components.join("/");
        if blocked || tree.path(&rel).is_dir() {
            continue;
        }
        tree.write(&rel, content);
    }
}

fn contents(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
    mirror_test_utils::snapshot_dir(root)
        .into_iter()
        .map(|(rel, entry)| match entry {
            TreeEntry::File { content, .. } => (rel, Some(content)),
            _ => (rel, None),
        })
        .collect()
}

fn run(source: &Path, target: &Path) -> mirror_core::SyncReport {
    Synchronizer::new(source, target)
        .with_options(SyncOptions::default())
        .with_sink(Arc::new(MemorySink::new()))
        .run()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_target_matches_source_after_pass(src in source_layout(), dst in target_layout()) {
        let source = TestTree::new();
        build(&source, &src);
        let target = TestTree::new();
        build(&target, &dst);

        run(source.root(), target.root());

        prop_assert_eq!(contents(target.root()), contents(source.root()));
    }

    #[test]
    fn prop_second_pass_changes_nothing(src in source_layout(), dst in target_layout()) {
        let source = TestTree::new();
        build(&source, &src);
        let target = TestTree::new();
        build(&target, &dst);

        run(source.root(), target.root());
        let after_first = target.snapshot();
        let second = run(source.root(), target.root());

        prop_assert!(second.is_noop());
        prop_assert_eq!(target.snapshot(), after_first);
    }

    #[test]
    fn prop_source_is_never_modified(src in source_layout(), dst in target_layout()) {
        let source = TestTree::new();
        build(&source, &src);
        let before = source.snapshot();
        let target = TestTree::new();
        build(&target, &dst);

        run(source.root(), target.root());

        prop_assert_eq!(source.snapshot(), before);
    }

    #[test]
    fn prop_dry_run_never_modifies_target(src in source_layout(), dst in target_layout()) {
        let source = TestTree::new();
        build(&source, &src);
        let target = TestTree::new();
        build(&target, &dst);
        let before = target.snapshot();

        let report = Synchronizer::new(source.root(), target.root())
            .with_options(SyncOptions { dry_run: true, ..SyncOptions::default() })
            .with_sink(Arc::new(MemorySink::new()))
            .run()
            .unwrap();

        prop_assert!(report.dry_run);
        prop_assert_eq!(target.snapshot(), before);
    }
}
