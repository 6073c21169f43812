//! [`TestTree`] builder for mirroring scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// One entry of a [`TestTree::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    Dir,
    File {
        content: Vec<u8>,
        /// Permission bits (`0o777` mask) on unix, `0` elsewhere
        mode: u32,
        modified: SystemTime,
    },
    Symlink(PathBuf),
}

/// A temporary directory tree with helpers for setup and assertions.
///
/// Paths passed to helpers are relative to the tree root and use `/`.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write("docs/readme.txt", "hello");
/// tree.mkdir("empty/nested");
/// tree.assert_file("docs/readme.txt", "hello");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("TestTree::new: failed to create temp dir"),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` below the root. Need not exist.
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|c| !c.is_empty())
            .fold(self.root().to_path_buf(), |acc, c| acc.join(c))
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
    }

    /// Create a directory and its parents.
    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.path(rel)).unwrap();
    }

    pub fn read(&self, rel: &str) -> Vec<u8> {
        let path = self.path(rel);
        fs::read(&path).unwrap_or_else(|e| panic!("Could not read {}: {e}", path.display()))
    }

    pub fn mtime(&self, rel: &str) -> SystemTime {
        fs::metadata(self.path(rel)).unwrap().modified().unwrap()
    }

    /// Set the permission bits of an entry.
    #[cfg(unix)]
    pub fn set_mode(&self, rel: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(self.path(rel), fs::Permissions::from_mode(mode)).unwrap();
    }

    /// Permission bits of an entry.
    #[cfg(unix)]
    pub fn mode(&self, rel: &str) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(self.path(rel)).unwrap().permissions().mode() & 0o777
    }

    /// Assert that `rel` is a file with exactly `content`.
    ///
    /// # Panics
    /// Panics if the file is missing or its content differs.
    pub fn assert_file(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.path(rel);
        assert!(path.is_file(), "Expected file to exist: {}", path.display());
        let actual = self.read(rel);
        assert!(
            actual == content.as_ref(),
            "File {} has unexpected content.\nExpected: {:?}\nActual: {:?}",
            path.display(),
            String::from_utf8_lossy(content.as_ref()),
            String::from_utf8_lossy(&actual)
        );
    }

    /// Assert that `rel` is a directory.
    pub fn assert_dir(&self, rel: &str) {
        let path = self.path(rel);
        assert!(path.is_dir(), "Expected directory to exist: {}", path.display());
    }

    /// Assert that nothing exists at `rel`.
    pub fn assert_missing(&self, rel: &str) {
        let path = self.path(rel);
        assert!(
            fs::symlink_metadata(&path).is_err(),
            "Expected path NOT to exist: {}",
            path.display()
        );
    }

    /// Every entry below the root keyed by `/`-separated relative path.
    ///
    /// Symlinks are recorded, not followed.
    pub fn snapshot(&self) -> BTreeMap<String, TreeEntry> {
        snapshot_dir(self.root())
    }
}

/// Snapshot of any directory, in the format of [`TestTree::snapshot`].
pub fn snapshot_dir(root: &Path) -> BTreeMap<String, TreeEntry> {
    let mut entries = BTreeMap::new();
    let mut pending = vec![(root.to_path_buf(), String::new())];

    while let Some((dir, prefix)) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let entry = entry.unwrap();
            let name = entry.file_name().to_string_lossy().into_owned();
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            let meta = fs::symlink_metadata(entry.path()).unwrap();

            let value = if meta.is_dir() {
                pending.push((entry.path(), key.clone()));
                TreeEntry::Dir
            } else if meta.file_type().is_symlink() {
                TreeEntry::Symlink(fs::read_link(entry.path()).unwrap())
            } else {
                TreeEntry::File {
                    content: fs::read(entry.path()).unwrap(),
                    mode: mode_bits(&meta),
                    modified: meta.modified().unwrap(),
                }
            };
            entries.insert(key, value);
        }
    }

    entries
}

#[cfg(unix)]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn mode_bits(_meta: &fs::Metadata) -> u32 {
    0
}
