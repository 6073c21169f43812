//! Tree-relative paths
//!
//! A [`RelativePath`] names an entry by its position below a tree root, so
//! the same value resolves to the matching location under the source and
//! the target root.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Path of an entry relative to a tree root.
///
/// Stored as a list of plain name components; the root itself has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath {
    components: Vec<OsString>,
}

impl RelativePath {
    /// The tree root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this is the tree root.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Child entry with the given name.
    pub fn join(&self, name: impl AsRef<OsStr>) -> Self {
        let mut components = self.components.clone();
        components.push(name.as_ref().to_os_string());
        Self { components }
    }

    /// Resolve against a tree root.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.components);
        path
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", component.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Check whether `inner` is `outer` or lies below it.
///
/// Both paths are canonicalized. `inner` need not exist: its nearest
/// existing ancestor is canonicalized and the missing tail re-appended.
pub fn is_within(inner: &Path, outer: &Path) -> std::io::Result<bool> {
    let outer = dunce::canonicalize(outer)?;
    let inner = canonicalize_lenient(inner)?;
    Ok(inner.starts_with(&outer))
}

fn canonicalize_lenient(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        match dunce::canonicalize(existing) {
            Ok(mut canonical) => {
                canonical.extend(missing.iter().rev());
                return Ok(canonical);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
    }
}
