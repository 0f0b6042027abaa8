//! Project-root path resolution
//!
//! Request paths (memory file, source directory, report output) may be
//! relative. They resolve against the project root the server was started
//! with. Resolution is purely lexical: nothing here touches the filesystem.

use std::path::{Path, PathBuf};

/// Resolve `path` against `root`
///
/// Absolute paths are returned unchanged.
#[inline]
#[must_use]
pub fn resolve(path: impl AsRef<Path>, root: &Path) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Directory that relative request paths resolve against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectRoot(PathBuf);

impl ProjectRoot {
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    /// Root at the process working directory
    ///
    /// # Errors
    /// Returns the I/O error if the working directory cannot be read.
    pub fn current_dir() -> std::io::Result<Self> {
        std::env::current_dir().map(Self)
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve(path, &self.0)
    }
}

impl AsRef<Path> for ProjectRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_joins_root() {
        let root = ProjectRoot::new("/srv/insight");
        assert_eq!(
            root.resolve("data/domain_memory.json"),
            PathBuf::from("/srv/insight/data/domain_memory.json")
        );
    }

    #[test]
    fn absolute_path_passes_through() {
        let root = ProjectRoot::new("/srv/insight");
        let absolute = std::env::temp_dir().join("report.md");
        assert_eq!(root.resolve(&absolute), absolute);
    }

    #[test]
    fn resolution_does_not_require_existence() {
        let root = ProjectRoot::new("/definitely/not/here");
        let resolved = resolve("datasets/processed", root.path());
        assert!(!resolved.exists());
        assert!(resolved.ends_with("datasets/processed"));
    }

    #[test]
    fn parent_segments_are_kept_verbatim() {
        let resolved = resolve("../shared/memory.json", Path::new("/srv/insight"));
        assert_eq!(resolved, PathBuf::from("/srv/insight/../shared/memory.json"));
    }
}
