//! Path canonicalization and root-relative path handling
//!
//! Manifest names and ignore specifiers are compared as forward-slash
//! strings. Host separators only appear at the filesystem boundary.

use crate::error::DigestError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Resolve a model path to its absolute canonical form
///
/// Uses `dunce` so Windows paths stay free of the `\\?\` prefix.
pub fn canonicalize_root(path: &Path) -> Result<PathBuf, DigestError> {
    dunce::canonicalize(path).map_err(|source| DigestError::PathResolution {
        path: path.to_path_buf(),
        source,
    })
}

/// Display name of a model: the base name of its resolved root
pub fn model_name(root: &Path) -> String {
    match root.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => root.to_string_lossy().into_owned(),
    }
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
/// The filesystem is not consulted.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// A path relative to the model root, always `/`-separated
///
/// The empty path denotes the root itself. Never carries a leading `/`,
/// a leading `./`, or a trailing separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelPath(String);

impl RelPath {
    /// The model root itself
    pub fn root() -> Self {
        Self::default()
    }

    /// Build from a relative host path. Returns `None` for absolute paths,
    /// paths that climb above their starting point, or non-UTF-8 segments.
    pub fn from_relative(path: &Path) -> Option<Self> {
        let mut segments: Vec<String> = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_str()?.to_string()),
                Component::CurDir => {}
                Component::ParentDir => {
                    segments.pop()?;
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(Self(segments.join("/")))
    }

    /// Path of `path` relative to `root`, computed lexically.
    /// Returns `None` when `path` does not lie under `root`.
    pub fn between(root: &Path, path: &Path) -> Option<Self> {
        let normalized = normalize_lexically(path);
        let relative = normalized.strip_prefix(root).ok()?;
        Self::from_relative(relative)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` is `prefix` or lies beneath it.
    ///
    /// `a/b` is within `a`, but `a.bin` and `ab/c` are not. Every path is
    /// within the root.
    pub fn is_within(&self, prefix: &RelPath) -> bool {
        if prefix.is_root() || self.0 == prefix.0 {
            return true;
        }
        self.0
            .strip_prefix(prefix.0.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
