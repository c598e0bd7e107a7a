//! Serialization options
//!
//! Controls which files of a model tree take part in the manifest.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Version-control artifacts skipped when `ignore_git_paths` is set.
pub const GIT_PATHS: &[&str] = &[".git", ".gitignore", ".gitattributes", ".github"];

/// Options for serializing a model directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Paths to leave out of the manifest, absolute or relative to the model root.
    /// Ignoring a directory ignores everything beneath it.
    #[serde(default)]
    pub ignore_paths: Vec<PathBuf>,

    /// Skip `.git`, `.gitignore`, `.gitattributes` and `.github` (default: true)
    #[serde(default = "default_true")]
    pub ignore_git_paths: bool,

    /// Follow symbolic links instead of failing on them (default: false)
    #[serde(default)]
    pub allow_symlinks: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignore_paths: Vec::new(),
            ignore_git_paths: true,
            allow_symlinks: false,
        }
    }
}

impl Options {
    /// Add a path to ignore
    pub fn ignore_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignore_paths.push(path.into());
        self
    }

    pub fn with_ignore_git_paths(mut self, ignore: bool) -> Self {
        self.ignore_git_paths = ignore;
        self
    }

    pub fn with_allow_symlinks(mut self, allow: bool) -> Self {
        self.allow_symlinks = allow;
        self
    }
}
