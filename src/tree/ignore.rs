//! Ignore rules for model serialization.
//!
//! Every rule is a root-relative path. A candidate is ignored when it equals
//! a rule or lies beneath it, so ignoring a directory ignores its whole
//! subtree and ignoring a file ignores only that file. Rules are plain
//! paths, not glob patterns.

use crate::options::{Options, GIT_PATHS};
use crate::tree::path::RelPath;
use std::path::Path;
use tracing::{debug, warn};

/// Effective ignore list for one model root
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    rules: Vec<RelPath>,
}

impl IgnoreSet {
    /// Build the ignore list for `root` (already canonical) from the caller's
    /// specifiers plus the git artifacts when `ignore_git_paths` is set.
    pub fn new(root: &Path, options: &Options) -> Self {
        let mut set = Self::from_specifiers(root, &options.ignore_paths);
        if options.ignore_git_paths {
            set.rules
                .extend(GIT_PATHS.iter().filter_map(|p| RelPath::from_relative(Path::new(p))));
        }
        debug!(rule_count = set.rules.len(), "Built ignore list");
        set
    }

    /// Resolve specifiers against `root`. Absolute specifiers outside the
    /// root never match and are dropped.
    pub fn from_specifiers<P: AsRef<Path>>(root: &Path, specifiers: &[P]) -> Self {
        let rules = specifiers
            .iter()
            .filter_map(|specifier| {
                let specifier = specifier.as_ref();
                let resolved = resolve_specifier(root, specifier);
                if resolved.is_none() {
                    warn!(
                        specifier = %specifier.display(),
                        root = %root.display(),
                        "Ignore path lies outside the model root, skipping"
                    );
                }
                resolved
            })
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[RelPath] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_ignored(&self, candidate: &RelPath) -> bool {
        self.rules.iter().any(|rule| candidate.is_within(rule))
    }
}

fn resolve_specifier(root: &Path, specifier: &Path) -> Option<RelPath> {
    if specifier.as_os_str().is_empty() {
        return None;
    }
    if !specifier.is_absolute() {
        return RelPath::from_relative(specifier);
    }
    // The root is canonical; an absolute specifier spelled through a symlinked
    // ancestor only lines up after resolving it too.
    RelPath::between(root, specifier).or_else(|| {
        let canonical = dunce::canonicalize(specifier).ok()?;
        RelPath::between(root, &canonical)
    })
}
