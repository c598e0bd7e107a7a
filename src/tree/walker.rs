//! Filesystem walker selecting the files of a model tree

use crate::error::DigestError;
use crate::options::Options;
use crate::tree::ignore::IgnoreSet;
use crate::tree::path::{self, RelPath};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, instrument, trace};
use walkdir::{DirEntry, WalkDir};

/// Outcome of visiting one filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep walking; directories are descended into
    Continue,
    /// The entry is a regular file that belongs in the manifest
    Select,
    /// The entry is an ignored directory; none of its contents are visited
    SkipSubtree,
}

/// Files selected from a model tree
#[derive(Debug, Clone)]
pub struct Selection {
    /// Canonical absolute model root
    pub root: PathBuf,
    /// Absolute paths of the selected regular files, in traversal order
    pub files: Vec<PathBuf>,
}

/// Walker over a single model tree
pub struct Walker {
    root: PathBuf,
    ignore: IgnoreSet,
    allow_symlinks: bool,
}

impl Walker {
    /// Resolve `root` and prepare the ignore list
    ///
    /// Fails when the root cannot be canonicalized or is not a directory.
    pub fn new(root: &Path, options: &Options) -> Result<Self, DigestError> {
        let root = path::canonicalize_root(root)?;
        let metadata = std::fs::metadata(&root).map_err(|source| DigestError::PathResolution {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(DigestError::NotADirectory(root));
        }

        let ignore = IgnoreSet::new(&root, options);
        Ok(Self {
            root,
            ignore,
            allow_symlinks: options.allow_symlinks,
        })
    }

    /// Walk the tree and collect every regular file that is not ignored
    ///
    /// The whole walk aborts on the first I/O error or disallowed symlink.
    /// Errors on ignored entries, such as a dangling link followed under
    /// `allow_symlinks`, are dropped along with the entry.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn walk(&self) -> Result<Selection, DigestError> {
        let start = Instant::now();
        let mut files = Vec::new();

        let mut entries = WalkDir::new(&self.root)
            .follow_links(self.allow_symlinks)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.path().is_some_and(|path| self.is_ignored_path(path)) {
                        debug!(path = ?err.path(), "Skipping unreadable ignored entry: {}", err);
                        continue;
                    }
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    error!(path = %path.display(), "Filesystem walk failed: {}", err);
                    return Err(DigestError::Walk {
                        path,
                        source: err.into(),
                    });
                }
            };

            match self.visit(&entry)? {
                Visit::Continue => {}
                Visit::Select => files.push(entry.into_path()),
                Visit::SkipSubtree => entries.skip_current_dir(),
            }
        }

        debug!(
            file_count = files.len(),
            duration_ms = start.elapsed().as_millis(),
            "Selected model files"
        );

        Ok(Selection {
            root: self.root.clone(),
            files,
        })
    }

    /// Decide what to do with one entry
    pub fn visit(&self, entry: &DirEntry) -> Result<Visit, DigestError> {
        let path = entry.path();

        if entry.path_is_symlink() && !self.allow_symlinks {
            error!(path = %path.display(), "Symlink encountered with symlinks disallowed");
            return Err(DigestError::SymlinkNotAllowed(path.to_path_buf()));
        }

        let file_type = entry.file_type();
        if !file_type.is_dir() && !file_type.is_file() {
            trace!(path = %path.display(), "Skipping special file");
            return Ok(Visit::Continue);
        }

        let rel = self.relative(path)?;
        let ignored = self.ignore.is_ignored(&rel);

        if file_type.is_dir() {
            if ignored {
                debug!(path = %rel, "Pruning ignored directory");
                return Ok(Visit::SkipSubtree);
            }
            return Ok(Visit::Continue);
        }

        if ignored {
            trace!(path = %rel, "Ignoring file");
            return Ok(Visit::Continue);
        }
        Ok(Visit::Select)
    }

    fn relative(&self, path: &Path) -> Result<RelPath, DigestError> {
        RelPath::between(&self.root, path).ok_or_else(|| {
            let non_utf8 = path
                .strip_prefix(&self.root)
                .is_ok_and(|rel| rel.to_str().is_none());
            if non_utf8 {
                error!(path = %path.display(), "File name is not valid UTF-8");
                DigestError::NonUtf8Name(path.to_path_buf())
            } else {
                DigestError::InvalidPath(path.to_path_buf())
            }
        })
    }

    fn is_ignored_path(&self, path: &Path) -> bool {
        RelPath::between(&self.root, path).is_some_and(|rel| self.ignore.is_ignored(&rel))
    }
}

/// Select the files of the model tree at `root`
pub fn select_files(root: &Path, options: &Options) -> Result<Selection, DigestError> {
    Walker::new(root, options)?.walk()
}
