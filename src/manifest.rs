//! Model manifest
//!
//! A manifest lists every selected file of a model by root-relative name,
//! with its digests, sorted by name. The order is load-bearing: the root
//! digest folds entries in exactly this order.

use crate::error::DigestError;
use crate::hasher::{DigestMap, FileHasher, FsHasher, HashAlgorithm};
use crate::options::Options;
use crate::tree::path::{self, RelPath};
use crate::tree::walker::{Selection, Walker};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// One file of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Root-relative POSIX path
    pub name: String,
    /// Algorithm name → lowercase hex digest
    pub digest: DigestMap,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, digest: DigestMap) -> Self {
        Self {
            name: name.into(),
            digest,
        }
    }

    pub fn digest_for(&self, algorithm: HashAlgorithm) -> Option<&str> {
        self.digest.get(algorithm.name()).map(String::as_str)
    }

    pub fn sha256(&self) -> Option<&str> {
        self.digest_for(HashAlgorithm::Sha256)
    }
}

/// Serialized model: its name plus sorted file entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub model_name: String,
    pub files: Vec<FileEntry>,
}

impl Manifest {
    /// Build a manifest, sorting entries by name (byte-wise)
    pub fn new(model_name: impl Into<String>, mut files: Vec<FileEntry>) -> Self {
        files.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Self {
            model_name: model_name.into(),
            files,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.files.iter()
    }

    /// Look up an entry by relative name
    pub fn get(&self, name: &str) -> Option<&FileEntry> {
        self.files
            .binary_search_by(|entry| entry.name.as_bytes().cmp(name.as_bytes()))
            .ok()
            .map(|i| &self.files[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|entry| entry.name.as_str())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Serializes model directories into manifests
pub struct Serializer<H = FsHasher> {
    options: Options,
    hasher: H,
}

impl Serializer<FsHasher> {
    /// Serializer backed by the filesystem hasher
    pub fn new(options: Options) -> Self {
        Self::with_hasher(options, FsHasher::default())
    }
}

impl Default for Serializer<FsHasher> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<H: FileHasher> Serializer<H> {
    pub fn with_hasher(options: Options, hasher: H) -> Self {
        Self { options, hasher }
    }

    /// Walk the model at `model_path`, hash its files and build the manifest
    #[instrument(skip(self), fields(model = %model_path.display()))]
    pub fn serialize(&self, model_path: &Path) -> Result<Manifest, DigestError> {
        let start = Instant::now();
        let selection = Walker::new(model_path, &self.options)?.walk()?;
        let manifest = self.build_manifest(selection)?;

        info!(
            model = %manifest.model_name,
            file_count = manifest.len(),
            duration_ms = start.elapsed().as_millis(),
            "Serialized model"
        );
        Ok(manifest)
    }

    /// Hash a selection and attach root-relative names
    pub fn build_manifest(&self, selection: Selection) -> Result<Manifest, DigestError> {
        let Selection { root, files } = selection;

        let mut hashes = self
            .hasher
            .hash_files(&files, &[HashAlgorithm::Sha256])
            .map_err(|source| {
                error!("Hashing failed: {}", source);
                DigestError::Hashing {
                    file_count: files.len(),
                    source,
                }
            })?;

        let mut entries = Vec::with_capacity(files.len());
        for file in &files {
            let name = RelPath::between(&root, file)
                .filter(|rel| !rel.is_root())
                .ok_or_else(|| DigestError::InvalidPath(file.clone()))?;
            let digests = hashes
                .remove(file)
                .ok_or_else(|| DigestError::MissingHash { path: file.clone() })?;
            let sha256 = digests
                .get(HashAlgorithm::Sha256.name())
                .cloned()
                .ok_or_else(|| DigestError::MissingDigest {
                    name: name.to_string(),
                    algorithm: HashAlgorithm::Sha256.name().to_string(),
                })?;

            let mut digest = DigestMap::new();
            digest.insert(HashAlgorithm::Sha256.name().to_string(), sha256);
            entries.push(FileEntry::new(name.into_string(), digest));
        }

        let manifest = Manifest::new(path::model_name(&root), entries);
        debug!(entry_count = manifest.len(), "Built manifest");
        Ok(manifest)
    }
}
