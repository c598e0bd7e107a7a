//! Per-file content hashing
//!
//! The manifest builder only depends on the [`FileHasher`] capability: hash a
//! batch of files with a set of algorithms and return every digest as
//! lowercase hex, keyed by path. [`FsHasher`] is the filesystem-backed
//! implementation; it hashes files in parallel on the rayon pool and streams
//! each file once through every requested algorithm.

use crate::error::HashError;
use rayon::prelude::*;
use sha2::{Digest, Sha256, Sha512};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Algorithm name → lowercase hex digest
pub type DigestMap = BTreeMap<String, String>;

/// Absolute file path → digests of that file
pub type HashResults = HashMap<PathBuf, DigestMap>;

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Supported content hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Canonical lowercase name, used as the key in a [`DigestMap`]
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes
    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(format!("Unsupported hash algorithm: {}", other)),
        }
    }
}

/// Capability to hash a batch of files
///
/// Implementations may work in parallel but must return a complete result
/// for every input path, or an error.
pub trait FileHasher {
    fn hash_files(
        &self,
        paths: &[PathBuf],
        algorithms: &[HashAlgorithm],
    ) -> Result<HashResults, HashError>;
}

enum Accumulator {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Accumulator {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Accumulator::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Accumulator::Sha512(Sha512::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Accumulator::Sha256(h) => h.update(data),
            Accumulator::Sha512(h) => h.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Accumulator::Sha256(h) => hex::encode(h.finalize()),
            Accumulator::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// Hash an in-memory buffer, returning lowercase hex
pub fn hash_bytes(algorithm: HashAlgorithm, data: &[u8]) -> String {
    let mut acc = Accumulator::new(algorithm);
    acc.update(data);
    acc.finalize_hex()
}

/// Filesystem-backed [`FileHasher`]
#[derive(Debug, Clone)]
pub struct FsHasher {
    buffer_size: usize,
}

impl Default for FsHasher {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl FsHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read buffer size per file (minimum 1 byte)
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Hash one file with every algorithm in a single read pass
    pub fn hash_file(
        &self,
        path: &Path,
        algorithms: &[HashAlgorithm],
    ) -> Result<DigestMap, HashError> {
        let io_err = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut accumulators: Vec<(HashAlgorithm, Accumulator)> = algorithms
            .iter()
            .map(|alg| (*alg, Accumulator::new(*alg)))
            .collect();

        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_err(e)),
            };
            for (_, acc) in accumulators.iter_mut() {
                acc.update(&buffer[..read]);
            }
        }

        Ok(accumulators
            .into_iter()
            .map(|(alg, acc)| (alg.name().to_string(), acc.finalize_hex()))
            .collect())
    }
}

impl FileHasher for FsHasher {
    #[instrument(skip(self, paths), fields(file_count = paths.len()))]
    fn hash_files(
        &self,
        paths: &[PathBuf],
        algorithms: &[HashAlgorithm],
    ) -> Result<HashResults, HashError> {
        let mut algorithms = algorithms.to_vec();
        algorithms.sort();
        algorithms.dedup();

        let results: HashResults = paths
            .par_iter()
            .map(|path| {
                self.hash_file(path, &algorithms)
                    .map(|digests| (path.clone(), digests))
            })
            .collect::<Result<_, HashError>>()?;

        debug!(hashed = results.len(), "Hashed files");
        Ok(results)
    }
}
