//! Error types for model digest computation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a per-file hashing capability
#[derive(Debug, Error)]
pub enum HashError {
    #[error("Failed to hash {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while selecting, hashing, or folding a model tree.
///
/// Every variant is fatal: the pipeline never returns a partial manifest.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Failed to resolve model path {path:?}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model path is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk directory at {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Symlink not allowed: {0:?} (enable allow_symlinks to follow links)")]
    SymlinkNotAllowed(PathBuf),

    #[error("Failed to hash {file_count} files: {source}")]
    Hashing {
        file_count: usize,
        #[source]
        source: HashError,
    },

    #[error("Hasher returned no result for {path:?}")]
    MissingHash { path: PathBuf },

    #[error("Selected file is outside the model root: {0:?}")]
    InvalidPath(PathBuf),

    #[error("File name is not valid UTF-8: {0:?}")]
    NonUtf8Name(PathBuf),

    #[error("{algorithm} digest not found for {name}")]
    MissingDigest { name: String, algorithm: String },

    #[error("Failed to decode {algorithm} digest for {name}: {source}")]
    MalformedDigest {
        name: String,
        algorithm: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("{algorithm} digest for {name} is {actual} bytes, expected {expected}")]
    DigestLength {
        name: String,
        algorithm: String,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised by the configuration and logging layer of the CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
