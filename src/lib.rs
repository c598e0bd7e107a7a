//! modeldigest: reproducible model directory digests
//!
//! Selects the regular files of a model directory, hashes each with SHA-256,
//! sorts them by root-relative path and folds the raw hashes into a single
//! root digest compatible with the `model_signing` library.
//!
//! ```no_run
//! use modeldigest::{compute_digest, Options};
//! use std::path::Path;
//!
//! let digest = compute_digest(Path::new("models/bert"), &Options::default())?;
//! assert!(digest.starts_with("sha256:"));
//! # Ok::<(), modeldigest::DigestError>(())
//! ```

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod manifest;
pub mod options;
pub mod tree;

pub use digest::{compute_digest, compute_root_digest, ROOT_DIGEST_PREFIX};
pub use error::{DigestError, HashError};
pub use hasher::{FileHasher, FsHasher, HashAlgorithm};
pub use manifest::{FileEntry, Manifest, Serializer};
pub use options::Options;
