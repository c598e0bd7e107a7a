//! Root digest computation
//!
//! The root digest is `SHA256(h1 || h2 || ... || hN)` where each `hi` is the
//! raw (hex-decoded) SHA-256 digest of the i-th manifest entry, entries taken
//! in manifest order. This matches the digest signed by `model_signing`.

use crate::error::DigestError;
use crate::hasher::HashAlgorithm;
use crate::manifest::{Manifest, Serializer};
use crate::options::Options;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, instrument};

/// Algorithm the root digest is computed with
pub const ROOT_DIGEST_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

/// Prefix of the textual digest returned by [`compute_digest`]
pub const ROOT_DIGEST_PREFIX: &str = "sha256:";

/// Fold the manifest's file digests into one lowercase hex root digest
///
/// Fails if an entry has no SHA-256 digest, its hex does not decode, or it
/// decodes to the wrong number of bytes.
#[instrument(skip(manifest), fields(model = %manifest.model_name, file_count = manifest.len()))]
pub fn compute_root_digest(manifest: &Manifest) -> Result<String, DigestError> {
    let algorithm = ROOT_DIGEST_ALGORITHM.name();
    let mut hasher = Sha256::new();

    for entry in manifest {
        let hex_digest = entry
            .digest
            .get(algorithm)
            .ok_or_else(|| DigestError::MissingDigest {
                name: entry.name.clone(),
                algorithm: algorithm.to_string(),
            })?;
        let raw = hex::decode(hex_digest).map_err(|source| DigestError::MalformedDigest {
            name: entry.name.clone(),
            algorithm: algorithm.to_string(),
            source,
        })?;
        if raw.len() != ROOT_DIGEST_ALGORITHM.output_len() {
            return Err(DigestError::DigestLength {
                name: entry.name.clone(),
                algorithm: algorithm.to_string(),
                expected: ROOT_DIGEST_ALGORITHM.output_len(),
                actual: raw.len(),
            });
        }
        hasher.update(&raw);
    }

    let root = hex::encode(hasher.finalize());
    debug!(root_digest = %root, "Computed root digest");
    Ok(root)
}

/// Serialize the model at `model_path` and return its digest as `sha256:<hex>`
pub fn compute_digest(model_path: &Path, options: &Options) -> Result<String, DigestError> {
    let manifest = Serializer::new(options.clone()).serialize(model_path)?;
    let root = compute_root_digest(&manifest)?;
    Ok(format!("{}{}", ROOT_DIGEST_PREFIX, root))
}
