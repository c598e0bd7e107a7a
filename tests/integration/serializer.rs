//! Integration tests for manifest construction

use crate::integration::test_utils::{model_dir, COMPLEX_MODEL};
use modeldigest::hasher::hash_bytes;
use modeldigest::{compute_root_digest, DigestError, HashAlgorithm, Options, Serializer};
use std::fs;
use tempfile::TempDir;

/// Three flat files come back sorted, one entry each
#[test]
fn test_three_file_model() {
    let temp_dir = model_dir(&[
        ("file1.txt", "test content 1\n"),
        ("file2.txt", "test content 2\n"),
        ("config.json", "config data\n"),
    ]);

    let manifest = Serializer::new(Options::default())
        .serialize(temp_dir.path())
        .unwrap();

    let names: Vec<&str> = manifest.names().collect();
    assert_eq!(names, vec!["config.json", "file1.txt", "file2.txt"]);

    for pair in manifest.files.windows(2) {
        assert!(pair[0].name.as_bytes() < pair[1].name.as_bytes());
    }

    let root = compute_root_digest(&manifest).unwrap();
    assert_eq!(root.len(), 64);
}

/// Git artifacts disappear with the default options and come back without them
#[test]
fn test_git_paths_toggle() {
    let temp_dir = model_dir(&[
        ("file.txt", "content"),
        (".git/config", "git config"),
        (".gitignore", "*.pyc"),
    ]);

    let manifest = Serializer::new(Options::default())
        .serialize(temp_dir.path())
        .unwrap();
    let names: Vec<&str> = manifest.names().collect();
    assert_eq!(names, vec!["file.txt"]);

    let options = Options::default().with_ignore_git_paths(false);
    let manifest = Serializer::new(options).serialize(temp_dir.path()).unwrap();
    let names: Vec<&str> = manifest.names().collect();
    assert_eq!(names, vec![".git/config", ".gitignore", "file.txt"]);
}

#[test]
fn test_complex_model_with_git_ignore() {
    let temp_dir = model_dir(COMPLEX_MODEL);

    let manifest = Serializer::new(Options::default())
        .serialize(temp_dir.path())
        .unwrap();

    let names: Vec<&str> = manifest.names().collect();
    assert_eq!(
        names,
        vec![
            "config.json",
            "model.bin",
            "subdir/layer1.bin",
            "subdir/layer2.bin",
            "subdir/nested/data.json",
        ]
    );
    assert_eq!(
        manifest.get("subdir/nested/data.json").unwrap().sha256().unwrap(),
        hash_bytes(HashAlgorithm::Sha256, br#"{"nested": true}"#)
    );
}

#[test]
fn test_complex_model_without_git_ignore() {
    let temp_dir = model_dir(COMPLEX_MODEL);

    let options = Options::default().with_ignore_git_paths(false);
    let manifest = Serializer::new(options).serialize(temp_dir.path()).unwrap();

    assert_eq!(manifest.len(), COMPLEX_MODEL.len());
    assert!(manifest.get(".github/workflows/ci.yml").is_some());
    assert!(manifest.get(".git/HEAD").is_some());
}

#[test]
fn test_every_included_file_appears_once() {
    let temp_dir = model_dir(&[
        ("a/b/c/d.bin", "1"),
        ("a/b/e.bin", "2"),
        ("a/f.bin", "3"),
        ("g.bin", "4"),
        ("a-b.bin", "5"),
    ]);

    let manifest = Serializer::new(Options::default())
        .serialize(temp_dir.path())
        .unwrap();

    let mut names: Vec<&str> = manifest.names().collect();
    assert_eq!(names.len(), 5);
    names.dedup();
    assert_eq!(names.len(), 5);
    assert!(names
        .iter()
        .all(|n| !n.contains('\\') && !n.starts_with('/') && !n.starts_with("./")));
    // byte order: '-' (0x2d) sorts before '/' (0x2f)
    assert_eq!(names, vec!["a-b.bin", "a/b/c/d.bin", "a/b/e.bin", "a/f.bin", "g.bin"]);
}

#[test]
fn test_empty_directory_model() {
    let temp_dir = TempDir::new().unwrap();

    let manifest = Serializer::new(Options::default())
        .serialize(temp_dir.path())
        .unwrap();
    assert!(manifest.is_empty());
    assert_eq!(
        compute_root_digest(&manifest).unwrap(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_single_file_in_directory() {
    let temp_dir = model_dir(&[("model.bin", "single model")]);

    let options = Options::default().with_ignore_git_paths(false);
    let manifest = Serializer::new(options).serialize(temp_dir.path()).unwrap();
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.files[0].name, "model.bin");
}

/// A regular file is not a model directory
#[test]
fn test_file_path_is_rejected() {
    let temp_dir = model_dir(&[("model.bin", "model data")]);

    let err = Serializer::new(Options::default())
        .serialize(&temp_dir.path().join("model.bin"))
        .unwrap_err();
    assert!(matches!(err, DigestError::NotADirectory(_)));
}

#[test]
fn test_model_name_from_relative_path() {
    let temp_dir = TempDir::new().unwrap();
    let model = temp_dir.path().join("llama");
    fs::create_dir_all(model.join("weights")).unwrap();

    let manifest = Serializer::new(Options::default())
        .serialize(&model.join("weights").join(".."))
        .unwrap();
    assert_eq!(manifest.model_name, "llama");
}

#[cfg(unix)]
#[test]
fn test_symlink_aborts_whole_serialization() {
    let temp_dir = model_dir(&[("model.bin", "weights"), ("deep/er/config.json", "{}")]);
    std::os::unix::fs::symlink(
        temp_dir.path().join("model.bin"),
        temp_dir.path().join("deep").join("er").join("alias.bin"),
    )
    .unwrap();

    let err = Serializer::new(Options::default())
        .serialize(temp_dir.path())
        .unwrap_err();
    match err {
        DigestError::SymlinkNotAllowed(path) => assert!(path.ends_with("deep/er/alias.bin")),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn test_allowed_symlink_is_hashed_as_target() {
    let temp_dir = model_dir(&[("model.bin", "weights")]);
    std::os::unix::fs::symlink(
        temp_dir.path().join("model.bin"),
        temp_dir.path().join("alias.bin"),
    )
    .unwrap();

    let options = Options::default().with_allow_symlinks(true);
    let manifest = Serializer::new(options).serialize(temp_dir.path()).unwrap();
    let names: Vec<&str> = manifest.names().collect();
    assert_eq!(names, vec!["alias.bin", "model.bin"]);
    assert_eq!(
        manifest.files[0].sha256(),
        manifest.files[1].sha256()
    );
}
