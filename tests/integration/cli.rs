//! Integration tests for the modeldigest binary

use crate::integration::test_utils::{model_dir, COMPLEX_MODEL};
use modeldigest::{compute_digest, Options};
use std::ffi::OsStr;
use std::fs;
use std::process::{Command, Output};

fn modeldigest(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_modeldigest"))
        .env_clear()
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn test_cli_prints_digest() {
    let temp_dir = model_dir(COMPLEX_MODEL);

    let output = modeldigest(&[temp_dir.path().as_os_str()]);
    assert!(
        output.status.success(),
        "modeldigest should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let expected = compute_digest(temp_dir.path(), &Options::default()).unwrap();
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_cli_flags_match_library_options() {
    let temp_dir = model_dir(COMPLEX_MODEL);
    let nested = temp_dir.path().join("subdir").join("nested");

    let output = modeldigest(&[
        OsStr::new("--ignore-git-paths=false"),
        OsStr::new("--ignore-paths"),
        nested.as_os_str(),
        temp_dir.path().as_os_str(),
    ]);
    assert!(output.status.success());

    let options = Options::default()
        .with_ignore_git_paths(false)
        .ignore_path(&nested);
    let expected = compute_digest(temp_dir.path(), &options).unwrap();
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_cli_config_file() {
    let temp_dir = model_dir(&[("model.bin", "model"), ("README.md", "readme")]);
    let config_dir = tempfile::TempDir::new().unwrap();
    let config_file = config_dir.path().join("modeldigest.toml");
    fs::write(&config_file, "ignore_paths = [\"README.md\"]\n").unwrap();

    let output = modeldigest(&[
        OsStr::new("--config"),
        config_file.as_os_str(),
        temp_dir.path().as_os_str(),
    ]);
    assert!(output.status.success());

    let options = Options::default().ignore_path("README.md");
    let expected = compute_digest(temp_dir.path(), &options).unwrap();
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_cli_list_prints_manifest_then_digest() {
    let temp_dir = model_dir(&[("weights.bin", "w"), ("config.json", "{}")]);

    let output = modeldigest(&[OsStr::new("--list"), temp_dir.path().as_os_str()]);
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("  config.json"));
    assert!(lines[1].ends_with("  weights.bin"));
    assert!(lines[2].starts_with("sha256:"));
}

#[test]
fn test_cli_missing_path_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let output = modeldigest(&[missing.as_os_str()]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_cli_without_arguments_is_usage_error() {
    let output = modeldigest(&[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[cfg(unix)]
#[test]
fn test_cli_symlink_policy() {
    let temp_dir = model_dir(&[("model.bin", "weights")]);
    std::os::unix::fs::symlink(
        temp_dir.path().join("model.bin"),
        temp_dir.path().join("alias.bin"),
    )
    .unwrap();

    let denied = modeldigest(&[temp_dir.path().as_os_str()]);
    assert!(!denied.status.success());
    assert!(String::from_utf8_lossy(&denied.stderr).contains("Symlink not allowed"));

    let allowed = modeldigest(&[OsStr::new("--allow-symlinks"), temp_dir.path().as_os_str()]);
    assert!(allowed.status.success());
    assert!(stdout(&allowed).starts_with("sha256:"));
}
