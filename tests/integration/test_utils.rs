//! Shared helpers for building model trees on disk

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `(relative path, content)` pairs under `root`, creating parents
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }
}

/// Temporary model directory populated with `files`
pub fn model_dir(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_tree(temp_dir.path(), files);
    temp_dir
}

/// The nested model used by several tests: five model files plus git artifacts
pub const COMPLEX_MODEL: &[(&str, &str)] = &[
    ("model.bin", "model weights"),
    ("config.json", r#"{"version": "1.0"}"#),
    ("subdir/layer1.bin", "layer 1 data"),
    ("subdir/layer2.bin", "layer 2 data"),
    ("subdir/nested/data.json", r#"{"nested": true}"#),
    (".git/config", "git config"),
    (".git/HEAD", "ref: refs/heads/main"),
    (".gitignore", "*.pyc\n__pycache__/"),
    (".github/workflows/ci.yml", "name: CI"),
];
