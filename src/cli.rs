//! Command-line adapter: clap types plus the glue between flags, layered
//! configuration and the digest pipeline.

use crate::config::{ConfigLoader, DigestConfig};
use crate::digest::{compute_root_digest, ROOT_DIGEST_PREFIX};
use crate::error::ConfigError;
use crate::manifest::{Manifest, Serializer};
use clap::Parser;
use std::path::PathBuf;

/// Compute the root digest of a model directory
#[derive(Debug, Parser)]
#[command(name = "modeldigest")]
#[command(about = "Compute a model_signing compatible root digest for a model directory")]
pub struct Cli {
    /// Model directory to digest
    pub model_path: PathBuf,

    /// Path to ignore, absolute or relative to the model root (repeatable)
    #[arg(long = "ignore-paths", value_name = "PATH")]
    pub ignore_paths: Vec<PathBuf>,

    /// Ignore .git, .gitignore, .gitattributes and .github [default: true]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub ignore_git_paths: Option<bool>,

    /// Follow symbolic links instead of failing on them [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub allow_symlinks: Option<bool>,

    /// Configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print each manifest entry as `<sha256>  <path>` before the digest
    #[arg(long)]
    pub list: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load layered configuration and apply the flags on top
    pub fn resolve_config(&self) -> Result<DigestConfig, ConfigError> {
        let mut config = ConfigLoader::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Flags take precedence over every other configuration source.
    /// Ignore paths given on the command line extend the configured ones.
    pub fn apply_overrides(&self, config: &mut DigestConfig) {
        config.ignore_paths.extend(self.ignore_paths.iter().cloned());
        if let Some(ignore) = self.ignore_git_paths {
            config.ignore_git_paths = ignore;
        }
        if let Some(allow) = self.allow_symlinks {
            config.allow_symlinks = allow;
        }

        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(ref format) = self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(ref output) = self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(ref file) = self.log_file {
            config.logging.file = file.clone();
        }
    }
}

/// Run the digest pipeline and render stdout output
pub fn execute(cli: &Cli, config: &DigestConfig) -> anyhow::Result<String> {
    use anyhow::Context;

    let serializer = Serializer::new(config.options());
    let manifest = serializer
        .serialize(&cli.model_path)
        .with_context(|| format!("Error computing digest for {}", cli.model_path.display()))?;
    let root = compute_root_digest(&manifest).context("Error computing root digest")?;

    let mut output = String::new();
    if cli.list {
        output.push_str(&render_listing(&manifest));
    }
    output.push_str(ROOT_DIGEST_PREFIX);
    output.push_str(&root);
    Ok(output)
}

/// One `<sha256>  <path>` line per entry, in manifest order
pub fn render_listing(manifest: &Manifest) -> String {
    let mut out = String::new();
    for entry in manifest {
        out.push_str(&format!("{}  {}\n", entry.sha256().unwrap_or("-"), entry.name));
    }
    out
}
