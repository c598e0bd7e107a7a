//! modeldigest CLI Binary
//!
//! Prints the `sha256:<hex>` root digest of a model directory.

use clap::Parser;
use modeldigest::cli::{execute, Cli};
use modeldigest::logging::init_logging;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!(model = %cli.model_path.display(), "modeldigest starting");

    match execute(&cli, &config) {
        Ok(output) => {
            info!("Digest computed");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}
