//! Scans a directory for EDF files and prints their metadata as JSON,
//! sorted by recording start with invalid files last.
//!
//! ```text
//! edf-catalog [DIRECTORY]
//! ```
//!
//! Settings are read from `edfcatalog.toml` in the working directory (or the
//! file named by `EDFCATALOG_CONFIG`); a `DIRECTORY` argument overrides the
//! configured one. Log verbosity follows `RUST_LOG` (default `info`).

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use edfcatalog::{Catalog, CatalogConfig};
use log::error;

const DEFAULT_CONFIG_FILE: &str = "edfcatalog.toml";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path =
        env::var("EDFCATALOG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let mut config = CatalogConfig::load_or_default(&config_path);

    if let Some(directory) = env::args_os().nth(1) {
        config.directory = PathBuf::from(directory);
    }

    let catalog = match Catalog::scan(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to scan {}: {}", config.directory.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match catalog.to_json() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize catalog: {}", e);
            ExitCode::FAILURE
        }
    }
}
