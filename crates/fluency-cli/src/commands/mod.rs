//! Subcommand implementations.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod history;
pub mod locate;

use std::path::{Path, PathBuf};

use tracing::debug;

use fluency_core::FluencyConfig;

/// Default location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fluency")
        .join("config.json")
}

/// Load the configuration named on the command line, else the user file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FluencyConfig> {
    if let Some(path) = config_path {
        return Ok(FluencyConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(FluencyConfig::from_file(&default_path)?)
    } else {
        Ok(FluencyConfig::default())
    }
}
