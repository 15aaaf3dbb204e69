// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a run request from a TOML file.
///
/// This only performs deserialization; it does **not** perform semantic
/// validation (dates, paths, ranges). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading run request at {path:?}"))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML run request from {path:?}"))?;

    Ok(config)
}

/// Load a run request and run semantic validation. The recommended entry
/// point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Default run-request path in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Firedag.toml")
}
