// src/config/mod.rs

//! Run-request configuration: TOML model, loading, and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{AssessmentSection, ConfigFile, ExportSection, WindowSection};
pub use validate::validate_config;
