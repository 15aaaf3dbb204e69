// src/config/validate.rs

use std::path::Path;

use anyhow::{Result, anyhow};

use crate::config::model::ConfigFile;

/// Run semantic validation against a loaded run request.
///
/// This checks:
/// - both dates parse and `start_date <= end_date`
/// - `buffer_days >= 1`
/// - `cloud_threshold` within 0–100
/// - the geojson path has the right extension and exists
/// - an explicit `deliverables` list is non-empty
///
/// Deliverable *names* are already checked by deserialization (the enum is
/// closed), and graph/executor consistency is the engine's job at run time.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_dates(cfg)?;
    validate_window(cfg)?;
    validate_geojson_path(&cfg.assessment.geojson)?;
    validate_deliverables(cfg)?;
    Ok(())
}

fn validate_dates(cfg: &ConfigFile) -> Result<()> {
    let start = cfg.assessment.start_date()?;
    let end = cfg.assessment.end_date()?;

    if start > end {
        return Err(anyhow!(
            "start_date {} must not be after end_date {}",
            cfg.assessment.start_date,
            cfg.assessment.end_date
        ));
    }
    Ok(())
}

fn validate_window(cfg: &ConfigFile) -> Result<()> {
    if cfg.window.buffer_days < 1 {
        return Err(anyhow!(
            "[window].buffer_days must be >= 1 (got {})",
            cfg.window.buffer_days
        ));
    }

    let threshold = cfg.window.cloud_threshold;
    if !(0.0..=100.0).contains(&threshold) {
        return Err(anyhow!(
            "[window].cloud_threshold must be a percentage in 0..=100 (got {threshold})"
        ));
    }
    Ok(())
}

fn validate_geojson_path(path: &str) -> Result<()> {
    if !path.ends_with(".geojson") {
        return Err(anyhow!(
            "[assessment].geojson must point to a .geojson file (got {path:?})"
        ));
    }
    if !Path::new(path).is_file() {
        return Err(anyhow!("[assessment].geojson does not exist: {path}"));
    }
    Ok(())
}

fn validate_deliverables(cfg: &ConfigFile) -> Result<()> {
    if let Some(list) = &cfg.deliverables
        && list.is_empty()
    {
        return Err(anyhow!(
            "deliverables list is empty; omit the key to request everything"
        ));
    }
    Ok(())
}
