// src/config/model.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::dag::node::Deliverable;

/// Date format accepted in the run request.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Top-level run request as read from a TOML file.
///
/// ```toml
/// deliverables = ["dnbr", "burn_severity_visual"]
///
/// [assessment]
/// geojson = "polygons/eejatai.geojson"
/// start_date = "2024-09-01"
/// end_date = "2024-11-08"
///
/// [window]
/// buffer_days = 30
/// cloud_threshold = 100.0
///
/// [export]
/// bucket = "fire-products"
/// prefix = "jatai/"
/// ```
///
/// `[window]`, `deliverables` and `[export]` are optional; omitting
/// `deliverables` requests everything.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Event description from `[assessment]`.
    pub assessment: AssessmentSection,

    /// Filtering windows from `[window]`.
    #[serde(default)]
    pub window: WindowSection,

    /// Requested deliverables; `None` means all of them.
    #[serde(default)]
    pub deliverables: Option<Vec<Deliverable>>,

    /// Optional export destination for scientific rasters.
    #[serde(default)]
    pub export: Option<ExportSection>,
}

impl ConfigFile {
    /// The deliverables this run should produce.
    pub fn effective_deliverables(&self) -> Vec<Deliverable> {
        match &self.deliverables {
            Some(list) => list.clone(),
            None => Deliverable::ALL.to_vec(),
        }
    }
}

/// `[assessment]` section.
///
/// Dates are kept as strings here so that validation can report malformed
/// input with the offending field name; use the parse helpers once
/// validated.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSection {
    /// Path to the region-of-interest GeoJSON file.
    pub geojson: String,

    /// Event start date, `YYYY-MM-DD`, inclusive.
    pub start_date: String,

    /// Event end date, `YYYY-MM-DD`, inclusive.
    pub end_date: String,
}

impl AssessmentSection {
    pub fn start_date(&self) -> Result<NaiveDate> {
        parse_date(&self.start_date, "start_date")
    }

    pub fn end_date(&self) -> Result<NaiveDate> {
        parse_date(&self.end_date, "end_date")
    }
}

pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .with_context(|| format!("{field} must be a valid calendar date in YYYY-MM-DD format (got {value:?})"))
}

/// `[window]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowSection {
    /// Days before start / after end forming the comparison windows.
    #[serde(default = "default_buffer_days")]
    pub buffer_days: i64,

    /// Maximum per-scene cloud cover percentage, 0–100.
    #[serde(default = "default_cloud_threshold")]
    pub cloud_threshold: f64,
}

fn default_buffer_days() -> i64 {
    30
}

fn default_cloud_threshold() -> f64 {
    100.0
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            buffer_days: default_buffer_days(),
            cloud_threshold: default_cloud_threshold(),
        }
    }
}

/// `[export]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSection {
    /// Destination bucket name.
    pub bucket: String,

    /// Object name prefix inside the bucket (e.g. `"jatai/"`).
    #[serde(default)]
    pub prefix: String,
}
