// src/provider/mod.rs

//! Boundary to the external geospatial compute service.
//!
//! The engine never does pixel math itself; every raster operation is a call
//! into a [`ComputeProvider`]. Scene *metadata* (identifiers, acquisition
//! dates, cloud percentages) is local, so date filtering of a gathered
//! collection happens in-process; everything else returns opaque
//! provider-minted [`Raster`] handles.

pub mod memory;

use chrono::NaiveDate;

use crate::errors::Result;
use crate::geometry::Region;

pub use memory::InMemoryProvider;

/// Reference to a single source scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub acquired: NaiveDate,
    pub cloud_pct: f64,
}

/// A time-ordered set of scene references intersecting the region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneCollection {
    scenes: Vec<Scene>,
}

impl SceneCollection {
    /// Build a collection, sorting scenes by acquisition date.
    pub fn new(mut scenes: Vec<Scene>) -> Self {
        scenes.sort_by_key(|s| s.acquired);
        Self { scenes }
    }

    /// Scenes whose acquisition date falls inside `window`.
    pub fn filter_date(&self, window: &DateWindow) -> SceneCollection {
        SceneCollection {
            scenes: self
                .scenes
                .iter()
                .filter(|s| window.contains(s.acquired))
                .cloned()
                .collect(),
        }
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Half-open calendar window: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Opaque handle to a provider-side raster.
///
/// The engine never inspects pixel data; it only threads handles between
/// provider calls. `name` is the provider-assigned band/product name, kept
/// for logs and export naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub id: u64,
    pub name: String,
}

/// Summed area for one class of a classified raster, in hectares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassArea {
    pub class: u8,
    pub area_ha: f64,
}

/// Value stretch and palette for a presentation rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub min: f64,
    pub max: f64,
    pub gamma: Option<f64>,
    /// Hex colour stops; empty means natural-colour rendering of the
    /// raster's own bands.
    pub palette: &'static [&'static str],
}

/// Where an exported GeoTIFF should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDestination {
    pub bucket: String,
    pub object_name: String,
}

/// Result of a started export: a stable URL plus the provider's
/// asynchronous task identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReference {
    pub url: String,
    pub task_id: String,
}

/// Operations the node executors delegate to the external compute service.
///
/// Implementations are expected to be I/O-bound collaborators; the engine
/// calls them strictly sequentially and applies no retry of its own.
pub trait ComputeProvider: Send + Sync {
    /// Every scene intersecting `region` at or under `cloud_threshold`
    /// percent cloud cover, ordered by acquisition date.
    fn gather_scenes(&self, region: &Region, cloud_threshold: f64) -> Result<SceneCollection>;

    /// Composite a filtered collection into a single raster covering the
    /// region. Fails on an empty collection.
    fn mosaic(&self, scenes: &SceneCollection) -> Result<Raster>;

    /// Select a subset of bands into a new raster named `name`.
    fn select_bands(&self, raster: &Raster, bands: &[&str], name: &str) -> Result<Raster>;

    /// `(a - b) / (a + b)` over the two named bands.
    fn normalized_difference(
        &self,
        raster: &Raster,
        band_a: &str,
        band_b: &str,
        name: &str,
    ) -> Result<Raster>;

    fn subtract(&self, a: &Raster, b: &Raster, name: &str) -> Result<Raster>;

    fn divide(&self, a: &Raster, b: &Raster, name: &str) -> Result<Raster>;

    fn add_constant(&self, raster: &Raster, value: f64, name: &str) -> Result<Raster>;

    /// Multi-way threshold classification: pixels below `thresholds[0]` map
    /// to class 0, pixels in `[thresholds[i-1], thresholds[i])` to class
    /// `i`, pixels at or above the last threshold to `thresholds.len()`.
    fn classify(&self, raster: &Raster, thresholds: &[f64], name: &str) -> Result<Raster>;

    /// Per-class summed area of a classified raster over `region`, in
    /// hectares.
    fn class_area(&self, classified: &Raster, region: &Region) -> Result<Vec<ClassArea>>;

    /// Presentation rendering with the given stretch/palette, clipped and
    /// outlined to `region`.
    fn render(&self, raster: &Raster, spec: &RenderSpec, region: &Region) -> Result<Raster>;

    /// Persist a raster externally; returns immediately with a reference to
    /// the (asynchronously produced) object.
    fn export_geotiff(
        &self,
        raster: &Raster,
        region: &Region,
        destination: &ExportDestination,
    ) -> Result<ExportReference>;
}
