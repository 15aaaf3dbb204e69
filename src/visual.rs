// src/visual.rs

//! Presentation renderings for visual deliverables.
//!
//! Visual deliverables share the backing node of their scientific
//! counterpart; the palette is applied here, after output projection,
//! rather than as a graph node of its own.

use anyhow::{Result, bail};

use crate::dag::node::Deliverable;
use crate::geometry::Region;
use crate::provider::{ComputeProvider, Raster, RenderSpec};

/// Severity class colours, classes 0..=4 (Unburned → Very High).
pub const SEVERITY_PALETTE: [&str; 5] = ["36a402", "fbfb01", "feb012", "f50003", "6a044d"];

/// Continuous dNBR colour ramp over the -0.5..1.0 stretch.
pub const DNBR_RAMP: [&str; 5] = ["00FF00", "FFFF00", "FFA500", "FF0000", "8B4513"];

const RGB_SPEC: RenderSpec = RenderSpec {
    min: 0.02,
    max: 0.30,
    gamma: Some(1.2),
    palette: &[],
};

const DNBR_SPEC: RenderSpec = RenderSpec {
    min: -0.5,
    max: 1.0,
    gamma: None,
    palette: &DNBR_RAMP,
};

const SEVERITY_SPEC: RenderSpec = RenderSpec {
    min: 0.0,
    max: 4.0,
    gamma: None,
    palette: &SEVERITY_PALETTE,
};

/// Stretch/palette for a visual deliverable; `None` for scientific ones.
pub fn render_spec(deliverable: Deliverable) -> Option<RenderSpec> {
    match deliverable {
        Deliverable::RgbPreFireVisual | Deliverable::RgbPostFireVisual => Some(RGB_SPEC),
        Deliverable::DnbrVisual => Some(DNBR_SPEC),
        Deliverable::BurnSeverityVisual => Some(SEVERITY_SPEC),
        _ => None,
    }
}

/// Render the projected raster of a visual deliverable.
pub fn render_visual(
    provider: &dyn ComputeProvider,
    deliverable: Deliverable,
    raster: &Raster,
    region: &Region,
) -> Result<Raster> {
    let Some(spec) = render_spec(deliverable) else {
        bail!("deliverable '{deliverable}' is not a visual product");
    };
    provider.render(raster, &spec, region)
}
