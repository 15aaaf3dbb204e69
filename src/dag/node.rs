// src/dag/node.rs

use std::fmt;

use serde::Deserialize;

/// A single computation step in the assessment pipeline.
///
/// The set is closed: every node the engine can ever be asked to execute is
/// a variant here, so an unknown node is a type-level impossibility rather
/// than a runtime lookup miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// Gather every scene intersecting the region under the cloud threshold.
    CollectionGathering,

    /// Scenes restricted to the before-fire window.
    PreFireCollection,
    /// Scenes restricted to the after-fire window.
    PostFireCollection,

    PreFireMosaic,
    PostFireMosaic,

    RgbPreFire,
    RgbPostFire,

    NdviPreFire,
    NdviPostFire,
    Dndvi,

    NbrPreFire,
    NbrPostFire,
    Dnbr,

    /// Relativized burn ratio: dNBR scaled by pre-fire NBR.
    Rbr,
    /// dNBR classified into severity classes 0..=4.
    BurnSeverity,
    /// Per-severity-class area aggregation over the region.
    BurnedAreaStatistics,
}

impl Node {
    /// Stable lowercase name used in logs and DOT output.
    pub fn name(self) -> &'static str {
        match self {
            Node::CollectionGathering => "collection_gathering",
            Node::PreFireCollection => "pre_fire_collection",
            Node::PostFireCollection => "post_fire_collection",
            Node::PreFireMosaic => "pre_fire_mosaic",
            Node::PostFireMosaic => "post_fire_mosaic",
            Node::RgbPreFire => "rgb_pre_fire",
            Node::RgbPostFire => "rgb_post_fire",
            Node::NdviPreFire => "ndvi_pre_fire",
            Node::NdviPostFire => "ndvi_post_fire",
            Node::Dndvi => "dndvi",
            Node::NbrPreFire => "nbr_pre_fire",
            Node::NbrPostFire => "nbr_post_fire",
            Node::Dnbr => "dnbr",
            Node::Rbr => "rbr",
            Node::BurnSeverity => "burn_severity",
            Node::BurnedAreaStatistics => "burned_area_statistics",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A user-facing requested output.
///
/// Distinct from [`Node`]: a visual deliverable is a different output from
/// the scientific raster it is derived from, even though both are backed by
/// the same node. Deserializes from the snake_case names used in the
/// run-request TOML (`deliverables = ["dnbr", "burn_severity_visual"]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deliverable {
    // Scientific rasters (GeoTIFF-ready).
    RgbPreFire,
    RgbPostFire,
    NbrPreFire,
    NbrPostFire,
    Dnbr,
    Dndvi,
    Rbr,
    BurnSeverityMap,

    // Statistics table.
    BurnedAreaStatistics,

    // Visual renderings (thumbnail-ready).
    RgbPreFireVisual,
    RgbPostFireVisual,
    DnbrVisual,
    BurnSeverityVisual,
}

impl Deliverable {
    /// Every deliverable, in declaration order. Used when a run request
    /// omits the `deliverables` list ("give me everything").
    pub const ALL: [Deliverable; 13] = [
        Deliverable::RgbPreFire,
        Deliverable::RgbPostFire,
        Deliverable::NbrPreFire,
        Deliverable::NbrPostFire,
        Deliverable::Dnbr,
        Deliverable::Dndvi,
        Deliverable::Rbr,
        Deliverable::BurnSeverityMap,
        Deliverable::BurnedAreaStatistics,
        Deliverable::RgbPreFireVisual,
        Deliverable::RgbPostFireVisual,
        Deliverable::DnbrVisual,
        Deliverable::BurnSeverityVisual,
    ];

    /// Whether this deliverable is a presentation rendering rather than a
    /// scientific value. Visual deliverables get a palette applied after
    /// output projection.
    pub fn is_visual(self) -> bool {
        matches!(
            self,
            Deliverable::RgbPreFireVisual
                | Deliverable::RgbPostFireVisual
                | Deliverable::DnbrVisual
                | Deliverable::BurnSeverityVisual
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Deliverable::RgbPreFire => "rgb_pre_fire",
            Deliverable::RgbPostFire => "rgb_post_fire",
            Deliverable::NbrPreFire => "nbr_pre_fire",
            Deliverable::NbrPostFire => "nbr_post_fire",
            Deliverable::Dnbr => "dnbr",
            Deliverable::Dndvi => "dndvi",
            Deliverable::Rbr => "rbr",
            Deliverable::BurnSeverityMap => "burn_severity_map",
            Deliverable::BurnedAreaStatistics => "burned_area_statistics",
            Deliverable::RgbPreFireVisual => "rgb_pre_fire_visual",
            Deliverable::RgbPostFireVisual => "rgb_post_fire_visual",
            Deliverable::DnbrVisual => "dnbr_visual",
            Deliverable::BurnSeverityVisual => "burn_severity_visual",
        }
    }
}

impl fmt::Display for Deliverable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
