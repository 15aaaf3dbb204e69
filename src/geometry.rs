// src/geometry.rs

//! Region-of-interest loading.
//!
//! The run input is a GeoJSON file; the engine only needs an opaque
//! polygon/multipolygon representation to hand to the compute provider, so
//! we deserialize just enough of the format and convert the first feature's
//! geometry.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Linear ring of `[longitude, latitude]` positions.
pub type Ring = Vec<[f64; 2]>;

/// Engine-agnostic region of interest.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Outer ring first, holes after, per GeoJSON convention.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

/// Load the first feature's geometry from a GeoJSON file.
///
/// Mirrors the run-input contract: the file must be a FeatureCollection
/// whose first feature carries a Polygon or MultiPolygon. Other geometry
/// types fail deserialization.
pub fn load_geojson(path: impl AsRef<Path>) -> Result<Region> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading GeoJSON file at {path:?}"))?;

    let collection: FeatureCollection = serde_json::from_str(&contents)
        .with_context(|| format!("parsing GeoJSON from {path:?}"))?;

    let Some(feature) = collection.features.into_iter().next() else {
        bail!("GeoJSON file {path:?} contains no features");
    };

    Ok(match feature.geometry {
        Geometry::Polygon { coordinates } => Region::Polygon(coordinates),
        Geometry::MultiPolygon { coordinates } => Region::MultiPolygon(coordinates),
    })
}
