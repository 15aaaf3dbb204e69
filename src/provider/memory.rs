// src/provider/memory.rs

//! In-memory [`ComputeProvider`] used by tests and examples.
//!
//! Mints raster handles locally and keeps a log of every operation, so
//! tests can assert *which* provider calls a run made (and how many times)
//! without any remote service.

use std::sync::Mutex;

use anyhow::bail;
use tracing::debug;

use crate::errors::Result;
use crate::geometry::Region;
use crate::provider::{
    ClassArea, ComputeProvider, ExportDestination, ExportReference, Raster, RenderSpec, Scene,
    SceneCollection,
};

/// Provider backed by seeded scene metadata and class areas.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    scenes: Vec<Scene>,
    class_areas: Vec<ClassArea>,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    ops: Vec<String>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the scenes returned by [`ComputeProvider::gather_scenes`].
    pub fn with_scenes(mut self, scenes: Vec<Scene>) -> Self {
        self.scenes = scenes;
        self
    }

    /// Seed the per-class areas returned by [`ComputeProvider::class_area`].
    pub fn with_class_areas(mut self, class_areas: Vec<ClassArea>) -> Self {
        self.class_areas = class_areas;
        self
    }

    /// Snapshot of the operation log, in call order.
    pub fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }

    /// Number of logged operations whose name starts with `prefix`.
    pub fn op_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter(|op| op.starts_with(prefix))
            .count()
    }

    fn record(&self, op: String) {
        debug!(%op, "in-memory provider call");
        self.state.lock().unwrap().ops.push(op);
    }

    fn mint(&self, name: &str) -> Raster {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        Raster {
            id: state.next_id,
            name: name.to_string(),
        }
    }
}

impl ComputeProvider for InMemoryProvider {
    fn gather_scenes(&self, _region: &Region, cloud_threshold: f64) -> Result<SceneCollection> {
        self.record(format!("gather_scenes(cloud<={cloud_threshold})"));
        let scenes = self
            .scenes
            .iter()
            .filter(|s| s.cloud_pct <= cloud_threshold)
            .cloned()
            .collect();
        Ok(SceneCollection::new(scenes))
    }

    fn mosaic(&self, scenes: &SceneCollection) -> Result<Raster> {
        if scenes.is_empty() {
            bail!("cannot mosaic an empty scene collection");
        }
        self.record(format!("mosaic({} scenes)", scenes.len()));
        Ok(self.mint("mosaic"))
    }

    fn select_bands(&self, raster: &Raster, bands: &[&str], name: &str) -> Result<Raster> {
        self.record(format!("select_bands({}, {bands:?} -> {name})", raster.name));
        Ok(self.mint(name))
    }

    fn normalized_difference(
        &self,
        raster: &Raster,
        band_a: &str,
        band_b: &str,
        name: &str,
    ) -> Result<Raster> {
        self.record(format!(
            "normalized_difference({}, {band_a}, {band_b} -> {name})",
            raster.name
        ));
        Ok(self.mint(name))
    }

    fn subtract(&self, a: &Raster, b: &Raster, name: &str) -> Result<Raster> {
        self.record(format!("subtract({}, {} -> {name})", a.name, b.name));
        Ok(self.mint(name))
    }

    fn divide(&self, a: &Raster, b: &Raster, name: &str) -> Result<Raster> {
        self.record(format!("divide({}, {} -> {name})", a.name, b.name));
        Ok(self.mint(name))
    }

    fn add_constant(&self, raster: &Raster, value: f64, name: &str) -> Result<Raster> {
        self.record(format!("add_constant({}, {value} -> {name})", raster.name));
        Ok(self.mint(name))
    }

    fn classify(&self, raster: &Raster, thresholds: &[f64], name: &str) -> Result<Raster> {
        self.record(format!(
            "classify({}, {thresholds:?} -> {name})",
            raster.name
        ));
        Ok(self.mint(name))
    }

    fn class_area(&self, classified: &Raster, _region: &Region) -> Result<Vec<ClassArea>> {
        self.record(format!("class_area({})", classified.name));
        Ok(self.class_areas.clone())
    }

    fn render(&self, raster: &Raster, spec: &RenderSpec, _region: &Region) -> Result<Raster> {
        self.record(format!(
            "render({}, {}..{})",
            raster.name, spec.min, spec.max
        ));
        Ok(self.mint(&format!("{}_visual", raster.name)))
    }

    fn export_geotiff(
        &self,
        raster: &Raster,
        _region: &Region,
        destination: &ExportDestination,
    ) -> Result<ExportReference> {
        self.record(format!(
            "export_geotiff({} -> {}/{})",
            raster.name, destination.bucket, destination.object_name
        ));
        let task = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            state.next_id
        };
        Ok(ExportReference {
            url: format!(
                "https://storage.example.com/{}/{}.tif",
                destination.bucket, destination.object_name
            ),
            task_id: format!("task-{task}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn scene(id: &str, acquired: &str, cloud_pct: f64) -> Scene {
        Scene {
            id: id.to_string(),
            acquired: acquired.parse::<NaiveDate>().unwrap(),
            cloud_pct,
        }
    }

    fn region() -> Region {
        Region::Polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]])
    }

    #[test]
    fn gather_applies_cloud_threshold() {
        let provider = InMemoryProvider::new().with_scenes(vec![
            scene("clear", "2024-09-01", 5.0),
            scene("cloudy", "2024-09-02", 80.0),
        ]);

        let col = provider.gather_scenes(&region(), 50.0).unwrap();
        assert_eq!(col.len(), 1);
        assert_eq!(col.scenes()[0].id, "clear");
    }

    #[test]
    fn mosaic_of_empty_collection_fails() {
        let provider = InMemoryProvider::new();
        let err = provider.mosaic(&SceneCollection::default()).unwrap_err();
        assert!(err.to_string().contains("empty scene collection"));
    }

    #[test]
    fn operations_are_logged_in_order() {
        let provider =
            InMemoryProvider::new().with_scenes(vec![scene("s1", "2024-09-01", 1.0)]);

        let col = provider.gather_scenes(&region(), 100.0).unwrap();
        let mosaic = provider.mosaic(&col).unwrap();
        provider
            .normalized_difference(&mosaic, "B8_refl", "B12_refl", "nbr")
            .unwrap();

        let ops = provider.ops();
        assert_eq!(ops.len(), 3);
        assert!(ops[0].starts_with("gather_scenes"));
        assert!(ops[1].starts_with("mosaic"));
        assert!(ops[2].starts_with("normalized_difference"));
    }

    #[test]
    fn minted_rasters_have_distinct_ids() {
        let provider = InMemoryProvider::new();
        let a = provider.mint("a");
        let b = provider.mint("b");
        assert_ne!(a.id, b.id);
    }
}
