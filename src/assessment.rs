// src/assessment.rs

//! High-level post-fire assessment facade.
//!
//! Wires a validated run request and a compute provider into the engine,
//! renders visual deliverables after projection, and starts exports for
//! scientific rasters when a destination is configured. This is the layer
//! a hosting application embeds; the CLI only plans (it carries no real
//! provider).

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::config::model::{ConfigFile, ExportSection};
use crate::dag::node::Deliverable;
use crate::engine::context::{ExecutionContext, ProductValue, RunInputs};
use crate::engine::orchestrator::Engine;
use crate::geometry::{self, Region};
use crate::products::statistics::AreaStatistics;
use crate::provider::{ComputeProvider, ExportDestination, ExportReference, Raster};
use crate::visual;

/// Final output for one requested deliverable.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliverableOutput {
    /// Scientific raster, exported when a destination was configured.
    Raster {
        raster: Raster,
        export: Option<ExportReference>,
    },
    /// Palette-rendered presentation raster.
    Visual { raster: Raster },
    /// Burned-area statistics table.
    Statistics(AreaStatistics),
}

/// One fire event assessment: provider + validated request + engine.
pub struct PostFireAssessment {
    engine: Engine,
    provider: Arc<dyn ComputeProvider>,
    region: Region,
    start_date: NaiveDate,
    end_date: NaiveDate,
    buffer_days: i64,
    cloud_threshold: f64,
    deliverables: Vec<Deliverable>,
    export: Option<ExportSection>,
}

impl PostFireAssessment {
    /// Build an assessment from a validated run request, loading the
    /// region-of-interest GeoJSON from the configured path.
    pub fn from_config(provider: Arc<dyn ComputeProvider>, cfg: &ConfigFile) -> Result<Self> {
        let region = geometry::load_geojson(&cfg.assessment.geojson)
            .context("loading region of interest")?;
        Self::new(provider, region, cfg)
    }

    /// Build an assessment with an already-loaded region (tests, callers
    /// that source geometry elsewhere).
    pub fn new(
        provider: Arc<dyn ComputeProvider>,
        region: Region,
        cfg: &ConfigFile,
    ) -> Result<Self> {
        Ok(Self {
            engine: Engine::builtin(),
            provider,
            region,
            start_date: cfg.assessment.start_date()?,
            end_date: cfg.assessment.end_date()?,
            buffer_days: cfg.window.buffer_days,
            cloud_threshold: cfg.window.cloud_threshold,
            deliverables: cfg.effective_deliverables(),
            export: cfg.export.clone(),
        })
    }

    pub fn deliverables(&self) -> &[Deliverable] {
        &self.deliverables
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Execute the pipeline and post-process the projected values.
    pub fn run(&self) -> Result<BTreeMap<Deliverable, DeliverableOutput>> {
        let mut ctx = ExecutionContext::new(RunInputs {
            region: self.region.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            buffer_days: self.buffer_days,
            cloud_threshold: self.cloud_threshold,
            provider: self.provider.clone(),
        });

        let products = self.engine.run(&self.deliverables, &mut ctx)?;

        let mut outputs = BTreeMap::new();
        for (deliverable, value) in products {
            outputs.insert(deliverable, self.finish(deliverable, value)?);
        }
        Ok(outputs)
    }

    /// Turn a projected node value into the deliverable's final form.
    fn finish(&self, deliverable: Deliverable, value: ProductValue) -> Result<DeliverableOutput> {
        if deliverable.is_visual() {
            let raster = value.as_raster().with_context(|| {
                format!("visual deliverable '{deliverable}' is not backed by a raster")
            })?;
            let rendered =
                visual::render_visual(self.provider.as_ref(), deliverable, raster, &self.region)?;
            return Ok(DeliverableOutput::Visual { raster: rendered });
        }

        if let ProductValue::Statistics(stats) = value {
            return Ok(DeliverableOutput::Statistics(stats));
        }

        let raster = value
            .as_raster()
            .with_context(|| format!("deliverable '{deliverable}' is not backed by a raster"))?
            .clone();

        let export = match &self.export {
            Some(section) => {
                let destination = ExportDestination {
                    bucket: section.bucket.clone(),
                    object_name: format!("{}{}", section.prefix, deliverable),
                };
                let reference = self
                    .provider
                    .export_geotiff(&raster, &self.region, &destination)
                    .with_context(|| format!("exporting '{deliverable}'"))?;
                info!(%deliverable, url = %reference.url, task_id = %reference.task_id, "export started");
                Some(reference)
            }
            None => None,
        };

        Ok(DeliverableOutput::Raster { raster, export })
    }
}
