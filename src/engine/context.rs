// src/engine/context.rs

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::bail;
use chrono::NaiveDate;

use crate::dag::node::Node;
use crate::errors::EngineError;
use crate::geometry::Region;
use crate::products::statistics::AreaStatistics;
use crate::provider::{ComputeProvider, Raster, SceneCollection};

/// Immutable run inputs, set at context construction and never mutated.
///
/// The context does not validate which subset a given run needs; each node
/// executor reads only the inputs it uses and fails if one is malformed.
#[derive(Clone)]
pub struct RunInputs {
    pub region: Region,
    /// Event start, inclusive.
    pub start_date: NaiveDate,
    /// Event end, inclusive.
    pub end_date: NaiveDate,
    /// Days before `start_date` / after `end_date` making up the pre/post
    /// windows.
    pub buffer_days: i64,
    /// Maximum per-scene cloud cover percentage, 0–100.
    pub cloud_threshold: f64,
    pub provider: Arc<dyn ComputeProvider>,
}

/// The value a node executor produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValue {
    Scenes(SceneCollection),
    Raster(Raster),
    Statistics(AreaStatistics),
}

impl ProductValue {
    pub fn as_scenes(&self) -> anyhow::Result<&SceneCollection> {
        match self {
            ProductValue::Scenes(scenes) => Ok(scenes),
            other => bail!("expected a scene collection, found {}", other.kind()),
        }
    }

    pub fn as_raster(&self) -> anyhow::Result<&Raster> {
        match self {
            ProductValue::Raster(raster) => Ok(raster),
            other => bail!("expected a raster, found {}", other.kind()),
        }
    }

    pub fn as_statistics(&self) -> anyhow::Result<&AreaStatistics> {
        match self {
            ProductValue::Statistics(stats) => Ok(stats),
            other => bail!("expected area statistics, found {}", other.kind()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ProductValue::Scenes(_) => "scene collection",
            ProductValue::Raster(_) => "raster",
            ProductValue::Statistics(_) => "area statistics",
        }
    }
}

/// Per-run container: immutable inputs plus the node-result cache.
///
/// Lives for exactly one resolve-and-execute cycle. The cache is written
/// only by the orchestrator, once per node; executors read it through
/// [`ExecutionContext::require`].
pub struct ExecutionContext {
    inputs: RunInputs,
    cache: HashMap<Node, ProductValue>,
}

impl ExecutionContext {
    pub fn new(inputs: RunInputs) -> Self {
        Self {
            inputs,
            cache: HashMap::new(),
        }
    }

    pub fn inputs(&self) -> &RunInputs {
        &self.inputs
    }

    pub fn provider(&self) -> &dyn ComputeProvider {
        self.inputs.provider.as_ref()
    }

    pub fn get(&self, node: Node) -> Option<&ProductValue> {
        self.cache.get(&node)
    }

    pub fn contains(&self, node: Node) -> bool {
        self.cache.contains_key(&node)
    }

    /// Store a node's computed value. The orchestrator checks cache
    /// membership before executing, so under normal operation each key is
    /// written at most once; a pre-seeded entry (partial re-use) simply
    /// causes the node to be skipped.
    pub fn set(&mut self, node: Node, value: ProductValue) {
        debug_assert!(
            !self.cache.contains_key(&node),
            "node '{node}' written twice"
        );
        self.cache.insert(node, value);
    }

    /// A parent value this executor's node declared a dependency on.
    ///
    /// Absence means the node ran before its parent, which the resolver is
    /// supposed to make impossible; surfacing it loudly here beats masking
    /// the ordering bug with a placeholder downstream.
    pub fn require(&self, parent: Node) -> Result<&ProductValue, EngineError> {
        self.cache
            .get(&parent)
            .ok_or(EngineError::ParentUnavailable(parent))
    }
}
