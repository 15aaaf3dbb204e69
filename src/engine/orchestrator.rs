// src/engine/orchestrator.rs

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::dag::deliverables::DeliverableMap;
use crate::dag::graph::DependencyGraph;
use crate::dag::node::{Deliverable, Node};
use crate::dag::resolver::resolve;
use crate::engine::context::{ExecutionContext, ProductValue};
use crate::engine::registry::ExecutorRegistry;
use crate::errors::EngineError;

/// The DAG executor: drives the resolver and the executor registry against
/// an execution context.
///
/// Holds only static configuration (graph, deliverable map, registry); all
/// per-run state lives in the [`ExecutionContext`], so one engine can serve
/// many sequential runs.
pub struct Engine {
    graph: DependencyGraph,
    deliverables: DeliverableMap,
    registry: ExecutorRegistry,
}

impl Engine {
    /// The production pipeline: builtin graph, builtin deliverable table,
    /// and the node executors from [`crate::products`].
    pub fn builtin() -> Self {
        Self::new(
            DependencyGraph::builtin(),
            DeliverableMap::builtin(),
            crate::products::builtin_registry(),
        )
    }

    pub fn new(
        graph: DependencyGraph,
        deliverables: DeliverableMap,
        registry: ExecutorRegistry,
    ) -> Self {
        Self {
            graph,
            deliverables,
            registry,
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn deliverables(&self) -> &DeliverableMap {
        &self.deliverables
    }

    /// The nodes a set of deliverables would execute, in execution order.
    ///
    /// This is the first two phases of [`Engine::run`] (requirement
    /// collection + resolution) without executing anything; used for
    /// dry-run output.
    pub fn plan(&self, requested: &[Deliverable]) -> Result<Vec<Node>, EngineError> {
        let backing = self.backing_nodes(requested)?;
        resolve(&self.graph, &backing)
    }

    /// Execute the pipeline for the requested deliverables.
    ///
    /// Phases: collect backing nodes (exactly-one arity enforced) → resolve
    /// the execution order → execute each node at most once, skipping
    /// pre-seeded cache entries → project cached values onto the requested
    /// deliverables. Any failure aborts the run; no partial output mapping
    /// is returned. The context's cache stays populated afterwards for
    /// provenance inspection.
    pub fn run(
        &self,
        requested: &[Deliverable],
        ctx: &mut ExecutionContext,
    ) -> Result<BTreeMap<Deliverable, ProductValue>, EngineError> {
        let backing = self.backing_nodes(requested)?;
        let plan = resolve(&self.graph, &backing)?;
        debug!(?plan, "resolved execution plan");

        for node in plan {
            if ctx.contains(node) {
                debug!(%node, "value already cached, skipping executor");
                continue;
            }

            let executor = self
                .registry
                .lookup(node)
                .ok_or(EngineError::MissingExecutor(node))?;

            info!(%node, "executing node");
            let value = executor(ctx).map_err(|source| EngineError::NodeFailed { node, source })?;
            ctx.set(node, value);
        }

        let mut outputs = BTreeMap::new();
        for &deliverable in requested {
            let node = self.deliverables.backing_node(deliverable)?;
            let value = ctx
                .get(node)
                .cloned()
                .ok_or(EngineError::ParentUnavailable(node))?;
            outputs.insert(deliverable, value);
        }

        Ok(outputs)
    }

    /// Backing node per requested deliverable, deduplicated, request order
    /// preserved. Fails before any execution if a deliverable has zero or
    /// several backing nodes.
    fn backing_nodes(&self, requested: &[Deliverable]) -> Result<Vec<Node>, EngineError> {
        let mut backing = Vec::new();
        for &deliverable in requested {
            let node = self.deliverables.backing_node(deliverable)?;
            if !backing.contains(&node) {
                backing.push(node);
            }
        }
        Ok(backing)
    }
}
