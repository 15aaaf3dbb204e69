// src/engine/registry.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::dag::node::Node;
use crate::engine::context::{ExecutionContext, ProductValue};

/// A node's executor: stateless function from context to value.
///
/// Executors read their declared parents via [`ExecutionContext::require`]
/// and run inputs via [`ExecutionContext::inputs`]; they never write the
/// cache (the orchestrator does) and never read their own entry.
pub type NodeExecutor = fn(&ExecutionContext) -> anyhow::Result<ProductValue>;

/// Explicit node → executor table, built once by the hosting application
/// and passed into the orchestrator (no load-time global registration, so
/// tests can swap in fakes).
#[derive(Default, Clone)]
pub struct ExecutorRegistry {
    executors: BTreeMap<Node, NodeExecutor>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node: Node, executor: NodeExecutor) {
        self.executors.insert(node, executor);
    }

    pub fn lookup(&self, node: Node) -> Option<NodeExecutor> {
        self.executors.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

impl fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("nodes", &self.executors.keys().collect::<Vec<_>>())
            .finish()
    }
}
