// src/dag/resolver.rs

use std::collections::BTreeSet;

use crate::dag::graph::DependencyGraph;
use crate::dag::node::Node;
use crate::errors::EngineError;

/// Expand a set of requested nodes into a full execution plan.
///
/// The plan contains every node transitively required by the request, each
/// exactly once, parents strictly before children (a valid topological
/// order). Depth-first with post-order emission; parents are visited in
/// `Node` order, so the plan is deterministic for a given request and graph.
///
/// Cycles reachable from the request are reported as
/// [`EngineError::CircularDependency`] naming the node at which the cycle
/// closed, rather than recursing forever.
pub fn resolve(graph: &DependencyGraph, requested: &[Node]) -> Result<Vec<Node>, EngineError> {
    let mut state = VisitState {
        graph,
        resolved: BTreeSet::new(),
        in_progress: BTreeSet::new(),
        plan: Vec::new(),
    };

    for &node in requested {
        state.visit(node)?;
    }

    Ok(state.plan)
}

struct VisitState<'g> {
    graph: &'g DependencyGraph,
    /// Nodes already emitted to the plan.
    resolved: BTreeSet<Node>,
    /// Nodes on the active recursion path; seeing one again means a cycle.
    in_progress: BTreeSet<Node>,
    plan: Vec<Node>,
}

impl VisitState<'_> {
    fn visit(&mut self, node: Node) -> Result<(), EngineError> {
        if self.resolved.contains(&node) {
            return Ok(());
        }
        if !self.in_progress.insert(node) {
            return Err(EngineError::CircularDependency(node));
        }

        // Clone the parent set: `visit` needs `&mut self` while the graph
        // borrow would otherwise be held across the recursion.
        let parents = self.graph.parents_of(node)?.clone();
        for parent in parents {
            self.visit(parent)?;
        }

        self.in_progress.remove(&node);
        self.resolved.insert(node);
        self.plan.push(node);
        Ok(())
    }
}
