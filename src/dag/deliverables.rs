// src/dag/deliverables.rs

use std::collections::{BTreeMap, BTreeSet};

use crate::dag::node::{Deliverable, Node};
use crate::errors::EngineError;

/// Static mapping from each user-facing deliverable to the node that
/// produces its value.
///
/// The map stores a *set* of nodes per deliverable so that misconfiguration
/// (zero or several backing nodes) is representable and rejected loudly by
/// [`DeliverableMap::backing_node`], rather than silently resolved.
#[derive(Debug, Clone, Default)]
pub struct DeliverableMap {
    backing: BTreeMap<Deliverable, BTreeSet<Node>>,
}

impl DeliverableMap {
    /// The production deliverable table.
    ///
    /// Visual deliverables share the backing node of their scientific
    /// counterpart: same data, different representation. The palette is
    /// applied after output projection, outside the graph.
    pub fn builtin() -> Self {
        let mut m = DeliverableMap::default();

        m.declare(Deliverable::RgbPreFire, [Node::RgbPreFire]);
        m.declare(Deliverable::RgbPostFire, [Node::RgbPostFire]);

        m.declare(Deliverable::NbrPreFire, [Node::NbrPreFire]);
        m.declare(Deliverable::NbrPostFire, [Node::NbrPostFire]);

        m.declare(Deliverable::Dnbr, [Node::Dnbr]);
        m.declare(Deliverable::Dndvi, [Node::Dndvi]);
        m.declare(Deliverable::Rbr, [Node::Rbr]);

        m.declare(Deliverable::BurnSeverityMap, [Node::BurnSeverity]);
        m.declare(Deliverable::BurnedAreaStatistics, [Node::BurnedAreaStatistics]);

        m.declare(Deliverable::RgbPreFireVisual, [Node::RgbPreFire]);
        m.declare(Deliverable::RgbPostFireVisual, [Node::RgbPostFire]);
        m.declare(Deliverable::DnbrVisual, [Node::Dnbr]);
        m.declare(Deliverable::BurnSeverityVisual, [Node::BurnSeverity]);

        m
    }

    /// Declare the backing node set for a deliverable.
    pub fn declare(&mut self, deliverable: Deliverable, nodes: impl IntoIterator<Item = Node>) {
        self.backing.insert(deliverable, nodes.into_iter().collect());
    }

    /// The single node backing `deliverable`.
    ///
    /// Fails on a deliverable with no entry (configuration hole) or with
    /// more than one backing node (ambiguous; the orchestrator would not
    /// know which cached value to project).
    pub fn backing_node(&self, deliverable: Deliverable) -> Result<Node, EngineError> {
        let nodes = self
            .backing
            .get(&deliverable)
            .ok_or(EngineError::UnmappedDeliverable(deliverable))?;

        if nodes.len() != 1 {
            return Err(EngineError::AmbiguousDeliverable {
                deliverable,
                count: nodes.len(),
            });
        }

        Ok(*nodes.iter().next().expect("len checked above"))
    }
}
