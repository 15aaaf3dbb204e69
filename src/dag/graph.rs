// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use petgraph::dot::{Config, Dot};
use petgraph::graphmap::DiGraphMap;

use crate::dag::node::Node;
use crate::errors::EngineError;

/// Static mapping from each node to the set of nodes it directly requires.
///
/// Parents are "required-before" nodes. An empty parent set marks a source
/// node (currently only [`Node::CollectionGathering`]). The map is plain
/// data: acyclicity is *not* assumed here, the resolver detects violations
/// at resolution time.
///
/// `BTreeMap`/`BTreeSet` keep iteration in `Node`'s declaration order, which
/// is what makes resolution deterministic for a given request.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    parents: BTreeMap<Node, BTreeSet<Node>>,
}

impl DependencyGraph {
    /// The production pipeline graph.
    pub fn builtin() -> Self {
        let mut g = DependencyGraph::default();

        // Ingestion.
        g.declare(Node::CollectionGathering, []);

        // Temporal collections.
        g.declare(Node::PreFireCollection, [Node::CollectionGathering]);
        g.declare(Node::PostFireCollection, [Node::CollectionGathering]);

        // Mosaics.
        g.declare(Node::PreFireMosaic, [Node::PreFireCollection]);
        g.declare(Node::PostFireMosaic, [Node::PostFireCollection]);

        // RGB composites.
        g.declare(Node::RgbPreFire, [Node::PreFireMosaic]);
        g.declare(Node::RgbPostFire, [Node::PostFireMosaic]);

        // NDVI.
        g.declare(Node::NdviPreFire, [Node::PreFireMosaic]);
        g.declare(Node::NdviPostFire, [Node::PostFireMosaic]);
        g.declare(Node::Dndvi, [Node::NdviPreFire, Node::NdviPostFire]);

        // NBR.
        g.declare(Node::NbrPreFire, [Node::PreFireMosaic]);
        g.declare(Node::NbrPostFire, [Node::PostFireMosaic]);
        g.declare(Node::Dnbr, [Node::NbrPreFire, Node::NbrPostFire]);

        // Fire indices.
        g.declare(Node::Rbr, [Node::Dnbr, Node::NbrPreFire]);
        g.declare(Node::BurnSeverity, [Node::Dnbr]);
        g.declare(Node::BurnedAreaStatistics, [Node::BurnSeverity]);

        g
    }

    /// Declare a node and its direct parents. Later declarations of the same
    /// node replace earlier ones.
    pub fn declare(&mut self, node: Node, parents: impl IntoIterator<Item = Node>) {
        self.parents.insert(node, parents.into_iter().collect());
    }

    /// Direct parents of `node`.
    ///
    /// A node absent from the graph is a missing *definition*, not a leaf:
    /// leaves are declared with an explicit empty parent set. Returning an
    /// empty default here would make a configuration bug indistinguishable
    /// from an intentional source node.
    pub fn parents_of(&self, node: Node) -> Result<&BTreeSet<Node>, EngineError> {
        self.parents
            .get(&node)
            .ok_or(EngineError::UndefinedNode(node))
    }

    /// All declared nodes, in `Node` order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.parents.keys().copied()
    }

    /// Render the graph in GraphViz DOT format for diagnostics.
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for node in self.parents.keys() {
            graph.add_node(node.name());
        }
        for (node, parents) in self.parents.iter() {
            for parent in parents {
                graph.add_edge(parent.name(), node.name(), ());
            }
        }

        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_graph_defines_every_parent() {
        let graph = DependencyGraph::builtin();
        for node in graph.nodes().collect::<Vec<_>>() {
            for parent in graph.parents_of(node).unwrap().clone() {
                assert!(
                    graph.parents_of(parent).is_ok(),
                    "parent {parent} of {node} is not itself declared"
                );
            }
        }
    }

    #[test]
    fn undefined_node_is_an_error_not_a_leaf() {
        let mut graph = DependencyGraph::default();
        graph.declare(Node::Dnbr, [Node::NbrPreFire]);

        let err = graph.parents_of(Node::NbrPreFire).unwrap_err();
        assert!(matches!(err, EngineError::UndefinedNode(Node::NbrPreFire)));
    }

    #[test]
    fn dot_output_contains_edges() {
        let dot = DependencyGraph::builtin().to_dot();
        assert!(dot.contains("collection_gathering"));
        assert!(dot.contains("->"));
    }
}
