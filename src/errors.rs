// src/errors.rs

//! Crate-wide error types.
//!
//! The engine has a small, closed failure taxonomy, so it gets a structured
//! enum; application edges (config loading, geometry parsing, the compute
//! provider) use `anyhow` with context instead.

pub use anyhow::{Error, Result};
use thiserror::Error as ThisError;

use crate::dag::node::{Deliverable, Node};

/// Failure modes of the resolution and execution engine.
///
/// Configuration and structural errors are always fatal to the run and are
/// surfaced before (or instead of) any executor invocation they would have
/// affected; executor failures abort the run at the failing node.
#[derive(Debug, ThisError)]
pub enum EngineError {
    /// A node was referenced (requested, or named as a parent) but never
    /// declared in the dependency graph.
    #[error("node '{0}' is not declared in the dependency graph")]
    UndefinedNode(Node),

    /// The dependency graph is not acyclic; `0` is a node on the cycle.
    #[error("circular dependency detected at node '{0}'")]
    CircularDependency(Node),

    /// A requested deliverable has no entry in the deliverable map.
    #[error("deliverable '{0}' has no backing node configured")]
    UnmappedDeliverable(Deliverable),

    /// A deliverable maps to zero or several nodes; projection needs
    /// exactly one.
    #[error("deliverable '{deliverable}' maps to {count} nodes, expected exactly one")]
    AmbiguousDeliverable {
        deliverable: Deliverable,
        count: usize,
    },

    /// The plan named a node for which no executor is registered.
    #[error("no executor registered for node '{0}'")]
    MissingExecutor(Node),

    /// An executor asked for a parent value that is not in the cache. This
    /// is an internal ordering bug (a node ran before its parent), never a
    /// user error.
    #[error("required parent '{0}' has not been computed yet")]
    ParentUnavailable(Node),

    /// An executor failed while producing its node's value.
    #[error("node '{node}' failed")]
    NodeFailed {
        node: Node,
        #[source]
        source: anyhow::Error,
    },
}
