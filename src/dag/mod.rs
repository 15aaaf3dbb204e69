// src/dag/mod.rs

//! Pipeline structure as data.
//!
//! - [`node`] is the closed catalog of computation steps and deliverables.
//! - [`graph`] maps each node to the nodes it directly requires.
//! - [`deliverables`] maps each user-facing deliverable to its backing node.
//! - [`resolver`] turns a requested node set into an ordered execution plan.

pub mod deliverables;
pub mod graph;
pub mod node;
pub mod resolver;

pub use deliverables::DeliverableMap;
pub use graph::DependencyGraph;
pub use node::{Deliverable, Node};
pub use resolver::resolve;
