// src/engine/mod.rs

//! Execution engine.
//!
//! - [`context`] carries the per-run inputs and the write-once node cache.
//! - [`registry`] maps nodes to their stateless executors.
//! - [`orchestrator`] ties resolver, registry and context together and
//!   projects cached values onto the requested deliverables.

pub mod context;
pub mod orchestrator;
pub mod registry;

pub use context::{ExecutionContext, ProductValue, RunInputs};
pub use orchestrator::Engine;
pub use registry::{ExecutorRegistry, NodeExecutor};
