// src/lib.rs

//! Dependency-resolving execution engine for post-fire remote-sensing
//! deliverables.
//!
//! The library turns a set of requested deliverables (mosaics, spectral
//! indices, burn-severity maps, area statistics) into a minimal, ordered,
//! deduplicated execution plan over a static dependency graph, executes
//! each node at most once against a [`provider::ComputeProvider`], and maps
//! cached values back to the requested deliverables.
//!
//! Hosting applications embed [`assessment::PostFireAssessment`] with a
//! real provider client. The bundled binary carries no provider; it loads
//! and validates a run request and prints the resolved plan.

pub mod assessment;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod geometry;
pub mod logging;
pub mod products;
pub mod provider;
pub mod visual;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::graph::DependencyGraph;
use crate::engine::orchestrator::Engine;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the run request, then prints the resolved execution
/// plan (or, with `--dot`, the dependency graph).
pub fn run(args: CliArgs) -> Result<()> {
    if args.dot {
        print!("{}", DependencyGraph::builtin().to_dot());
        return Ok(());
    }

    let cfg = load_and_validate(&args.config)?;
    print_plan(&cfg)?;
    Ok(())
}

/// Print requested deliverables, their backing nodes, and the execution
/// order the engine would use.
fn print_plan(cfg: &ConfigFile) -> Result<()> {
    let engine = Engine::builtin();
    let deliverables = cfg.effective_deliverables();

    println!("firedag plan");
    println!(
        "  window: {} to {} (buffer {} days, cloud <= {}%)",
        cfg.assessment.start_date,
        cfg.assessment.end_date,
        cfg.window.buffer_days,
        cfg.window.cloud_threshold
    );
    println!();

    println!("deliverables ({}):", deliverables.len());
    for &deliverable in &deliverables {
        let node = engine.deliverables().backing_node(deliverable)?;
        println!("  - {deliverable} <- {node}");
    }
    println!();

    let plan = engine.plan(&deliverables)?;
    println!("execution order ({} nodes):", plan.len());
    for (i, node) in plan.iter().enumerate() {
        println!("  {:>2}. {node}", i + 1);
    }

    if let Some(export) = &cfg.export {
        println!();
        println!(
            "export: gs://{}/{}<deliverable>.tif",
            export.bucket, export.prefix
        );
    }

    debug!("plan printed, nothing executed");
    Ok(())
}
