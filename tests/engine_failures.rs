use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDate;

use firedag::dag::{Deliverable, DeliverableMap, DependencyGraph, Node};
use firedag::engine::{Engine, ExecutionContext, RunInputs};
use firedag::errors::EngineError;
use firedag::geometry::Region;
use firedag::products::builtin_registry;
use firedag::provider::{InMemoryProvider, Scene};

type TestResult = Result<(), Box<dyn Error>>;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn scene(id: &str, acquired: &str, cloud_pct: f64) -> Scene {
    Scene {
        id: id.to_string(),
        acquired: date(acquired),
        cloud_pct,
    }
}

fn region() -> Region {
    Region::Polygon(vec![vec![
        [-51.7, -17.9],
        [-51.6, -17.9],
        [-51.6, -17.8],
        [-51.7, -17.9],
    ]])
}

fn inputs(provider: Arc<InMemoryProvider>, cloud_threshold: f64) -> RunInputs {
    RunInputs {
        region: region(),
        start_date: date("2024-09-01"),
        end_date: date("2024-11-08"),
        buffer_days: 30,
        cloud_threshold,
        provider,
    }
}

#[test]
fn empty_post_fire_window_fails_the_run() -> TestResult {
    // Pre-fire imagery only; the post-fire window has nothing.
    let provider = Arc::new(
        InMemoryProvider::new().with_scenes(vec![scene("pre_only", "2024-08-10", 5.0)]),
    );
    let engine = Engine::builtin();
    let mut ctx = ExecutionContext::new(inputs(provider.clone(), 100.0));

    let err = engine
        .run(&[Deliverable::Dnbr], &mut ctx)
        .expect_err("post-fire window is empty");

    match err {
        EngineError::NodeFailed { node, source } => {
            assert_eq!(node, Node::PostFireCollection);
            assert!(source.to_string().contains("no scenes found for post-fire"));
        }
        other => panic!("expected NodeFailed, got {other:?}"),
    }

    // The pre-fire branch had already progressed; nothing after the
    // failure ran.
    assert_eq!(provider.op_count("mosaic"), 1);
    assert_eq!(provider.op_count("subtract"), 0);
    Ok(())
}

#[test]
fn cloud_threshold_can_empty_both_windows() -> TestResult {
    let provider = Arc::new(InMemoryProvider::new().with_scenes(vec![
        scene("pre", "2024-08-10", 90.0),
        scene("post", "2024-11-20", 85.0),
    ]));
    let engine = Engine::builtin();
    let mut ctx = ExecutionContext::new(inputs(provider.clone(), 10.0));

    let err = engine
        .run(&[Deliverable::NbrPreFire], &mut ctx)
        .expect_err("every scene is over the threshold");

    assert!(matches!(
        err,
        EngineError::NodeFailed {
            node: Node::PreFireCollection,
            ..
        }
    ));
    Ok(())
}

#[test]
fn unmapped_deliverable_invokes_no_executor() -> TestResult {
    let provider = Arc::new(InMemoryProvider::new());

    // Deliverable table with a hole: rbr has no entry at all.
    let mut deliverables = DeliverableMap::default();
    deliverables.declare(Deliverable::Dnbr, [Node::Dnbr]);

    let engine = Engine::new(
        DependencyGraph::builtin(),
        deliverables,
        builtin_registry(),
    );
    let mut ctx = ExecutionContext::new(inputs(provider.clone(), 100.0));

    let err = engine
        .run(&[Deliverable::Rbr], &mut ctx)
        .expect_err("rbr is not mapped");

    assert!(matches!(
        err,
        EngineError::UnmappedDeliverable(Deliverable::Rbr)
    ));
    assert!(provider.ops().is_empty(), "no provider call may happen");
    Ok(())
}

#[test]
fn ambiguous_deliverable_fails_before_execution() -> TestResult {
    let provider = Arc::new(InMemoryProvider::new());

    let mut deliverables = DeliverableMap::default();
    deliverables.declare(Deliverable::Dnbr, [Node::Dnbr, Node::Rbr]);

    let engine = Engine::new(
        DependencyGraph::builtin(),
        deliverables,
        builtin_registry(),
    );
    let mut ctx = ExecutionContext::new(inputs(provider.clone(), 100.0));

    let err = engine
        .run(&[Deliverable::Dnbr], &mut ctx)
        .expect_err("two backing nodes");

    assert!(matches!(
        err,
        EngineError::AmbiguousDeliverable { count: 2, .. }
    ));
    assert!(provider.ops().is_empty());
    Ok(())
}

#[test]
fn cycle_in_graph_fails_resolution_not_execution() -> TestResult {
    let provider = Arc::new(InMemoryProvider::new());

    let mut graph = DependencyGraph::builtin();
    // Corrupt the graph: dnbr and rbr now require each other.
    graph.declare(Node::Dnbr, [Node::Rbr]);

    let mut deliverables = DeliverableMap::default();
    deliverables.declare(Deliverable::Rbr, [Node::Rbr]);

    let engine = Engine::new(graph, deliverables, builtin_registry());
    let mut ctx = ExecutionContext::new(inputs(provider.clone(), 100.0));

    let err = engine
        .run(&[Deliverable::Rbr], &mut ctx)
        .expect_err("dnbr <-> rbr cycle");

    assert!(matches!(err, EngineError::CircularDependency(_)));
    assert!(provider.ops().is_empty());
    Ok(())
}

#[test]
fn missing_executor_registration_is_fatal() -> TestResult {
    let provider = Arc::new(InMemoryProvider::new());

    let mut graph = DependencyGraph::default();
    graph.declare(Node::CollectionGathering, []);

    let mut deliverables = DeliverableMap::default();
    deliverables.declare(Deliverable::Dnbr, [Node::CollectionGathering]);

    // Empty registry: the node resolves but nothing can execute it.
    let engine = Engine::new(graph, deliverables, firedag::engine::ExecutorRegistry::new());
    let mut ctx = ExecutionContext::new(inputs(provider.clone(), 100.0));

    let err = engine
        .run(&[Deliverable::Dnbr], &mut ctx)
        .expect_err("no executor registered");

    assert!(matches!(
        err,
        EngineError::MissingExecutor(Node::CollectionGathering)
    ));
    Ok(())
}
