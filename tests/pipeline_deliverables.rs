use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDate;

use firedag::assessment::{DeliverableOutput, PostFireAssessment};
use firedag::config::{AssessmentSection, ConfigFile, ExportSection, WindowSection};
use firedag::dag::{Deliverable, Node};
use firedag::engine::{Engine, ExecutionContext, RunInputs};
use firedag::geometry::Region;
use firedag::provider::{ClassArea, InMemoryProvider, Scene};

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

/// Scenes on both sides of a fire running 2024-09-01 to 2024-11-08.
fn seeded_provider() -> Arc<InMemoryProvider> {
    Arc::new(
        InMemoryProvider::new()
            .with_scenes(vec![
                scene("pre_a", "2024-08-05", 12.0),
                scene("pre_b", "2024-08-20", 3.0),
                scene("post_a", "2024-11-10", 7.0),
                scene("post_b", "2024-12-01", 25.0),
            ])
            .with_class_areas(vec![
                ClassArea {
                    class: 0,
                    area_ha: 600.0,
                },
                ClassArea {
                    class: 1,
                    area_ha: 250.0,
                },
                ClassArea {
                    class: 3,
                    area_ha: 150.0,
                },
            ]),
    )
}

fn config(deliverables: Option<Vec<Deliverable>>, export: Option<ExportSection>) -> ConfigFile {
    ConfigFile {
        assessment: AssessmentSection {
            geojson: "unused.geojson".into(),
            start_date: "2024-09-01".into(),
            end_date: "2024-11-08".into(),
        },
        window: WindowSection::default(),
        deliverables,
        export,
    }
}

fn inputs(provider: Arc<InMemoryProvider>) -> RunInputs {
    RunInputs {
        region: region(),
        start_date: date("2024-09-01"),
        end_date: date("2024-11-08"),
        buffer_days: 30,
        cloud_threshold: 100.0,
        provider,
    }
}

#[test]
fn full_assessment_produces_every_deliverable() -> TestResult {
    let provider = seeded_provider();
    let assessment = PostFireAssessment::new(provider.clone(), region(), &config(None, None))?;

    let outputs = assessment.run()?;
    assert_eq!(outputs.len(), Deliverable::ALL.len());

    // Each shared upstream step ran exactly once.
    assert_eq!(provider.op_count("gather_scenes"), 1);
    assert_eq!(provider.op_count("mosaic"), 2);
    // NDVI pre/post + NBR pre/post.
    assert_eq!(provider.op_count("normalized_difference"), 4);
    // dNDVI + dNBR.
    assert_eq!(provider.op_count("subtract"), 2);
    assert_eq!(provider.op_count("classify"), 1);
    assert_eq!(provider.op_count("class_area"), 1);
    // One rendering per visual deliverable, none exported without [export].
    assert_eq!(provider.op_count("render"), 4);
    assert_eq!(provider.op_count("export_geotiff"), 0);

    match &outputs[&Deliverable::BurnedAreaStatistics] {
        DeliverableOutput::Statistics(stats) => {
            assert_eq!(stats.total_area_ha(), 1000.0);
            assert_eq!(stats.burned_area_ha(), 400.0);
        }
        other => panic!("expected statistics, got {other:?}"),
    }

    assert!(matches!(
        outputs[&Deliverable::Dnbr],
        DeliverableOutput::Raster { export: None, .. }
    ));
    assert!(matches!(
        outputs[&Deliverable::BurnSeverityVisual],
        DeliverableOutput::Visual { .. }
    ));
    Ok(())
}

#[test]
fn scientific_rasters_are_exported_when_destination_configured() -> TestResult {
    let provider = seeded_provider();
    let export = ExportSection {
        bucket: "fire-products".into(),
        prefix: "jatai/".into(),
    };
    let cfg = config(Some(vec![Deliverable::Dnbr, Deliverable::DnbrVisual]), Some(export));
    let assessment = PostFireAssessment::new(provider.clone(), region(), &cfg)?;

    let outputs = assessment.run()?;

    match &outputs[&Deliverable::Dnbr] {
        DeliverableOutput::Raster {
            export: Some(reference),
            ..
        } => {
            assert_eq!(
                reference.url,
                "https://storage.example.com/fire-products/jatai/dnbr.tif"
            );
            assert!(!reference.task_id.is_empty());
        }
        other => panic!("expected exported raster, got {other:?}"),
    }

    // Visuals are rendered, not exported.
    assert_eq!(provider.op_count("export_geotiff"), 1);
    assert_eq!(provider.op_count("render"), 1);
    Ok(())
}

#[test]
fn two_deliverables_sharing_a_node_execute_it_once() -> TestResult {
    // Scenario: dnbr and dnbr_visual are both backed by the dnbr node,
    // which depends on both NBR parents.
    let provider = seeded_provider();
    let engine = Engine::builtin();
    let mut ctx = ExecutionContext::new(inputs(provider.clone()));

    let outputs = engine.run(&[Deliverable::Dnbr, Deliverable::DnbrVisual], &mut ctx)?;

    assert_eq!(provider.op_count("gather_scenes"), 1);
    assert_eq!(provider.op_count("subtract"), 1);
    assert_eq!(
        outputs[&Deliverable::Dnbr],
        outputs[&Deliverable::DnbrVisual]
    );

    // The cache keeps every intermediate for provenance inspection.
    for node in [
        Node::CollectionGathering,
        Node::PreFireCollection,
        Node::PostFireCollection,
        Node::PreFireMosaic,
        Node::PostFireMosaic,
        Node::NbrPreFire,
        Node::NbrPostFire,
        Node::Dnbr,
    ] {
        assert!(ctx.contains(node), "expected {node} in cache");
    }
    Ok(())
}

#[test]
fn repeated_runs_reuse_nothing_across_contexts() -> TestResult {
    let provider = seeded_provider();
    let engine = Engine::builtin();

    let mut first = ExecutionContext::new(inputs(provider.clone()));
    engine.run(&[Deliverable::NbrPreFire], &mut first)?;

    let mut second = ExecutionContext::new(inputs(provider.clone()));
    engine.run(&[Deliverable::NbrPreFire], &mut second)?;

    // A fresh context means a fresh gather; no hidden cross-run cache.
    assert_eq!(provider.op_count("gather_scenes"), 2);
    Ok(())
}

#[test]
fn statistics_request_only_runs_the_severity_chain() -> TestResult {
    let provider = seeded_provider();
    let engine = Engine::builtin();
    let mut ctx = ExecutionContext::new(inputs(provider.clone()));

    engine.run(&[Deliverable::BurnedAreaStatistics], &mut ctx)?;

    // NBR chain only: no NDVI, RGB or RBR work.
    assert_eq!(provider.op_count("normalized_difference"), 2);
    assert_eq!(provider.op_count("select_bands"), 0);
    assert_eq!(provider.op_count("divide"), 0);
    assert!(!ctx.contains(Node::NdviPreFire));
    assert!(!ctx.contains(Node::Rbr));
    Ok(())
}
