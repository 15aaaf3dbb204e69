// src/products/mod.rs

//! Node executors: the body of each pipeline step.
//!
//! Every executor is a stateless function from context to value. Heavy
//! lifting is delegated to the [`ComputeProvider`]; the executors only
//! thread handles, read run inputs and enforce domain preconditions (e.g.
//! an empty scene window is a failure, not an empty mosaic).
//!
//! [`ComputeProvider`]: crate::provider::ComputeProvider

pub mod statistics;
pub mod windows;

use anyhow::{Result, bail};

use crate::dag::node::Node;
use crate::engine::context::{ExecutionContext, ProductValue};
use crate::engine::registry::ExecutorRegistry;
use crate::provider::DateWindow;
use crate::products::statistics::{DNBR_SEVERITY_THRESHOLDS, format_area_statistics};
use crate::products::windows::fire_windows;

/// Reflectance band names produced by the provider's preprocessing.
const RED: &str = "B4_refl";
const GREEN: &str = "B3_refl";
const BLUE: &str = "B2_refl";
const NIR: &str = "B8_refl";
const SWIR: &str = "B12_refl";

/// Denominator offset keeping RBR finite where pre-fire NBR approaches -1.
const RBR_OFFSET: f64 = 1.001;

/// The production executor table: one executor per catalog node.
pub fn builtin_registry() -> ExecutorRegistry {
    let mut registry = ExecutorRegistry::new();

    registry.register(Node::CollectionGathering, gather_collection);
    registry.register(Node::PreFireCollection, pre_fire_collection);
    registry.register(Node::PostFireCollection, post_fire_collection);
    registry.register(Node::PreFireMosaic, pre_fire_mosaic);
    registry.register(Node::PostFireMosaic, post_fire_mosaic);
    registry.register(Node::RgbPreFire, rgb_pre_fire);
    registry.register(Node::RgbPostFire, rgb_post_fire);
    registry.register(Node::NdviPreFire, ndvi_pre_fire);
    registry.register(Node::NdviPostFire, ndvi_post_fire);
    registry.register(Node::Dndvi, dndvi);
    registry.register(Node::NbrPreFire, nbr_pre_fire);
    registry.register(Node::NbrPostFire, nbr_post_fire);
    registry.register(Node::Dnbr, dnbr);
    registry.register(Node::Rbr, rbr);
    registry.register(Node::BurnSeverity, burn_severity);
    registry.register(Node::BurnedAreaStatistics, burned_area_statistics);

    registry
}

// ── Stage 1: ingestion and temporal collections ──

fn gather_collection(ctx: &ExecutionContext) -> Result<ProductValue> {
    let inputs = ctx.inputs();
    let scenes = ctx
        .provider()
        .gather_scenes(&inputs.region, inputs.cloud_threshold)?;
    Ok(ProductValue::Scenes(scenes))
}

/// Filter the gathered collection down to `window`, failing when no scene
/// falls inside it (a mosaic of nothing is never a useful answer).
fn filtered_collection(
    ctx: &ExecutionContext,
    window: &DateWindow,
    label: &str,
) -> Result<ProductValue> {
    let collection = ctx.require(Node::CollectionGathering)?.as_scenes()?;
    let filtered = collection.filter_date(window);

    if filtered.is_empty() {
        bail!(
            "no scenes found for {label} window {} to {}",
            window.start,
            window.end
        );
    }

    Ok(ProductValue::Scenes(filtered))
}

fn pre_fire_collection(ctx: &ExecutionContext) -> Result<ProductValue> {
    let inputs = ctx.inputs();
    let windows = fire_windows(inputs.start_date, inputs.end_date, inputs.buffer_days)?;
    filtered_collection(ctx, &windows.before, "pre-fire")
}

fn post_fire_collection(ctx: &ExecutionContext) -> Result<ProductValue> {
    let inputs = ctx.inputs();
    let windows = fire_windows(inputs.start_date, inputs.end_date, inputs.buffer_days)?;
    filtered_collection(ctx, &windows.after, "post-fire")
}

// ── Stage 1: mosaics ──

fn pre_fire_mosaic(ctx: &ExecutionContext) -> Result<ProductValue> {
    let scenes = ctx.require(Node::PreFireCollection)?.as_scenes()?;
    Ok(ProductValue::Raster(ctx.provider().mosaic(scenes)?))
}

fn post_fire_mosaic(ctx: &ExecutionContext) -> Result<ProductValue> {
    let scenes = ctx.require(Node::PostFireCollection)?.as_scenes()?;
    Ok(ProductValue::Raster(ctx.provider().mosaic(scenes)?))
}

// ── Stage 1: RGB composites ──

fn rgb_pre_fire(ctx: &ExecutionContext) -> Result<ProductValue> {
    let mosaic = ctx.require(Node::PreFireMosaic)?.as_raster()?;
    let rgb = ctx
        .provider()
        .select_bands(mosaic, &[RED, GREEN, BLUE], "rgb_pre")?;
    Ok(ProductValue::Raster(rgb))
}

fn rgb_post_fire(ctx: &ExecutionContext) -> Result<ProductValue> {
    let mosaic = ctx.require(Node::PostFireMosaic)?.as_raster()?;
    let rgb = ctx
        .provider()
        .select_bands(mosaic, &[RED, GREEN, BLUE], "rgb_post")?;
    Ok(ProductValue::Raster(rgb))
}

// ── Stage 2: NDVI ──

fn ndvi_pre_fire(ctx: &ExecutionContext) -> Result<ProductValue> {
    let mosaic = ctx.require(Node::PreFireMosaic)?.as_raster()?;
    let ndvi = ctx
        .provider()
        .normalized_difference(mosaic, NIR, RED, "ndvi_pre")?;
    Ok(ProductValue::Raster(ndvi))
}

fn ndvi_post_fire(ctx: &ExecutionContext) -> Result<ProductValue> {
    let mosaic = ctx.require(Node::PostFireMosaic)?.as_raster()?;
    let ndvi = ctx
        .provider()
        .normalized_difference(mosaic, NIR, RED, "ndvi_post")?;
    Ok(ProductValue::Raster(ndvi))
}

/// dNDVI = NDVI_pre - NDVI_post.
fn dndvi(ctx: &ExecutionContext) -> Result<ProductValue> {
    let pre = ctx.require(Node::NdviPreFire)?.as_raster()?;
    let post = ctx.require(Node::NdviPostFire)?.as_raster()?;
    Ok(ProductValue::Raster(
        ctx.provider().subtract(pre, post, "dndvi")?,
    ))
}

// ── Stage 2: NBR ──

fn nbr_pre_fire(ctx: &ExecutionContext) -> Result<ProductValue> {
    let mosaic = ctx.require(Node::PreFireMosaic)?.as_raster()?;
    let nbr = ctx
        .provider()
        .normalized_difference(mosaic, NIR, SWIR, "nbr_pre")?;
    Ok(ProductValue::Raster(nbr))
}

fn nbr_post_fire(ctx: &ExecutionContext) -> Result<ProductValue> {
    let mosaic = ctx.require(Node::PostFireMosaic)?.as_raster()?;
    let nbr = ctx
        .provider()
        .normalized_difference(mosaic, NIR, SWIR, "nbr_post")?;
    Ok(ProductValue::Raster(nbr))
}

/// dNBR = NBR_pre - NBR_post.
fn dnbr(ctx: &ExecutionContext) -> Result<ProductValue> {
    let pre = ctx.require(Node::NbrPreFire)?.as_raster()?;
    let post = ctx.require(Node::NbrPostFire)?.as_raster()?;
    Ok(ProductValue::Raster(
        ctx.provider().subtract(pre, post, "dnbr")?,
    ))
}

// ── Stage 3: fire indices ──

/// RBR = dNBR / (NBR_pre + 1.001).
fn rbr(ctx: &ExecutionContext) -> Result<ProductValue> {
    let dnbr = ctx.require(Node::Dnbr)?.as_raster()?;
    let nbr_pre = ctx.require(Node::NbrPreFire)?.as_raster()?;

    let provider = ctx.provider();
    let denominator = provider.add_constant(nbr_pre, RBR_OFFSET, "nbr_pre_offset")?;
    Ok(ProductValue::Raster(
        provider.divide(dnbr, &denominator, "rbr")?,
    ))
}

/// dNBR classified into the five severity classes.
fn burn_severity(ctx: &ExecutionContext) -> Result<ProductValue> {
    let dnbr = ctx.require(Node::Dnbr)?.as_raster()?;
    let severity = ctx
        .provider()
        .classify(dnbr, &DNBR_SEVERITY_THRESHOLDS, "severity")?;
    Ok(ProductValue::Raster(severity))
}

// ── Stage 4: statistics ──

fn burned_area_statistics(ctx: &ExecutionContext) -> Result<ProductValue> {
    let severity = ctx.require(Node::BurnSeverity)?.as_raster()?;
    let raw = ctx.provider().class_area(severity, &ctx.inputs().region)?;
    Ok(ProductValue::Statistics(format_area_statistics(&raw)?))
}
