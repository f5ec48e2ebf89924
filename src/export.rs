//! The export driver: runs the three pipeline stages in order.
//!
//! Each stage returns `Result`; the driver short-circuits on the first
//! failure with `?`. There is no retry loop at this level — the only
//! fallback behaviour in the whole pipeline is the pip→conda staging
//! inside dependency resolution.

use std::time::Instant;

use tracing::info;

use crate::config::ExportConfig;
use crate::converter::{ModelConverter, TfjsCliConverter};
use crate::error::ExportError;
use crate::observer::{ExportObserver, ExportStage, NoopObserver};
use crate::output::{ExportOutput, ExportStats};
use crate::pipeline::{deps, invoke, prepare};
use tfjs_auto::{InstallBackend, Resolver};

/// Run a full export with the production collaborators and no reporting.
///
/// This is the library's one-call entry point. CLI and tests use
/// [`export_with`] to inject their own resolver, converter, and observer.
///
/// # Errors
/// Returns the first stage failure: a precondition error, a
/// dependency-resolution error, or a conversion error. See
/// [`ExportError`] for the taxonomy.
pub fn export(config: &ExportConfig) -> Result<ExportOutput, ExportError> {
    let resolver = Resolver::with_runner(
        config.python.clone(),
        InstallBackend::DEFAULT_ORDER.to_vec(),
        Box::new(tfjs_auto::SystemRunner),
    );
    export_with(config, &resolver, &TfjsCliConverter::default(), &NoopObserver)
}

/// Run a full export with explicit collaborators.
pub fn export_with(
    config: &ExportConfig,
    resolver: &Resolver,
    converter: &dyn ModelConverter,
    observer: &dyn ExportObserver,
) -> Result<ExportOutput, ExportError> {
    let total_start = Instant::now();
    info!("starting export: {}", config.model_path.display());

    // ── Stage 1: model artifact preconditions ────────────────────────────
    observer.on_stage_start(ExportStage::Prepare);
    let prepare_start = Instant::now();
    let artifact = prepare::prepare_model(config, observer)?;
    let prepare_duration_ms = prepare_start.elapsed().as_millis() as u64;

    // ── Stage 2: external libraries ──────────────────────────────────────
    observer.on_stage_start(ExportStage::Dependencies);
    let deps_start = Instant::now();
    let dependency_versions = deps::resolve_dependencies(config, resolver, observer)?;
    let deps_duration_ms = deps_start.elapsed().as_millis() as u64;

    // ── Stage 3: conversion ──────────────────────────────────────────────
    observer.on_stage_start(ExportStage::Convert);
    let convert_start = Instant::now();
    let manifest = invoke::run_conversion(&artifact, config, converter, observer)?;
    let convert_duration_ms = convert_start.elapsed().as_millis() as u64;

    let stats = ExportStats {
        model_size_bytes: artifact.size_bytes,
        prepare_duration_ms,
        deps_duration_ms,
        convert_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "export complete: {} files in {}ms",
        manifest.files.len(),
        stats.total_duration_ms
    );

    Ok(ExportOutput {
        manifest,
        dependency_versions,
        stats,
    })
}
