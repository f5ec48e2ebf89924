//! Observer trait for pipeline events and the operator pause.
//!
//! The library itself never prints; all operator-facing messaging goes
//! through an injected [`ExportObserver`]. The CLI implements it with
//! banners and a spinner; tests implement it to record events; embedders
//! can forward events wherever they like.
//!
//! The one blocking hook is [`ExportObserver::await_model_placement`]: when
//! the models directory had to be created, interactive runs pause there
//! until the operator confirms the file has been copied in. The default
//! implementation returns immediately, so non-interactive and embedded
//! use never blocks.

use std::path::Path;

use crate::output::OutputManifest;

/// The three pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    /// Precondition checks on the model artifact.
    Prepare,
    /// Probe-and-install of the external libraries.
    Dependencies,
    /// The opaque conversion call.
    Convert,
}

impl ExportStage {
    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ExportStage::Prepare => "Checking model file",
            ExportStage::Dependencies => "Resolving dependencies",
            ExportStage::Convert => "Converting model",
        }
    }
}

/// Receives pipeline events. All methods default to no-ops so implementors
/// only override what they care about.
pub trait ExportObserver {
    /// Called as each stage begins.
    fn on_stage_start(&self, stage: ExportStage) {
        let _ = stage;
    }

    /// The models directory was missing and has just been created.
    /// `await_model_placement` follows when the run is interactive.
    fn on_models_dir_created(&self, dir: &Path) {
        let _ = dir;
    }

    /// Block until the operator confirms the model file is in place.
    /// Only called on interactive runs.
    fn await_model_placement(&self, dir: &Path) {
        let _ = dir;
    }

    /// The model artifact was found; `size_bytes` is its on-disk size.
    fn on_model_found(&self, path: &Path, size_bytes: u64) {
        let _ = (path, size_bytes);
    }

    /// An external library resolved, either found or freshly installed.
    fn on_dependency_ready(&self, package: &str, version: Option<&str>, installed: bool) {
        let _ = (package, version, installed);
    }

    /// The conversion call returned successfully.
    fn on_conversion_done(&self, manifest: &OutputManifest) {
        let _ = manifest;
    }
}

/// No-op observer, used when no reporting is wanted.
pub struct NoopObserver;

impl ExportObserver for NoopObserver {}
