//! Error types for the keras2tfjs library.
//!
//! The export pipeline is a strict stage sequence, so its error type maps
//! one-to-one onto the stages: precondition failures from preparation,
//! [`tfjs_auto::DepError`] from dependency resolution, and
//! [`ConversionFailure`] from the conversion collaborator. Every variant is
//! terminal; the driver short-circuits on the first `Err` and nothing is
//! retried beyond the pip→conda fallback inside dependency resolution.

use std::path::PathBuf;
use thiserror::Error;

use crate::converter::ConversionFailure;

/// All errors returned by the keras2tfjs library.
#[derive(Debug, Error)]
pub enum ExportError {
    // ── Precondition errors ───────────────────────────────────────────────
    /// The model artifact was not found at the configured path.
    ///
    /// Carries the working directory and a listing of the models directory
    /// (or a note that the directory itself is absent) so the operator can
    /// see at a glance what the process was actually looking at.
    #[error(
        "Model file not found: '{path}'\n\
Current directory: {cwd}\n\
Contents of '{dir}': {listing}"
    )]
    ModelNotFound {
        path: PathBuf,
        cwd: PathBuf,
        dir: PathBuf,
        listing: String,
    },

    /// The model artifact exists but is zero bytes.
    #[error("Model file '{path}' is empty\nRe-export it from your training environment.")]
    ModelEmpty { path: PathBuf },

    /// The models directory was missing and could not be created.
    #[error("Failed to create models directory '{path}': {source}")]
    ModelDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model artifact exists but could not be read.
    #[error("Cannot read model file '{path}': {source}")]
    ModelUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Dependency errors ─────────────────────────────────────────────────
    /// A required external library was unavailable after both install
    /// backends were tried. The message includes manual remediation steps.
    #[error(transparent)]
    Dependency(#[from] tfjs_auto::DepError),

    // ── Conversion errors ─────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The conversion collaborator failed. The inner value carries the
    /// failure message and the full diagnostic trace.
    #[error(transparent)]
    Conversion(#[from] ConversionFailure),

    /// The collaborator reported success but produced no output files.
    #[error("Conversion reported success but '{output_dir}' contains no files")]
    EmptyOutput { output_dir: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_display_includes_listing_context() {
        let e = ExportError::ModelNotFound {
            path: PathBuf::from("models/model.keras"),
            cwd: PathBuf::from("/work"),
            dir: PathBuf::from("models"),
            listing: "other.keras, notes.txt".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("models/model.keras"), "got: {msg}");
        assert!(msg.contains("/work"), "got: {msg}");
        assert!(msg.contains("other.keras"), "got: {msg}");
    }

    #[test]
    fn empty_model_display() {
        let e = ExportError::ModelEmpty {
            path: PathBuf::from("models/model.keras"),
        };
        assert!(e.to_string().contains("is empty"));
    }

    #[test]
    fn conversion_failure_display_keeps_message() {
        let e = ExportError::from(ConversionFailure {
            message: "unsupported layer: Lambda".into(),
            trace: "Traceback (most recent call last):\n  ...".into(),
        });
        assert!(e.to_string().contains("unsupported layer"));
    }
}
