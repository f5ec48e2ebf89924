//! The conversion collaborator seam.
//!
//! Model deserialization and re-serialization are entirely the external
//! tooling's job; this crate treats the whole conversion as one opaque call
//! behind [`ModelConverter`]. The narrow trait keeps the surrounding control
//! flow testable with a stub, without the heavy Python stack installed.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::output::OutputManifest;

/// A conversion failure, as reported by the collaborator.
///
/// `message` is the short human-readable cause; `trace` is the full
/// diagnostic output (for the CLI converter, the Python traceback on
/// stderr). The trace is printed verbatim on failure and never parsed.
#[derive(Debug, Clone, Error)]
#[error("Conversion failed: {message}")]
pub struct ConversionFailure {
    pub message: String,
    pub trace: String,
}

/// The external model-format conversion collaborator.
///
/// One opaque operation with two outcomes: on success the output files have
/// materialized in `output_dir` and the returned manifest enumerates them;
/// on failure the error carries a message and a diagnostic trace. A failed
/// call may leave a half-written output directory behind; no cleanup is
/// performed.
pub trait ModelConverter {
    fn convert(&self, model: &Path, output_dir: &Path)
        -> Result<OutputManifest, ConversionFailure>;
}

/// Production converter: shells out to `tensorflowjs_converter`.
pub struct TfjsCliConverter {
    command: String,
}

impl Default for TfjsCliConverter {
    fn default() -> Self {
        Self::new(tfjs_auto::CONVERTER_COMMAND)
    }
}

impl TfjsCliConverter {
    /// Use an explicit converter command (e.g. an absolute path).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl ModelConverter for TfjsCliConverter {
    fn convert(
        &self,
        model: &Path,
        output_dir: &Path,
    ) -> Result<OutputManifest, ConversionFailure> {
        info!(
            "converting '{}' -> '{}'",
            model.display(),
            output_dir.display()
        );

        let output = Command::new(&self.command)
            .arg("--input_format=keras")
            .arg(model)
            .arg(output_dir)
            .output()
            .map_err(|e| ConversionFailure {
                message: format!("failed to run '{}': {e}", self.command),
                trace: String::new(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            // Python tracebacks put the actual error on the last line.
            let message = stderr
                .lines()
                .rev()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or("converter exited with an error")
                .to_string();
            return Err(ConversionFailure {
                message,
                trace: stderr,
            });
        }

        debug!("converter stdout: {}", String::from_utf8_lossy(&output.stdout));

        OutputManifest::scan(output_dir).map_err(|e| ConversionFailure {
            message: format!("cannot enumerate '{}': {e}", output_dir.display()),
            trace: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failure_is_a_conversion_failure_with_empty_trace() {
        let converter = TfjsCliConverter::new("definitely-not-a-real-converter");
        let err = converter
            .convert(Path::new("models/model.keras"), Path::new("out"))
            .unwrap_err();
        assert!(err.message.contains("definitely-not-a-real-converter"));
        assert!(err.trace.is_empty());
    }
}
