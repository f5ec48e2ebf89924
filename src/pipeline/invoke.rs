//! Conversion invocation: output directory bootstrap and the opaque call.
//!
//! The output directory is created here — and only here — so a run that
//! fails its preconditions never leaves an empty output directory behind.
//! On conversion failure nothing is cleaned up: a half-written directory is
//! more useful for diagnosis than an empty one.

use tracing::info;

use crate::config::ExportConfig;
use crate::converter::ModelConverter;
use crate::error::ExportError;
use crate::observer::ExportObserver;
use crate::output::OutputManifest;
use crate::pipeline::prepare::ModelArtifact;

/// Create the output directory (idempotent) and run the conversion.
///
/// An empty result set from a "successful" conversion is treated as a
/// failure: the caller was promised output files.
pub fn run_conversion(
    artifact: &ModelArtifact,
    config: &ExportConfig,
    converter: &dyn ModelConverter,
    observer: &dyn ExportObserver,
) -> Result<OutputManifest, ExportError> {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| ExportError::OutputDirFailed {
        path: config.output_dir.clone(),
        source,
    })?;

    let manifest = converter.convert(&artifact.path, &config.output_dir)?;

    if manifest.is_empty() {
        return Err(ExportError::EmptyOutput {
            output_dir: config.output_dir.clone(),
        });
    }

    info!(
        "conversion produced {} files ({} bytes)",
        manifest.files.len(),
        manifest.total_size_bytes()
    );
    observer.on_conversion_done(&manifest);
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConversionFailure;
    use crate::observer::NoopObserver;
    use crate::output::OutputFile;
    use std::path::Path;

    struct StubConverter {
        result: Result<Vec<(&'static str, usize)>, ConversionFailure>,
    }

    impl ModelConverter for StubConverter {
        fn convert(
            &self,
            _model: &Path,
            output_dir: &Path,
        ) -> Result<OutputManifest, ConversionFailure> {
            match &self.result {
                Ok(files) => {
                    for (name, size) in files {
                        std::fs::write(output_dir.join(name), vec![0u8; *size]).unwrap();
                    }
                    Ok(OutputManifest {
                        files: files
                            .iter()
                            .map(|(name, size)| OutputFile {
                                name: (*name).to_string(),
                                size_bytes: *size as u64,
                            })
                            .collect(),
                    })
                }
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            path: "models/model.keras".into(),
            size_bytes: 1,
        }
    }

    #[test]
    fn creates_output_dir_and_returns_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("public/model_tfjs");
        let config = ExportConfig::builder().output_dir(&out).build();
        let converter = StubConverter {
            result: Ok(vec![("model.json", 64), ("group1-shard1of1.bin", 1024)]),
        };

        let manifest = run_conversion(&artifact(), &config, &converter, &NoopObserver).unwrap();
        assert!(out.is_dir());
        assert_eq!(manifest.files.len(), 2);
        assert!(manifest.has_model_json());
    }

    #[test]
    fn existing_output_dir_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        let config = ExportConfig::builder().output_dir(&out).build();
        let converter = StubConverter {
            result: Ok(vec![("model.json", 8)]),
        };

        run_conversion(&artifact(), &config, &converter, &NoopObserver).unwrap();
    }

    #[test]
    fn converter_failure_propagates_and_leaves_partial_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let config = ExportConfig::builder().output_dir(&out).build();
        let converter = StubConverter {
            result: Err(ConversionFailure {
                message: "bad model topology".into(),
                trace: "Traceback ...".into(),
            }),
        };

        let err = run_conversion(&artifact(), &config, &converter, &NoopObserver).unwrap_err();
        assert!(matches!(err, ExportError::Conversion(_)));
        // No cleanup: the directory created before the call stays.
        assert!(out.is_dir());
    }

    #[test]
    fn empty_result_set_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ExportConfig::builder()
            .output_dir(tmp.path().join("out"))
            .build();
        let converter = StubConverter { result: Ok(vec![]) };

        let err = run_conversion(&artifact(), &config, &converter, &NoopObserver).unwrap_err();
        assert!(matches!(err, ExportError::EmptyOutput { .. }));
    }
}
