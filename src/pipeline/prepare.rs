//! Environment preparation: one-shot precondition check on the model artifact.
//!
//! No retries live here. The single concession to a human in the loop is the
//! interactive pause: when the models directory itself is missing we create
//! it, tell the operator to copy the artifact in, and ask the observer to
//! block until they confirm. After that the file either exists or the run
//! fails with enough directory context to diagnose a wrong path.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::observer::ExportObserver;

/// The validated model artifact.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl ModelArtifact {
    /// Size in mebibytes, for display.
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Check that the configured model artifact exists and is non-empty.
///
/// When the models directory is absent it is created first; interactive
/// runs then pause via [`ExportObserver::await_model_placement`] before the
/// file check. A still-missing file is a terminal [`ExportError::ModelNotFound`]
/// carrying the working directory and a listing of the directory's contents.
pub fn prepare_model(
    config: &ExportConfig,
    observer: &dyn ExportObserver,
) -> Result<ModelArtifact, ExportError> {
    let dir = config.model_dir();

    if !dir.exists() {
        warn!("models directory '{}' missing, creating it", dir.display());
        std::fs::create_dir_all(&dir).map_err(|source| ExportError::ModelDirFailed {
            path: dir.clone(),
            source,
        })?;
        observer.on_models_dir_created(&dir);
        if config.interactive {
            observer.await_model_placement(&dir);
        }
    }

    let path = &config.model_path;
    if !path.exists() {
        return Err(ExportError::ModelNotFound {
            path: path.clone(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from("?")),
            dir: dir.clone(),
            listing: directory_listing(&dir),
        });
    }

    let size_bytes = std::fs::metadata(path)
        .map_err(|source| ExportError::ModelUnreadable {
            path: path.clone(),
            source,
        })?
        .len();

    if size_bytes == 0 {
        return Err(ExportError::ModelEmpty { path: path.clone() });
    }

    info!(
        "model artifact '{}' found ({} bytes)",
        path.display(),
        size_bytes
    );
    let artifact = ModelArtifact {
        path: path.clone(),
        size_bytes,
    };
    observer.on_model_found(&artifact.path, artifact.size_bytes);
    Ok(artifact)
}

/// Comma-separated names in `dir`, or a note that the directory is absent.
fn directory_listing(dir: &Path) -> String {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            if names.is_empty() {
                "(empty)".to_string()
            } else {
                names.join(", ")
            }
        }
        Err(_) => format!("(no '{}' directory)", dir.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use std::sync::Mutex;

    fn config_in(dir: &Path, file: &str) -> ExportConfig {
        ExportConfig::builder()
            .model_path(dir.join("models").join(file))
            .interactive(false)
            .build()
    }

    #[test]
    fn reports_size_for_an_existing_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), "model.keras");
        std::fs::create_dir_all(config.model_dir()).unwrap();
        std::fs::write(&config.model_path, vec![1u8; 4096]).unwrap();

        let artifact = prepare_model(&config, &NoopObserver).unwrap();
        assert_eq!(artifact.size_bytes, 4096);
        assert!((artifact.size_mib() - 4096.0 / 1024.0 / 1024.0).abs() < f64::EPSILON);
    }

    #[test]
    fn creates_missing_models_dir_then_fails_on_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), "model.keras");
        assert!(!config.model_dir().exists());

        let err = prepare_model(&config, &NoopObserver).unwrap_err();
        assert!(config.model_dir().exists(), "dir should have been created");
        assert!(matches!(err, ExportError::ModelNotFound { .. }));
    }

    #[test]
    fn missing_file_error_lists_directory_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), "model.keras");
        std::fs::create_dir_all(config.model_dir()).unwrap();
        std::fs::write(config.model_dir().join("other.keras"), b"x").unwrap();

        let err = prepare_model(&config, &NoopObserver).unwrap_err();
        assert!(err.to_string().contains("other.keras"), "got: {err}");
    }

    #[test]
    fn rejects_an_empty_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), "model.keras");
        std::fs::create_dir_all(config.model_dir()).unwrap();
        std::fs::write(&config.model_path, b"").unwrap();

        let err = prepare_model(&config, &NoopObserver).unwrap_err();
        assert!(matches!(err, ExportError::ModelEmpty { .. }));
    }

    #[test]
    fn interactive_run_pauses_after_creating_the_dir() {
        struct Recording {
            events: Mutex<Vec<String>>,
        }
        impl ExportObserver for Recording {
            fn on_models_dir_created(&self, _dir: &Path) {
                self.events.lock().unwrap().push("created".into());
            }
            fn await_model_placement(&self, _dir: &Path) {
                self.events.lock().unwrap().push("paused".into());
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let config = ExportConfig::builder()
            .model_path(tmp.path().join("models/model.keras"))
            .interactive(true)
            .build();

        let observer = Recording {
            events: Mutex::new(Vec::new()),
        };
        // Still fails (nothing placed the file), but the pause must happen.
        prepare_model(&config, &observer).unwrap_err();
        assert_eq!(*observer.events.lock().unwrap(), vec!["created", "paused"]);
    }

    #[test]
    fn non_interactive_run_never_pauses() {
        struct NoPause;
        impl ExportObserver for NoPause {
            fn await_model_placement(&self, _dir: &Path) {
                panic!("must not pause in non-interactive mode");
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path(), "model.keras");
        prepare_model(&config, &NoPause).unwrap_err();
    }
}
