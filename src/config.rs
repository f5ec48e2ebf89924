//! Configuration for a Keras → TensorFlow.js export.
//!
//! Every knob lives in [`ExportConfig`], built via its
//! [`ExportConfigBuilder`]. Keeping the whole configuration in one struct
//! makes runs easy to log and easy to compare when two exports behave
//! differently.

use std::path::PathBuf;

/// Relative path checked for the model artifact when none is configured.
pub const DEFAULT_MODEL_PATH: &str = "models/model.keras";

/// Relative directory the converter writes into when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "public/model_tfjs";

/// Configuration for one export run.
///
/// # Example
/// ```rust
/// use keras2tfjs::ExportConfig;
///
/// let config = ExportConfig::builder()
///     .model_path("models/classifier.keras")
///     .output_dir("dist/model_tfjs")
///     .interactive(false)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Path to the serialized Keras model artifact.
    /// Default: [`DEFAULT_MODEL_PATH`].
    pub model_path: PathBuf,

    /// Directory the converter populates. Created on demand; creating it
    /// again on a second run is not an error. Default: [`DEFAULT_OUTPUT_DIR`].
    pub output_dir: PathBuf,

    /// When the models directory is missing, pause after creating it and
    /// wait for the operator to confirm the file has been copied in before
    /// re-checking. Default: true.
    ///
    /// Disable for CI and scripted runs: the pipeline then fails straight
    /// away on the missing-file check instead of blocking on stdin.
    pub interactive: bool,

    /// Skip dependency resolution entirely and go straight to conversion.
    /// Default: false.
    ///
    /// For environments where the Python tooling is provisioned out-of-band
    /// and probing it on every run is unwanted noise.
    pub skip_dependency_check: bool,

    /// Python interpreter used for probing and pip installs.
    /// Default: honours `KERAS2TFJS_PYTHON`, else `python3`.
    pub python: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            interactive: true,
            skip_dependency_check: false,
            python: std::env::var("KERAS2TFJS_PYTHON")
                .unwrap_or_else(|_| tfjs_auto::DEFAULT_PYTHON.to_string()),
        }
    }
}

impl ExportConfig {
    /// Create a new builder for `ExportConfig`.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder {
            config: Self::default(),
        }
    }

    /// The directory that should hold the model artifact.
    ///
    /// A bare filename resolves to the current directory.
    pub fn model_dir(&self) -> PathBuf {
        self.model_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Builder for [`ExportConfig`].
#[derive(Debug)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.model_path = path.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn interactive(mut self, v: bool) -> Self {
        self.config.interactive = v;
        self
    }

    pub fn skip_dependency_check(mut self, v: bool) -> Self {
        self.config.skip_dependency_check = v;
        self
    }

    pub fn python(mut self, interpreter: impl Into<String>) -> Self {
        self.config.python = interpreter.into();
        self
    }

    pub fn build(self) -> ExportConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_paths() {
        let c = ExportConfig::default();
        assert_eq!(c.model_path, PathBuf::from("models/model.keras"));
        assert_eq!(c.output_dir, PathBuf::from("public/model_tfjs"));
        assert!(c.interactive);
        assert!(!c.skip_dependency_check);
    }

    #[test]
    fn model_dir_falls_back_to_cwd_for_bare_filenames() {
        let c = ExportConfig::builder().model_path("model.keras").build();
        assert_eq!(c.model_dir(), PathBuf::from("."));

        let c = ExportConfig::builder()
            .model_path("models/nested/model.keras")
            .build();
        assert_eq!(c.model_dir(), PathBuf::from("models/nested"));
    }
}
