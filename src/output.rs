//! Output types: the artifact manifest and run statistics.
//!
//! The converter's file layout is owned by the external tooling; this module
//! never interprets the files, it only enumerates them (name + size) so the
//! run can be reported and compared across executions.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Conventional name of the model topology file in a TFJS layers export.
pub const MANIFEST_FILE: &str = "model.json";

/// One file produced by the conversion collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    /// File name within the output directory.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

impl OutputFile {
    /// Size in kibibytes, for display.
    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// The set of files the converter materialized in the output directory.
///
/// Files are sorted by name so two runs over the same input produce
/// comparable manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputManifest {
    pub files: Vec<OutputFile>,
}

impl OutputManifest {
    /// Enumerate the files directly inside `dir`.
    ///
    /// Subdirectories are skipped: the TFJS layers format is flat, and
    /// anything nested is not ours to report.
    pub fn scan(dir: &Path) -> std::io::Result<Self> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            files.push(OutputFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: meta.len(),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { files })
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }

    /// Whether the conventional `model.json` topology file is present.
    pub fn has_model_json(&self) -> bool {
        self.files.iter().any(|f| f.name == MANIFEST_FILE)
    }
}

/// Timing and size statistics for one export run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportStats {
    /// Size of the input model artifact in bytes.
    pub model_size_bytes: u64,
    /// Wall-clock time spent in the preparation stage.
    pub prepare_duration_ms: u64,
    /// Wall-clock time spent resolving dependencies (0 when skipped).
    pub deps_duration_ms: u64,
    /// Wall-clock time spent inside the conversion call.
    pub convert_duration_ms: u64,
    /// Total wall-clock time for the run.
    pub total_duration_ms: u64,
}

impl ExportStats {
    /// Model size in mebibytes, for display.
    pub fn model_size_mib(&self) -> f64 {
        self.model_size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutput {
    /// Files the converter produced.
    pub manifest: OutputManifest,
    /// Version strings of the resolved external libraries, when known.
    /// Empty when dependency resolution was skipped.
    pub dependency_versions: Vec<DependencyVersion>,
    /// Run statistics.
    pub stats: ExportStats,
}

/// Name and reported version of one resolved external library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyVersion {
    pub package: String,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_sorts_files_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("group1-shard1of1.bin"), vec![0u8; 2048]).unwrap();
        std::fs::write(dir.path().join("model.json"), b"{}").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let manifest = OutputManifest::scan(dir.path()).unwrap();
        let names: Vec<&str> = manifest.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["group1-shard1of1.bin", "model.json"]);
        assert!(manifest.has_model_json());
        assert_eq!(manifest.total_size_bytes(), 2050);
    }

    #[test]
    fn size_helpers_convert_units() {
        let f = OutputFile {
            name: "model.json".into(),
            size_bytes: 1536,
        };
        assert!((f.size_kib() - 1.5).abs() < f64::EPSILON);

        let stats = ExportStats {
            model_size_bytes: 3 * 1024 * 1024,
            ..Default::default()
        };
        assert!((stats.model_size_mib() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn manifest_serialises_to_json() {
        let manifest = OutputManifest {
            files: vec![OutputFile {
                name: "model.json".into(),
                size_bytes: 12,
            }],
        };
        let json = serde_json::to_string(&manifest).unwrap();
        let back: OutputManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}
