//! # keras2tfjs
//!
//! Export a serialized Keras model artifact to the TensorFlow.js layers
//! format, with resilient environment bootstrap around the conversion.
//!
//! ## Why this crate?
//!
//! The conversion itself belongs to the Python tooling (`tensorflowjs` /
//! `tensorflow`) and stays there — reimplementing a model-format codec is
//! a non-goal. What keeps going wrong in practice is everything around
//! that one call: the model file is not where the script expects it, the
//! converter is not installed, pip fails behind a proxy, and the operator
//! is left guessing from a bare traceback. This crate owns exactly that
//! part: a strict precondition check with directory-listing diagnostics,
//! probe-and-install of the two required libraries with a pip→conda
//! fallback and spelled-out manual remediation, and a faithful report of
//! what the converter produced.
//!
//! ## Pipeline Overview
//!
//! ```text
//! model.keras
//!  │
//!  ├─ 1. Prepare  verify the artifact exists and is non-empty
//!  ├─ 2. Deps     probe tensorflowjs + tensorflow; install via pip, then conda
//!  ├─ 3. Convert  one opaque call to the conversion collaborator
//!  └─ 4. Report   enumerate produced files (model.json + weight shards)
//! ```
//!
//! Fully synchronous and single-threaded; every stage either returns a
//! value or a terminal [`ExportError`], and the driver short-circuits on
//! the first failure.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keras2tfjs::{export, ExportConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExportConfig::builder()
//!         .model_path("models/model.keras")
//!         .output_dir("public/model_tfjs")
//!         .interactive(false)
//!         .build();
//!     let output = export(&config)?;
//!     for file in &output.manifest.files {
//!         println!("{} ({:.1} KB)", file.name, file.size_kib());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `keras2tfjs` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! keras2tfjs = { version = "0.2", default-features = false }
//! ```
//!
//! ## Testing without the Python stack
//!
//! Both external seams are traits: [`ModelConverter`] for the conversion
//! call and [`tfjs_auto::CommandRunner`] for process invocation inside
//! dependency resolution. Stub them and the entire control flow runs in a
//! plain `cargo test` with nothing installed.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod converter;
pub mod error;
pub mod export;
pub mod observer;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExportConfig, ExportConfigBuilder, DEFAULT_MODEL_PATH, DEFAULT_OUTPUT_DIR};
pub use converter::{ConversionFailure, ModelConverter, TfjsCliConverter};
pub use error::ExportError;
pub use export::{export, export_with};
pub use observer::{ExportObserver, ExportStage, NoopObserver};
pub use output::{DependencyVersion, ExportOutput, ExportStats, OutputFile, OutputManifest};
