//! Pipeline stages for the Keras → TensorFlow.js export.
//!
//! Each submodule implements exactly one stage. Control flows strictly
//! top-to-bottom; each stage returns `Result` and the driver in
//! [`crate::export`] short-circuits on the first failure.
//!
//! ## Data Flow
//!
//! ```text
//! prepare ──▶ deps ──▶ invoke
//! (artifact)  (pip/conda)  (converter)
//! ```
//!
//! 1. [`prepare`] — verify the model artifact exists and is non-empty,
//!    creating the models directory (and pausing for the operator) when
//!    it is missing
//! 2. [`deps`]    — ensure the external libraries resolve, installing them
//!    on demand
//! 3. [`invoke`]  — create the output directory and run the opaque
//!    conversion call

pub mod deps;
pub mod invoke;
pub mod prepare;
