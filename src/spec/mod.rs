//! Spec layer: YAML package description + validated in-memory structures.
//!
//! This module is intentionally separate from rendering. It owns:
//! - the raw document type and required-field extraction
//! - the closed option enums (build system, test runner)
//! - the PythonVersion scalar

pub mod options;
pub mod package;

pub use options::{CheckRunner, PythonVersion, SetupTool};
pub use package::{FileLists, PackageSpec, ValidatedSpec};
