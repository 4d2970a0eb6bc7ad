//! High-level operations.
//!
//! This module contains the implementation of bndkit commands.

pub mod resolve;
pub mod validate;

pub use resolve::{bind_imports, build_catalog, resolve, ImportBinding, ResolveOptions};
pub use validate::{
    check, format_report_for_output, CheckOptions, DependencyValidator, Finding, FindingKind,
    OutputFormat, ValidationReport, ValidatorOptions,
};
