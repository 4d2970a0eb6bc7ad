//! bndkit - OSGi bundle manifest tooling
//!
//! This crate provides the core library functionality for bndkit: reading
//! and editing bundle manifests, resolving package imports against a catalog
//! of exporters, and validating a manifest against the project it describes.

pub mod core;
pub mod ops;
pub mod project;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for bndkit unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides in-memory type indexes, package sources and
/// on-disk project fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{ManifestEditor, ManifestModel, PackageDescriptor, Version, VersionRange};
pub use ops::{DependencyValidator, Finding, FindingKind};
pub use resolver::BundleCatalog;
pub use util::context::GlobalContext;
