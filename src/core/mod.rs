//! Core data structures for bndkit.
//!
//! This module contains the manifest model and the types it is built from:
//! - OSGi versions and version ranges
//! - Package descriptors (one clause of an import/export header)
//! - Line-level header handling (folding, spans, clause splitting)
//! - The manifest model and its editing session

pub mod editor;
pub mod errors;
pub mod header;
pub mod manifest;
pub mod package;
pub mod version;

pub use editor::ManifestEditor;
pub use errors::ManifestError;
pub use manifest::{headers, ManifestModel};
pub use package::PackageDescriptor;
pub use version::{Version, VersionRange};
