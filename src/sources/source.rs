//! PackageSource trait - common interface for everything that exports packages.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::core::PackageDescriptor;

/// What kind of resource exports a package.
///
/// The declaration order is the catalog's registration order: when several
/// exporters compete for an import, earlier kinds win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Packages exported by the framework distribution itself.
    Framework,
    /// Packages provided by the runtime as system packages.
    System,
    /// Another bundle project in the workspace.
    Workspace,
    /// An external bundle file.
    External,
    /// The project's own exports.
    OwnExports,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Framework => write!(f, "framework"),
            SourceKind::System => write!(f, "system"),
            SourceKind::Workspace => write!(f, "workspace"),
            SourceKind::External => write!(f, "external"),
            SourceKind::OwnExports => write!(f, "own-exports"),
        }
    }
}

/// A source of exported packages.
pub trait PackageSource {
    /// Get the source name for display.
    fn name(&self) -> &str;

    /// The kind of exporter.
    fn kind(&self) -> SourceKind;

    /// List the exported packages with their versions.
    fn exported_packages(&mut self) -> Result<Vec<PackageDescriptor>>;
}
