//! System packages and the project's own exports.
//!
//! Neither reads anything from disk: system packages come from
//! configuration, own exports from the manifest being edited.

use anyhow::Result;

use crate::core::package::parse_header;
use crate::core::{ManifestModel, PackageDescriptor};
use crate::sources::{PackageSource, SourceKind};

/// Packages the runtime provides without any bundle exporting them.
pub struct SystemPackagesSource {
    packages: Vec<PackageDescriptor>,
}

impl SystemPackagesSource {
    /// Create from clause strings such as `javax.xml.parsers;version=1.0`.
    pub fn new<S: AsRef<str>>(clauses: &[S]) -> Self {
        let packages = clauses
            .iter()
            .flat_map(|c| parse_header(c.as_ref()))
            .collect();
        SystemPackagesSource { packages }
    }
}

impl PackageSource for SystemPackagesSource {
    fn name(&self) -> &str {
        "system"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::System
    }

    fn exported_packages(&mut self) -> Result<Vec<PackageDescriptor>> {
        Ok(self.packages.clone())
    }
}

/// The packages the project itself already exports.
pub struct OwnExportsSource {
    name: String,
    packages: Vec<PackageDescriptor>,
}

impl OwnExportsSource {
    /// Capture the exports of a manifest snapshot.
    pub fn from_manifest(manifest: &ManifestModel) -> Self {
        OwnExportsSource {
            name: manifest
                .symbolic_name_id()
                .unwrap_or_else(|| "project".to_string()),
            packages: manifest.exported_packages(),
        }
    }
}

impl PackageSource for OwnExportsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::OwnExports
    }

    fn exported_packages(&mut self) -> Result<Vec<PackageDescriptor>> {
        Ok(self.packages.clone())
    }
}
