//! Project source - packages exported by another bundle project in the workspace.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{ManifestModel, PackageDescriptor};
use crate::project::find_manifest;
use crate::sources::{PackageSource, SourceKind};

/// A source for a bundle project directory.
pub struct ProjectSource {
    /// The project root
    root: PathBuf,

    /// Display name
    name: String,
}

impl ProjectSource {
    /// Create a new project source.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        ProjectSource { root, name }
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageSource for ProjectSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Workspace
    }

    fn exported_packages(&mut self) -> Result<Vec<PackageDescriptor>> {
        let manifest_path = find_manifest(&self.root, None)?;
        Ok(ManifestModel::load(&manifest_path)?.exported_packages())
    }
}
