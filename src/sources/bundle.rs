//! Bundle JAR source - packages exported by an external bundle file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::ZipArchive;

use crate::core::{ManifestModel, PackageDescriptor};
use crate::sources::{PackageSource, SourceKind};

/// Location of the manifest inside a bundle JAR.
pub const JAR_MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Read the manifest of a bundle JAR.
pub fn read_jar_manifest(path: &Path) -> Result<ManifestModel> {
    let file =
        File::open(path).with_context(|| format!("failed to open bundle: {}", path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("failed to read bundle archive: {}", path.display()))?;

    let mut entry = archive
        .by_name(JAR_MANIFEST_PATH)
        .with_context(|| format!("{} has no {}", path.display(), JAR_MANIFEST_PATH))?;

    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .with_context(|| format!("failed to read manifest in {}", path.display()))?;

    Ok(ManifestModel::parse(text))
}

/// A source for an external bundle file.
pub struct BundleJarSource {
    /// Path to the JAR
    path: PathBuf,

    /// Display name
    name: String,
}

impl BundleJarSource {
    /// Create a new bundle source.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        BundleJarSource { path, name }
    }

    /// Get the bundle path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PackageSource for BundleJarSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::External
    }

    fn exported_packages(&mut self) -> Result<Vec<PackageDescriptor>> {
        let manifest = read_jar_manifest(&self.path)?;
        Ok(manifest.exported_packages())
    }
}
