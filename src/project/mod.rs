//! Bundle projects on disk.
//!
//! A bundle project is a directory holding a manifest, Java sources and the
//! resources packaged into the bundle. Opening a project scans its sources
//! into a [`JavaSourceIndex`] and maps its packaged resources, which the
//! validator reads through [`TypeIndex`] and [`PackagedResources`].

pub mod java;
pub mod resources;

use std::path::{Path, PathBuf};

use anyhow::Result;
use miette::Diagnostic;
use thiserror::Error;

use crate::ops::validate::{NoTypeIndex, PackagedResources, TypeIndex};
use crate::util::config::Config;

pub use java::{JavaParser, JavaSourceIndex, JavaType};
pub use resources::{DirectoryResources, JarResources};

/// Manifest locations tried when none is configured, in order.
pub const DEFAULT_MANIFEST_PATHS: &[&str] =
    &["META-INF/MANIFEST.MF", "resources/META-INF/MANIFEST.MF"];

/// Source directory used when none is configured.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Resource directory used (with the project root) when none is configured.
pub const DEFAULT_RESOURCE_DIR: &str = "resources";

/// Error locating a bundle project.
#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("no bundle manifest found in {dir}")]
    #[diagnostic(
        code(bndkit::project::manifest_not_found),
        help("Create META-INF/MANIFEST.MF or set `project.manifest` in .bndkit/config.toml")
    )]
    ManifestNotFound { dir: PathBuf },

    #[error("configured manifest does not exist: {path}")]
    #[diagnostic(code(bndkit::project::missing_manifest))]
    MissingManifest { path: PathBuf },
}

/// Locate the manifest of the project at `root`.
///
/// A configured path (relative to `root`) must exist; otherwise the default
/// locations are tried in order.
pub fn find_manifest(root: &Path, configured: Option<&Path>) -> Result<PathBuf, ProjectError> {
    if let Some(configured) = configured {
        let path = root.join(configured);
        return if path.is_file() {
            Ok(path)
        } else {
            Err(ProjectError::MissingManifest { path })
        };
    }

    DEFAULT_MANIFEST_PATHS
        .iter()
        .map(|p| root.join(p))
        .find(|p| p.is_file())
        .ok_or_else(|| ProjectError::ManifestNotFound {
            dir: root.to_path_buf(),
        })
}

/// An opened bundle project.
pub struct BundleProject {
    root: PathBuf,
    manifest_path: PathBuf,
    /// None when the project has no source directory to scan
    types: Option<JavaSourceIndex>,
    resources: Box<dyn PackagedResources>,
}

impl BundleProject {
    /// Open the project at `root`, scanning its sources.
    ///
    /// `manifest` overrides the configured manifest location.
    pub fn open(root: &Path, config: &Config, manifest: Option<&Path>) -> Result<Self> {
        let configured = manifest.or(config.project.manifest.as_deref());
        let manifest_path = find_manifest(root, configured)?;

        let source_dirs: Vec<PathBuf> = match &config.project.sources {
            Some(dirs) => dirs.iter().map(|d| root.join(d)).collect(),
            None => vec![root.join(DEFAULT_SOURCE_DIR)],
        };
        let existing: Vec<&PathBuf> = source_dirs.iter().filter(|d| d.is_dir()).collect();
        let types = if existing.is_empty() {
            tracing::debug!("no source directories under {}, skipping scan", root.display());
            None
        } else {
            match JavaSourceIndex::scan(&existing) {
                Ok(index) => Some(index),
                Err(e) => {
                    tracing::warn!("source scan failed, skipping source checks: {:#}", e);
                    None
                }
            }
        };

        let jar = config
            .project
            .bundle_jar
            .as_ref()
            .map(|jar| root.join(jar))
            .filter(|jar| jar.is_file());
        let resources: Box<dyn PackagedResources> = match jar {
            Some(jar) => {
                tracing::debug!("reading packaged resources from {}", jar.display());
                Box::new(JarResources::open(&jar)?)
            }
            None => {
                let roots = match &config.project.resources {
                    Some(dirs) => dirs.iter().map(|d| root.join(d)).collect(),
                    None => vec![root.join(DEFAULT_RESOURCE_DIR), root.to_path_buf()],
                };
                Box::new(DirectoryResources::new(roots))
            }
        };

        Ok(BundleProject {
            root: root.to_path_buf(),
            manifest_path,
            types,
            resources,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// The project's type index, or one that knows nothing if there was no source.
    pub fn types(&self) -> &dyn TypeIndex {
        match &self.types {
            Some(index) => index,
            None => &NoTypeIndex,
        }
    }

    pub fn resources(&self) -> &dyn PackagedResources {
        self.resources.as_ref()
    }
}
