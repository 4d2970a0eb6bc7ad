//! Import resolution operations.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::{ManifestModel, PackageDescriptor};
use crate::project::find_manifest;
use crate::resolver::{BundleCatalog, CatalogEntry};
use crate::sources::{OwnExportsSource, PackageSource, SourceRegistry, SystemPackagesSource};
use crate::util::config::Config;
use crate::util::context::GlobalContext;

/// Build the package sources a project's catalog is made of.
///
/// Configured sources come first, then system packages and the project's
/// own exports; the catalog orders them by kind on refresh.
pub fn catalog_sources(
    root: &Path,
    config: &Config,
    manifest: &ManifestModel,
    registry: &SourceRegistry,
) -> Result<Vec<Box<dyn PackageSource>>> {
    let mut sources = Vec::new();

    for spec in &config.catalog.sources {
        sources.push(registry.create(&spec.relative_to(root))?);
    }
    if !config.catalog.system_packages.is_empty() {
        sources.push(Box::new(SystemPackagesSource::new(&config.catalog.system_packages)));
    }
    sources.push(Box::new(OwnExportsSource::from_manifest(manifest)));

    Ok(sources)
}

/// Build and populate the catalog for a project with the default source kinds.
pub fn build_catalog(root: &Path, config: &Config, manifest: &ManifestModel) -> Result<BundleCatalog> {
    let registry = SourceRegistry::with_defaults();
    let mut sources = catalog_sources(root, config, manifest, &registry)?;

    let catalog = BundleCatalog::new();
    let report = catalog.refresh(&mut sources);
    tracing::info!(
        "catalog holds {} packages from {} sources",
        report.entries,
        sources.len() - report.failed.len()
    );

    Ok(catalog)
}

/// Options for [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Project root; the current directory when unset
    pub path: Option<PathBuf>,
}

/// What one import binds to.
#[derive(Debug, Clone, Serialize)]
pub struct ImportBinding {
    pub import: PackageDescriptor,
    /// The winning exporter, if any
    pub bound: Option<CatalogEntry>,
    /// Every exporter of the package name, in registration order
    pub candidates: Vec<CatalogEntry>,
}

impl ImportBinding {
    /// An import is resolved when bound, or when it is optional.
    pub fn is_resolved(&self) -> bool {
        self.bound.is_some() || self.import.is_optional()
    }
}

/// Bind every import of `manifest` against `catalog`.
pub fn bind_imports(manifest: &ManifestModel, catalog: &BundleCatalog) -> Vec<ImportBinding> {
    manifest
        .imported_packages()
        .into_iter()
        .map(|import| ImportBinding {
            bound: catalog.bind(&import),
            candidates: catalog.resolve(&import),
            import,
        })
        .collect()
}

/// Resolve the imports of the project described by `options`.
pub fn resolve(options: &ResolveOptions, ctx: &GlobalContext) -> Result<Vec<ImportBinding>> {
    let root = options.path.clone().unwrap_or_else(|| ctx.cwd().to_path_buf());
    let config = ctx.load_config(&root);
    let manifest_path = find_manifest(&root, config.project.manifest.as_deref())?;
    let manifest = ManifestModel::load(&manifest_path)?;

    let catalog = build_catalog(&root, &config, &manifest)?;
    let bindings = bind_imports(&manifest, &catalog);

    let unresolved = bindings.iter().filter(|b| !b.is_resolved()).count();
    if unresolved > 0 {
        tracing::info!("{} of {} imports unresolved", unresolved, bindings.len());
    }
    Ok(bindings)
}
