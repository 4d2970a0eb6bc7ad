//! Bundle catalog - which packages can an import bind to.
//!
//! The catalog is a snapshot of every package exported by the configured
//! sources. Entries are kept in registration order (framework, system,
//! workspace projects, external bundles, own exports) and the first
//! compatible entry wins. Refreshing rebuilds the whole snapshot and swaps it
//! in at once, so readers never observe a half-built catalog.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::core::{PackageDescriptor, Version};
use crate::sources::{PackageSource, SourceKind};

/// The resource exporting a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Exporter {
    pub name: String,
    pub kind: SourceKind,
}

/// One exported package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub package: PackageDescriptor,
    pub version: Version,
    pub exporter: Exporter,
}

impl CatalogEntry {
    /// Create an entry from an exported package descriptor.
    pub fn new(package: PackageDescriptor, exporter: Exporter) -> Self {
        let version = package.version();
        CatalogEntry {
            package,
            version,
            exporter,
        }
    }

    /// The package name.
    pub fn name(&self) -> &str {
        self.package.name()
    }
}

/// Summary of a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Number of entries in the new snapshot
    pub entries: usize,
    /// Sources that could not be read, with the reason
    pub failed: Vec<(String, String)>,
}

/// A catalog of exported packages.
#[derive(Debug, Default)]
pub struct BundleCatalog {
    snapshot: RwLock<Arc<Vec<CatalogEntry>>>,
}

impl BundleCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        BundleCatalog {
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Create a catalog from pre-built entries (kept in the given order).
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        BundleCatalog {
            snapshot: RwLock::new(Arc::new(entries)),
        }
    }

    /// Rebuild the catalog from the given sources.
    ///
    /// Sources that fail to report their exports are skipped. The new entries
    /// replace the old snapshot only once every source has been read.
    pub fn refresh(&self, sources: &mut [Box<dyn PackageSource>]) -> RefreshReport {
        let mut entries = Vec::new();
        let mut failed = Vec::new();

        for source in sources.iter_mut() {
            match source.exported_packages() {
                Ok(packages) => {
                    let exporter = Exporter {
                        name: source.name().to_string(),
                        kind: source.kind(),
                    };
                    tracing::debug!(
                        "{} source `{}` exports {} packages",
                        exporter.kind,
                        exporter.name,
                        packages.len()
                    );
                    entries.extend(
                        packages
                            .into_iter()
                            .map(|p| CatalogEntry::new(p, exporter.clone())),
                    );
                }
                Err(e) => {
                    tracing::warn!("skipping package source `{}`: {:#}", source.name(), e);
                    failed.push((source.name().to_string(), format!("{:#}", e)));
                }
            }
        }

        // Stable: keeps source order within a kind
        entries.sort_by_key(|e| e.exporter.kind);

        let report = RefreshReport {
            entries: entries.len(),
            failed,
        };
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(entries);
        report
    }

    /// The current snapshot.
    pub fn entries(&self) -> Arc<Vec<CatalogEntry>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Every entry exporting the imported package name, in registration order.
    pub fn resolve(&self, import: &PackageDescriptor) -> Vec<CatalogEntry> {
        self.entries()
            .iter()
            .filter(|e| e.name() == import.name())
            .cloned()
            .collect()
    }

    /// Check whether some exporter satisfies the import's version range.
    pub fn is_satisfied(&self, import: &PackageDescriptor) -> bool {
        self.bind(import).is_some()
    }

    /// The entry the import binds to: the first one whose version is in range.
    pub fn bind(&self, import: &PackageDescriptor) -> Option<CatalogEntry> {
        let range = import.version_range();
        self.entries()
            .iter()
            .find(|e| e.name() == import.name() && range.contains(&e.version))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{OwnExportsSource, SystemPackagesSource};
    use crate::test_support::StaticSource;
    use crate::core::ManifestModel;

    fn two_version_catalog() -> BundleCatalog {
        let catalog = BundleCatalog::new();
        let mut sources: Vec<Box<dyn PackageSource>> = vec![
            Box::new(StaticSource::new("old", SourceKind::External, &["com.acme.util;version=1.0"])),
            Box::new(StaticSource::new("new", SourceKind::External, &["com.acme.util;version=2.0"])),
        ];
        catalog.refresh(&mut sources);
        catalog
    }

    #[test]
    fn test_resolve_returns_every_exporter() {
        let catalog = two_version_catalog();
        let entries = catalog.resolve(&PackageDescriptor::new("com.acme.util", None));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version, Version::new(1, 0, 0));
        assert_eq!(entries[1].version, Version::new(2, 0, 0));
    }

    #[test]
    fn test_is_satisfied_uses_ranges() {
        let catalog = two_version_catalog();
        let in_range = PackageDescriptor::new("com.acme.util", None).with_attribute("version", "[1.5,3.0)");
        let out_of_range = PackageDescriptor::new("com.acme.util", None).with_attribute("version", "[2.5,3.0)");

        assert!(catalog.is_satisfied(&in_range));
        assert_eq!(catalog.bind(&in_range).unwrap().exporter.name, "new");
        assert!(!catalog.is_satisfied(&out_of_range));
        assert!(!catalog.is_satisfied(&PackageDescriptor::new("com.other", None)));
    }

    #[test]
    fn test_registration_order_first_match_wins() {
        let catalog = BundleCatalog::new();
        let own = ManifestModel::parse("Bundle-SymbolicName: me\r\nExport-Package: org.osgi.framework;version=1.3\r\n");
        let mut sources: Vec<Box<dyn PackageSource>> = vec![
            Box::new(OwnExportsSource::from_manifest(&own)),
            Box::new(StaticSource::new("ext", SourceKind::External, &["org.osgi.framework;version=1.3"])),
            Box::new(SystemPackagesSource::new(&["org.osgi.framework;version=1.3"])),
            Box::new(StaticSource::new("fw", SourceKind::Framework, &["org.osgi.framework;version=1.3"])),
        ];
        catalog.refresh(&mut sources);

        let kinds: Vec<_> = catalog.entries().iter().map(|e| e.exporter.kind).collect();
        assert_eq!(
            kinds,
            vec![SourceKind::Framework, SourceKind::System, SourceKind::External, SourceKind::OwnExports]
        );

        let bound = catalog.bind(&PackageDescriptor::new("org.osgi.framework", None)).unwrap();
        assert_eq!(bound.exporter.name, "fw");
    }

    #[test]
    fn test_refresh_replaces_snapshot_and_reports_failures() {
        let catalog = two_version_catalog();
        let before = catalog.entries();

        let mut sources: Vec<Box<dyn PackageSource>> = vec![
            Box::new(StaticSource::failing("broken")),
            Box::new(StaticSource::new("only", SourceKind::Workspace, &["a.b"])),
        ];
        let report = catalog.refresh(&mut sources);

        assert_eq!(report.entries, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        // Readers holding the old snapshot keep seeing it
        assert_eq!(before.len(), 2);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.resolve(&PackageDescriptor::new("com.acme.util", None)).is_empty());
    }
}
