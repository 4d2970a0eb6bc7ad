//! Source registry - maps a source kind name to the provider that builds it.
//!
//! Callers construct the registry and hand it to catalog construction, so
//! new kinds of package sources can be plugged in without global state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::sources::{BundleJarSource, FrameworkSource, PackageSource, ProjectSource};

/// A configured package source, as written in `[[catalog.sources]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Provider name (e.g., "framework", "bundle", "project")
    pub kind: String,

    /// Location of the source
    pub path: PathBuf,
}

impl SourceSpec {
    /// Create a new source spec.
    pub fn new(kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        SourceSpec {
            kind: kind.into(),
            path: path.into(),
        }
    }

    /// Resolve a relative path against a base directory.
    pub fn relative_to(&self, base: &Path) -> SourceSpec {
        SourceSpec {
            kind: self.kind.clone(),
            path: base.join(&self.path),
        }
    }
}

/// Builds package sources of one kind.
pub trait SourceProvider {
    /// Create a source for the given location.
    fn create(&self, location: &Path) -> Result<Box<dyn PackageSource>>;
}

impl<F> SourceProvider for F
where
    F: Fn(&Path) -> Result<Box<dyn PackageSource>>,
{
    fn create(&self, location: &Path) -> Result<Box<dyn PackageSource>> {
        self(location)
    }
}

/// Name → provider lookup.
#[derive(Default)]
pub struct SourceRegistry {
    providers: BTreeMap<String, Box<dyn SourceProvider>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        SourceRegistry {
            providers: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in providers.
    pub fn with_defaults() -> Self {
        let mut registry = SourceRegistry::new();
        registry.register("framework", |p: &Path| -> Result<Box<dyn PackageSource>> {
            Ok(Box::new(FrameworkSource::new(p)))
        });
        registry.register("bundle", |p: &Path| -> Result<Box<dyn PackageSource>> {
            Ok(Box::new(BundleJarSource::new(p)))
        });
        registry.register("project", |p: &Path| -> Result<Box<dyn PackageSource>> {
            Ok(Box::new(ProjectSource::new(p)))
        });
        registry
    }

    /// Register (or replace) a provider.
    pub fn register(&mut self, kind: impl Into<String>, provider: impl SourceProvider + 'static) {
        self.providers.insert(kind.into(), Box::new(provider));
    }

    /// Check whether a provider is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.providers.contains_key(kind)
    }

    /// Registered provider names.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Build a source from a spec.
    pub fn create(&self, spec: &SourceSpec) -> Result<Box<dyn PackageSource>> {
        let provider = self.providers.get(&spec.kind).ok_or_else(|| {
            anyhow!(
                "unknown package source kind `{}` (known: {})",
                spec.kind,
                self.kinds().collect::<Vec<_>>().join(", ")
            )
        })?;
        provider.create(&spec.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceKind;

    #[test]
    fn test_default_providers() {
        let registry = SourceRegistry::with_defaults();
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["bundle", "framework", "project"]);

        let source = registry.create(&SourceSpec::new("bundle", "lib/log.jar")).unwrap();
        assert_eq!(source.kind(), SourceKind::External);
        assert_eq!(source.name(), "log.jar");
    }

    #[test]
    fn test_unknown_kind() {
        let registry = SourceRegistry::with_defaults();
        let err = registry
            .create(&SourceSpec::new("maven", "x"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("unknown package source kind `maven`"));
    }

    #[test]
    fn test_relative_to() {
        let spec = SourceSpec::new("project", "../util").relative_to(Path::new("/ws/app"));
        assert_eq!(spec.path, PathBuf::from("/ws/app/../util"));
    }
}
