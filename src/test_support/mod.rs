//! Test utilities and mocks for bndkit unit tests.
//!
//! This module provides in-memory implementations of the interfaces the
//! validator and the catalog read through, plus helpers that lay out bundle
//! projects and bundle JARs on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use bndkit::test_support::{MockTypeIndex, StaticSource};
//!
//! #[test]
//! fn test_example() {
//!     let types = MockTypeIndex::new().with_own_packages(&["com.acme.impl"]);
//!     let source = StaticSource::new("fw", SourceKind::Framework, &["org.osgi.framework"]);
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use zip::write::SimpleFileOptions;

use crate::core::package::parse_header;
use crate::core::PackageDescriptor;
use crate::ops::validate::{PackagedResources, TypeIndex};
use crate::sources::{PackageSource, SourceKind};
use crate::sources::bundle::JAR_MANIFEST_PATH;

pub use fixtures::*;

/// A package source with a fixed export list.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    kind: SourceKind,
    exports: Vec<PackageDescriptor>,
    fail: bool,
}

impl StaticSource {
    /// Create a source exporting the given clauses.
    pub fn new(name: &str, kind: SourceKind, clauses: &[&str]) -> Self {
        StaticSource {
            name: name.to_string(),
            kind,
            exports: parse_header(&clauses.join(",")),
            fail: false,
        }
    }

    /// Create a source whose reads always fail.
    pub fn failing(name: &str) -> Self {
        StaticSource {
            name: name.to_string(),
            kind: SourceKind::External,
            exports: Vec::new(),
            fail: true,
        }
    }
}

impl PackageSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn exported_packages(&mut self) -> Result<Vec<PackageDescriptor>> {
        if self.fail {
            bail!("source `{}` is unavailable", self.name);
        }
        Ok(self.exports.clone())
    }
}

/// In-memory type index.
#[derive(Debug, Clone, Default)]
pub struct MockTypeIndex {
    /// Qualified type name -> capabilities it implements
    types: BTreeMap<String, BTreeSet<String>>,
    referenced: BTreeSet<String>,
    own: BTreeSet<String>,
    exportable: BTreeSet<String>,
}

fn set_of(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl MockTypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project type implementing the given capabilities.
    pub fn with_type(mut self, name: &str, implements: &[&str]) -> Self {
        self.types.insert(name.to_string(), set_of(implements));
        self
    }

    pub fn with_referenced(mut self, packages: &[&str]) -> Self {
        self.referenced = set_of(packages);
        self
    }

    pub fn with_own_packages(mut self, packages: &[&str]) -> Self {
        self.own = set_of(packages);
        self
    }

    pub fn with_exportable(mut self, packages: &[&str]) -> Self {
        self.exportable = set_of(packages);
        self
    }
}

impl TypeIndex for MockTypeIndex {
    fn find_types(&self, qualified_name: &str) -> Option<Vec<String>> {
        Some(
            self.types
                .keys()
                .filter(|name| name.as_str() == qualified_name)
                .cloned()
                .collect(),
        )
    }

    fn implements(&self, qualified_name: &str, capability: &str) -> Option<bool> {
        Some(
            self.types
                .get(qualified_name)
                .is_some_and(|caps| caps.contains(capability)),
        )
    }

    fn referenced_packages(&self) -> Option<BTreeSet<String>> {
        Some(self.referenced.clone())
    }

    fn own_packages(&self) -> Option<BTreeSet<String>> {
        Some(self.own.clone())
    }

    fn exportable_packages(&self) -> Option<BTreeSet<String>> {
        Some(self.exportable.clone())
    }
}

/// In-memory packaged resources.
#[derive(Debug, Clone, Default)]
pub struct MockResources {
    paths: BTreeSet<String>,
}

impl MockResources {
    pub fn new(paths: &[&str]) -> Self {
        MockResources {
            paths: set_of(paths),
        }
    }
}

impl PackagedResources for MockResources {
    fn contains(&self, path: &str) -> Option<bool> {
        Some(self.paths.contains(path.trim_end_matches('/')))
    }
}

/// Write a bundle JAR containing only the given manifest.
pub fn write_bundle_jar(path: &Path, manifest: &str) -> PathBuf {
    write_jar(path, &[(JAR_MANIFEST_PATH, manifest)])
}

/// Write a JAR with the given entries.
pub fn write_jar(path: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    path.to_path_buf()
}
