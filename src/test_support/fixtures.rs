//! Test fixtures for common test scenarios.
//!
//! This module provides pre-built bundle projects and manifest snippets
//! for the validation and catalog tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fixture for a bundle project laid out on disk.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Directory name of the project.
    pub name: String,
    /// META-INF/MANIFEST.MF content.
    pub manifest: String,
    /// Java sources (path relative to `src/` -> content).
    pub sources: BTreeMap<PathBuf, String>,
    /// Packaged resources (path relative to project root -> content).
    pub resources: BTreeMap<PathBuf, String>,
    /// .bndkit/config.toml content.
    pub config: Option<String>,
}

impl ProjectFixture {
    /// Create a new empty project fixture.
    pub fn new(name: impl Into<String>) -> Self {
        ProjectFixture {
            name: name.into(),
            manifest: String::new(),
            sources: BTreeMap::new(),
            resources: BTreeMap::new(),
            config: None,
        }
    }

    /// A bundle with an activator, one exported package and one import.
    pub fn bundle(symbolic_name: &str) -> Self {
        let package = format!("{}.impl", symbolic_name);
        let dir = package.replace('.', "/");

        ProjectFixture::new(symbolic_name)
            .with_manifest(ManifestFixtures::bundle(
                symbolic_name,
                &[
                    ("Bundle-Activator", &format!("{}.Activator", package)),
                    ("Import-Package", "org.osgi.framework;version=\"[1.3,2.0)\""),
                    ("Export-Package", &package),
                ],
            ))
            .with_source(
                format!("{}/Activator.java", dir),
                format!(
                    r#"package {package};

import org.osgi.framework.BundleActivator;
import org.osgi.framework.BundleContext;

public class Activator implements BundleActivator {{
    public void start(BundleContext context) {{}}
    public void stop(BundleContext context) {{}}
}}
"#
                ),
            )
    }

    /// Set the manifest content.
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Add a Java source file under `src/`.
    pub fn with_source(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.sources.insert(path.into(), content.into());
        self
    }

    /// Add a packaged resource.
    pub fn with_resource(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.resources.insert(path.into(), content.into());
        self
    }

    /// Set the project configuration.
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Write the project under `base_path` and return its root.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let root = base_path.join(&self.name);
        std::fs::create_dir_all(root.join("META-INF"))?;
        std::fs::write(root.join("META-INF").join("MANIFEST.MF"), &self.manifest)?;

        for (path, content) in &self.sources {
            write_file(&root.join("src").join(path), content)?;
        }
        for (path, content) in &self.resources {
            write_file(&root.join(path), content)?;
        }
        if let Some(config) = &self.config {
            write_file(&root.join(".bndkit").join("config.toml"), config)?;
        }

        Ok(root)
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

/// Manifest text templates.
pub struct ManifestFixtures;

impl ManifestFixtures {
    /// Identity headers followed by `extra`, CRLF terminated.
    pub fn bundle(symbolic_name: &str, extra: &[(&str, &str)]) -> String {
        let mut text = format!(
            "Manifest-Version: 1.0\r\n\
             Bundle-ManifestVersion: 2\r\n\
             Bundle-Name: {symbolic_name}\r\n\
             Bundle-SymbolicName: {symbolic_name}\r\n\
             Bundle-Version: 1.0.0\r\n"
        );
        for (name, value) in extra {
            text.push_str(&format!("{}: {}\r\n", name, value));
        }
        text
    }

    /// A framework manifest exporting the core OSGi packages.
    pub fn framework() -> String {
        "Manifest-Version: 1.0\r\n\
         Bundle-SymbolicName: org.osgi.framework.system\r\n\
         Export-Package: org.osgi.framework;specification-version=1.3,\r\n \
         org.osgi.service.packageadmin;specification-version=1.2\r\n"
            .to_string()
    }
}
