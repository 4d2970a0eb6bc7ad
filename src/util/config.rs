//! Configuration file support for bndkit.
//!
//! bndkit supports two configuration file locations:
//! - Global: `~/.bndkit/config.toml` - User-wide defaults
//! - Project: `.bndkit/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Relative paths are
//! resolved against the project root.
//!
//! ```toml
//! [project]
//! manifest = "META-INF/MANIFEST.MF"
//! sources = ["src"]
//! resources = ["resources", "."]
//! bundle-jar = "target/acme.jar"
//!
//! [validation]
//! execution-environments = ["JavaSE-17"]
//!
//! [catalog]
//! system-packages = ["javax.xml.parsers"]
//!
//! [[catalog.sources]]
//! kind = "framework"
//! path = "/opt/felix"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sources::SourceSpec;

/// bndkit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project layout
    pub project: ProjectConfig,

    /// Validation settings
    pub validation: ValidationConfig,

    /// Package catalog settings
    pub catalog: CatalogConfig,
}

/// Where the pieces of a bundle project live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Manifest file (default: META-INF/MANIFEST.MF)
    pub manifest: Option<PathBuf>,

    /// Java source directories (default: src)
    pub sources: Option<Vec<PathBuf>>,

    /// Directories packaged into the bundle (default: resources and the project root)
    pub resources: Option<Vec<PathBuf>>,

    /// A built bundle JAR; when present its entries are the packaged resources
    pub bundle_jar: Option<PathBuf>,
}

/// Validation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationConfig {
    /// Known execution environments, replacing the built-in list
    pub execution_environments: Option<Vec<String>>,

    /// Interface a Bundle-Activator must implement
    pub activator_capability: Option<String>,
}

/// Package catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CatalogConfig {
    /// Package clauses the runtime provides as system packages
    pub system_packages: Vec<String>,

    /// Exporting resources, by registered kind
    pub sources: Vec<SourceSpec>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Project layout
        if other.project.manifest.is_some() {
            self.project.manifest = other.project.manifest;
        }
        if other.project.sources.is_some() {
            self.project.sources = other.project.sources;
        }
        if other.project.resources.is_some() {
            self.project.resources = other.project.resources;
        }
        if other.project.bundle_jar.is_some() {
            self.project.bundle_jar = other.project.bundle_jar;
        }

        // Validation
        if other.validation.execution_environments.is_some() {
            self.validation.execution_environments = other.validation.execution_environments;
        }
        if other.validation.activator_capability.is_some() {
            self.validation.activator_capability = other.validation.activator_capability;
        }

        // Catalog lists are replaced, not appended
        if !other.catalog.system_packages.is_empty() {
            self.catalog.system_packages = other.catalog.system_packages;
        }
        if !other.catalog.sources.is_empty() {
            self.catalog.sources = other.catalog.sources;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.bndkit/config.toml)
/// 2. Global config (~/.bndkit/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global bndkit config directory (~/.bndkit).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".bndkit"))
}

/// Get the global config path (~/.bndkit/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.bndkit/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".bndkit").join("config.toml")
}
