//! Framework source - packages exported by the framework distribution.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::PackageDescriptor;
use crate::sources::bundle::read_jar_manifest;
use crate::sources::{PackageSource, SourceKind};

/// File name of the framework JAR inside a distribution directory.
pub const FRAMEWORK_JAR: &str = "framework.jar";

/// A source for a framework distribution.
pub struct FrameworkSource {
    /// The framework JAR or the distribution directory
    location: PathBuf,
}

impl FrameworkSource {
    /// Create a framework source from a JAR or a distribution directory.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        FrameworkSource {
            location: location.into(),
        }
    }

    /// Resolve the framework JAR.
    pub fn framework_jar(&self) -> Result<PathBuf> {
        if self.location.is_file() {
            return Ok(self.location.clone());
        }

        for candidate in [
            self.location.join(FRAMEWORK_JAR),
            self.location.join("osgi").join(FRAMEWORK_JAR),
        ] {
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        bail!(
            "no {} found in framework distribution {}",
            FRAMEWORK_JAR,
            self.location.display()
        )
    }

    /// Get the configured location.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl PackageSource for FrameworkSource {
    fn name(&self) -> &str {
        "framework"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Framework
    }

    fn exported_packages(&mut self) -> Result<Vec<PackageDescriptor>> {
        let jar = self.framework_jar()?;
        tracing::debug!("reading framework exports from {}", jar.display());
        Ok(read_jar_manifest(&jar)?.exported_packages())
    }
}
