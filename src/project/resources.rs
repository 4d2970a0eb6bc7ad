//! Packaged resources: what ends up inside the bundle.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::ZipArchive;

use crate::ops::validate::PackagedResources;

/// Resources copied into the bundle from one or more directories.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    roots: Vec<PathBuf>,
}

impl DirectoryResources {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        DirectoryResources { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl PackagedResources for DirectoryResources {
    fn contains(&self, path: &str) -> Option<bool> {
        let relative = path.trim_start_matches('/');
        Some(self.roots.iter().any(|root| root.join(relative).exists()))
    }
}

/// Entries of a built bundle JAR.
#[derive(Debug, Clone)]
pub struct JarResources {
    entries: BTreeSet<String>,
}

impl JarResources {
    /// Read the entry list of a JAR.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open bundle: {}", path.display()))?;
        let archive = ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("failed to read bundle archive: {}", path.display()))?;

        Ok(JarResources {
            entries: archive.file_names().map(str::to_string).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PackagedResources for JarResources {
    fn contains(&self, path: &str) -> Option<bool> {
        let path = path.trim_start_matches('/').trim_end_matches('/');
        let dir = format!("{}/", path);
        Some(
            self.entries.contains(path)
                || self.entries.iter().any(|e| e.starts_with(&dir)),
        )
    }
}
