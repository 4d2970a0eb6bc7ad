//! Global context for bndkit operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::project::{find_manifest, ProjectError};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global bndkit data (~/.bndkit/), if one exists
    home: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            home: config::global_config_dir(),
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different global directory, or none at all.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the bndkit home directory (~/.bndkit/).
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| home.join("config.toml"))
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Load the merged configuration for a project.
    pub fn load_config(&self, project_root: &Path) -> Config {
        config::load_config(
            self.config_path().as_deref(),
            &config::project_config_path(project_root),
        )
    }

    /// Find the enclosing bundle project, starting from cwd and searching upward.
    pub fn find_project_root(&self) -> Result<PathBuf, ProjectError> {
        let mut current = self.cwd.clone();
        loop {
            let configured = self.load_config(&current).project.manifest;
            match find_manifest(&current, configured.as_deref()) {
                Ok(_) => return Ok(current),
                Err(ProjectError::ManifestNotFound { .. }) => {
                    // Not in this directory, keep searching upward
                    if !current.pop() {
                        return Err(ProjectError::ManifestNotFound {
                            dir: self.cwd.clone(),
                        });
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        if let Some(path) = ctx.config_path() {
            assert!(path.to_string_lossy().contains(".bndkit"));
        }
    }

    #[test]
    fn test_find_project_root_searches_upward() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("META-INF")).unwrap();
        std::fs::write(tmp.path().join("META-INF/MANIFEST.MF"), "Bundle-SymbolicName: a\r\n").unwrap();
        let nested = tmp.path().join("src/com/acme");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested).unwrap().with_home(None);
        assert_eq!(ctx.find_project_root().unwrap(), tmp.path());
    }

    #[test]
    fn test_project_config_overrides_manifest_location() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".bndkit")).unwrap();
        std::fs::write(
            tmp.path().join(".bndkit/config.toml"),
            "[project]\nmanifest = \"bundle.mf\"\n",
        )
        .unwrap();
        std::fs::write(tmp.path().join("bundle.mf"), "Bundle-SymbolicName: a\r\n").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_home(None);
        assert_eq!(
            ctx.load_config(tmp.path()).project.manifest,
            Some(PathBuf::from("bundle.mf"))
        );
        assert_eq!(ctx.find_project_root().unwrap(), tmp.path());
    }
}
