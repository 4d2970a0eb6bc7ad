//! Command implementations

pub mod check;
pub mod completions;
pub mod resolve;
pub mod set;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use bndkit::util::diagnostic::suggestions;
use bndkit::util::{GlobalContext, Shell};

/// Build the context and shell for a command.
pub fn setup(global: &GlobalArgs) -> Result<(GlobalContext, Shell)> {
    let mut ctx = GlobalContext::new().context("failed to create global context")?;
    ctx.set_verbose(global.verbose);
    ctx.set_color(!global.no_color);

    let shell = Shell::from_flags(global.quiet, global.verbose, global.no_color);
    Ok((ctx, shell))
}

/// The project a command works on: `--path`, or the enclosing project.
pub fn project_root(ctx: &GlobalContext, path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(ctx.resolve_path(&path)),
        None => ctx
            .find_project_root()
            .map_err(|e| anyhow::anyhow!("{}\nhelp: {}", e, suggestions::NO_MANIFEST)),
    }
}
