//! `bndkit resolve` command

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, ResolveArgs};
use bndkit::ops::resolve::{resolve, ResolveOptions};
use bndkit::util::shell::Status;

pub fn execute(args: ResolveArgs, global: &GlobalArgs) -> Result<()> {
    let (ctx, shell) = super::setup(global)?;
    let root = super::project_root(&ctx, args.path)?;

    if !args.json {
        shell.status(Status::Resolving, root.display());
    }
    let bindings = resolve(&ResolveOptions { path: Some(root) }, &ctx)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&bindings).context("failed to serialize bindings")?;
        println!("{}", json);
        return Ok(());
    }

    for binding in &bindings {
        let range = binding.import.version_range();
        match &binding.bound {
            Some(entry) => println!(
                "{} {} -> {} v{} ({})",
                binding.import.name(),
                range,
                entry.exporter.name,
                entry.version,
                entry.exporter.kind
            ),
            None if binding.import.is_optional() => {
                println!("{} {} -> (optional, unresolved)", binding.import.name(), range)
            }
            None => println!("{} {} -> (unresolved)", binding.import.name(), range),
        }
    }

    let unresolved = bindings.iter().filter(|b| !b.is_resolved()).count();
    if unresolved > 0 {
        shell.warn(format!("{} imports could not be resolved", unresolved));
    } else {
        shell.status(Status::Finished, format!("{} imports resolved", bindings.len()));
    }

    Ok(())
}
