//! `bndkit show` command

use anyhow::{bail, Context, Result};

use crate::cli::{GlobalArgs, ShowArgs};
use bndkit::core::ManifestModel;
use bndkit::project::find_manifest;

pub fn execute(args: ShowArgs, global: &GlobalArgs) -> Result<()> {
    let (ctx, _shell) = super::setup(global)?;
    let root = super::project_root(&ctx, args.path)?;
    let config = ctx.load_config(&root);
    let manifest = ManifestModel::load(&find_manifest(&root, config.project.manifest.as_deref())?)?;

    if let Some(attribute) = args.attribute {
        let Some(value) = manifest.attribute(&attribute) else {
            bail!("header `{}` is not set", attribute);
        };
        println!("{}", value);
        return Ok(());
    }

    let summary = manifest.summary();
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to serialize manifest")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "{} v{}",
        summary.symbolic_name.as_deref().unwrap_or("<unnamed>"),
        summary.version
    );
    let fields = [
        ("Name", &summary.name),
        ("Activator", &summary.activator),
        ("Vendor", &summary.vendor),
        ("Description", &summary.description),
        ("Update location", &summary.update_location),
        ("Documentation", &summary.doc_url),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {:<16}{}", format!("{}:", label), value);
        }
    }

    let lists = [
        ("Class path", &summary.class_path),
        ("Exports", &summary.exports),
        ("Imports", &summary.imports),
        ("Dynamic imports", &summary.dynamic_imports),
        ("Environments", &summary.execution_environments),
    ];
    for (label, items) in lists {
        if items.is_empty() {
            continue;
        }
        println!("  {}:", label);
        for item in items {
            println!("    - {}", item);
        }
    }

    Ok(())
}
