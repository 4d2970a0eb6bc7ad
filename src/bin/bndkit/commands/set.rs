//! `bndkit set` command

use anyhow::Result;

use crate::cli::{GlobalArgs, SetArgs};
use bndkit::core::{ManifestEditor, ManifestModel};
use bndkit::project::find_manifest;
use bndkit::util::shell::Status;

pub fn execute(args: SetArgs, global: &GlobalArgs) -> Result<()> {
    let (ctx, shell) = super::setup(global)?;
    let root = super::project_root(&ctx, args.path)?;
    let config = ctx.load_config(&root);
    let manifest_path = find_manifest(&root, config.project.manifest.as_deref())?;

    let mut editor = ManifestEditor::new(ManifestModel::load(&manifest_path)?);
    editor.subscribe(|model| {
        tracing::debug!("manifest now has {} headers", model.attribute_names().len());
    });
    editor.set_attribute(&args.attribute, args.value.as_deref());

    if !editor.is_dirty() {
        shell.note(format!("{} unchanged", args.attribute));
        return Ok(());
    }

    ManifestModel::parse(editor.commit()).save(&manifest_path)?;
    match args.value {
        Some(value) => shell.status(Status::Updated, format!("{}: {}", args.attribute, value)),
        None => shell.status(Status::Removed, &args.attribute),
    }

    Ok(())
}
