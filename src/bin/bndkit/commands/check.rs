//! `bndkit check` command

use anyhow::{Context, Result};

use crate::cli::{CheckArgs, GlobalArgs};
use bndkit::ops::validate::{check, format_report_for_output, CheckOptions, OutputFormat};
use bndkit::util::shell::Status;

pub fn execute(args: CheckArgs, global: &GlobalArgs) -> Result<()> {
    let output_format: OutputFormat = args
        .output_format
        .parse()
        .with_context(|| format!("invalid output format: {}", args.output_format))?;

    let (ctx, shell) = super::setup(global)?;
    let root = super::project_root(&ctx, args.path)?;

    if output_format == OutputFormat::Human {
        shell.status(Status::Checking, root.display());
    }

    let options = CheckOptions {
        path: Some(root),
        manifest: args.manifest,
        no_catalog: args.no_catalog,
    };
    let report = check(&options, &ctx)?;

    print!(
        "{}",
        format_report_for_output(&report, output_format, shell.use_color())
    );

    // Exit with error code if validation failed
    if !report.passed {
        std::process::exit(1);
    }

    Ok(())
}
