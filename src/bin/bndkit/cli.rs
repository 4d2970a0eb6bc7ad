//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// bndkit - OSGi bundle manifest tooling
#[derive(Parser)]
#[command(name = "bndkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct GlobalArgs {
    pub verbose: bool,
    pub quiet: bool,
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a bundle manifest against its project
    Check(CheckArgs),

    /// Show the parsed bundle manifest
    Show(ShowArgs),

    /// Set or remove a manifest header
    Set(SetArgs),

    /// Show which exporter each import binds to
    Resolve(ResolveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Project directory (defaults to the enclosing project)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Manifest file, relative to the project directory
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Output format: human, json, github
    #[arg(long, default_value = "human")]
    pub output_format: String,

    /// Skip resolving imports against the package catalog
    #[arg(long)]
    pub no_catalog: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Print only this header's value
    pub attribute: Option<String>,

    /// Project directory (defaults to the enclosing project)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SetArgs {
    /// Header name (e.g., Bundle-Version)
    pub attribute: String,

    /// New value; omit to remove the header
    pub value: Option<String>,

    /// Project directory (defaults to the enclosing project)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Project directory (defaults to the enclosing project)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
