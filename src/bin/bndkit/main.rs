//! bndkit CLI - OSGi bundle manifest tooling

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("bndkit=debug")
    } else if cli.quiet {
        EnvFilter::new("bndkit=error")
    } else {
        EnvFilter::new("bndkit=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = cli::GlobalArgs {
        verbose: cli.verbose,
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Check(args) => commands::check::execute(args, &global),
        Commands::Show(args) => commands::show::execute(args, &global),
        Commands::Set(args) => commands::set::execute(args, &global),
        Commands::Resolve(args) => commands::resolve::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
