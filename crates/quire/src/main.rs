//! quire CLI - documentation corpus checker.
//!
//! Provides commands for:
//! - `check`: Parse every document and report broken links and bad metadata
//! - `nav`: Print the sidebar navigation tree
//! - `meta`: Print the front matter of a single file as JSON
//! - `routes`: Print the route of every document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, GlobalArgs, MetaArgs, NavArgs};
use output::Output;

/// quire - documentation corpus checker.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check front matter and cross-references of the whole corpus.
    Check(CheckArgs),
    /// Print the navigation tree.
    Nav(NavArgs),
    /// Print the parsed front matter of a file as JSON.
    Meta(MetaArgs),
    /// Print the route of every document.
    Routes,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(&cli.global),
        Commands::Nav(args) => args.execute(&cli.global),
        Commands::Meta(args) => args.execute(),
        Commands::Routes => commands::routes::execute(&cli.global),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
