//! # covenant CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Covenant — contract schema validation for data stores.
///
/// Validates concrete data records against contract schemas before they
/// are accepted into a store.
#[derive(Parser, Debug)]
#[command(name = "covenant", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a data set against a contract schema.
    Validate(covenant_cli::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => covenant_cli::validate::run(&args),
    }
}
