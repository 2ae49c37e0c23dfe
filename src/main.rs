// file: src/main.rs
// version: 1.0.0
// guid: 6b30d5f9-84a2-4e67-b1d8-f25c7a09e483

//! Proxmox Homelab Deploy - Main entry point

use clap::Parser;
use proxmox_homelab_deploy::{
    cli::{args::Commands, build_command, summary_command, validate_command, Cli},
    logging::logger,
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    logger::init_logger(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Build {
            stack,
            output,
            format,
        } => build_command(&stack, output, format).await,
        Commands::Validate { stack } => validate_command(&stack).await,
        Commands::Summary { stack, json } => summary_command(&stack, json).await,
    }
}
