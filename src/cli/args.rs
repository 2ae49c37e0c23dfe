// file: src/cli/args.rs
// version: 1.0.0
// guid: 3d85b2e7-a490-4f16-bc38-62d0f1e97a05

//! Command line argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "proxmox-homelab-deploy")]
#[command(about = "Build declarative Proxmox VM specifications for the homelab deployment")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the full deployment specification document
    Build {
        #[arg(short, long, help = "Path to the stack configuration file")]
        stack: String,

        #[arg(short, long, help = "Write the document here instead of stdout")]
        output: Option<String>,

        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Validate the stack configuration without emitting a document
    Validate {
        #[arg(short, long, help = "Path to the stack configuration file")]
        stack: String,
    },

    /// Print the aggregate exports (total vCPU, memory, storage)
    Summary {
        #[arg(short, long, help = "Path to the stack configuration file")]
        stack: String,

        #[arg(short, long)]
        json: bool,
    },
}

/// Output format for the deployment document
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Yaml,
    Json,
}
