//! buildmaster CLI tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "buildmaster")]
#[command(about = "Compile CI project definitions into schedulers and builders", long_about = None)]
struct Cli {
    /// Credentials file (defaults to ~/.buildout/.httpauth)
    #[arg(long, global = true, env = "BUILDMASTER_HTTPAUTH")]
    httpauth: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a master configuration
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "buildmaster.kdl")]
        path: PathBuf,
    },
    /// Compile a master configuration and print the result as JSON
    Compile {
        /// Path to the configuration file
        #[arg(default_value = "buildmaster.kdl")]
        path: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so compiled output on stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Validate { path } => {
            commands::validate(&path, cli.httpauth.as_deref())?;
        }
        Commands::Compile { path, pretty } => {
            commands::compile(&path, cli.httpauth.as_deref(), pretty)?;
        }
    }

    Ok(())
}
