//! roster CLI — run and check operation scripts against an in-memory roster.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "roster", version, about = "In-memory student roster keyed by CPF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply operation scripts to a fresh roster
    Apply {
        /// Path to .toml script or directory (default: script_dir from config)
        #[arg(long)]
        script: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long)]
        format: Option<String>,

        /// Stop a script at its first failed op
        #[arg(long)]
        stop_on_error: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate script TOML files
    Validate {
        /// Path to script file or directory (default: script_dir from config)
        #[arg(long)]
        script: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example script
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roster=info,roster_core=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Apply {
            script,
            format,
            stop_on_error,
            config,
        } => commands::apply::execute(script, format, stop_on_error, config),
        Commands::Validate { script, config } => commands::validate::execute(script, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
