//! Freerun CLI
//!
//! Command-line tools for Freerun recordings.
//!
//! # Commands
//!
//! - `inspect` - Display document layout and recording statistics
//! - `export` - Render a recording as text or JSON

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Freerun recording tools.
#[derive(Parser)]
#[command(name = "freerun")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display document layout and recording statistics
    Inspect {
        /// Recording file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Render a recording as text or JSON
    Export {
        /// Recording file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { file, format } => {
            commands::inspect::run(&file, &format)?;
        }
        Commands::Export {
            file,
            format,
            output,
        } => {
            commands::export::run(&file, &format, output.as_deref())?;
        }
        Commands::Version => {
            println!("Freerun CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Freerun Core v{}", freerun_core::VERSION);
            println!("Document format v{}", freerun_codec::FORMAT_VERSION);
        }
    }

    Ok(())
}
