//! Privacy Gate CLI for account configuration and offline evaluation.
//!
//! This tool provides commands for:
//! - Validating account privacy configuration files
//! - Evaluating activities against an account document and a decoded-sections
//!   fixture, without a running bid server

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod error;
mod evaluate;

use error::CliError;

#[derive(Parser)]
#[command(name = "pgcli")]
#[command(about = "Privacy Gate CLI for account config and offline evaluation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Account configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Evaluate activities against an account document and sections fixture
    Evaluate {
        /// Path to the TOML account privacy configuration file
        #[arg(long, short)]
        config: PathBuf,

        /// Path to the JSON decoded-sections fixture
        #[arg(long, short)]
        sections: PathBuf,

        /// Activity to evaluate (e.g. transmit_ufpd); all activities if omitted
        #[arg(long, short)]
        activity: Option<String>,

        /// Bidder the invocation is on behalf of
        #[arg(long)]
        bidder: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate an account privacy configuration file
    Validate {
        /// Path to the TOML account privacy configuration file
        #[arg(long, short)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if let Err(e) = privacy_gate_common::logging::init_logging(level) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Validate { file } => config::validate(file, cli.verbose),
        },
        Commands::Evaluate {
            config,
            sections,
            activity,
            bidder,
        } => evaluate::evaluate(config, sections, activity, bidder, cli.verbose),
    }
}
