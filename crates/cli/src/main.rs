//! Settle CLI - settle command

use anyhow::Result;
use clap::{Parser, Subcommand};
use settle_cli::OptionOverrides;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod util;

/// Settle - delayed change notification for text inputs
#[derive(Parser)]
#[command(name = "settle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log scheduler decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted event timeline on a virtual clock
    Replay {
        /// Script file (.toml or .json)
        script: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: OptionOverrides,
    },
    /// Type values line by line and watch notifications arrive
    Live {
        /// Initial value of the field
        #[arg(long, default_value = "")]
        initial: String,

        #[command(flatten)]
        overrides: OptionOverrides,
    },
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective options
    Show {
        #[command(flatten)]
        overrides: OptionOverrides,
    },
    /// Print an annotated example config file
    Example,
    /// Show where config files are looked up
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Notifications go to stdout, logs to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay { script, json, overrides } => cmd::replay::run(&script, json, &overrides),
        Commands::Live { initial, overrides } => cmd::live::run(&initial, &overrides).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show { overrides } => cmd::config::run_show(&overrides),
            ConfigCommands::Example => cmd::config::run_example(),
            ConfigCommands::Path => cmd::config::run_path(),
        },
    }
}
