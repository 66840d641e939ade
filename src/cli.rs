//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// wiki2git - Convert MediaWiki history exports into a git fast-import stream
#[derive(Parser, Debug)]
#[command(name = "wiki2git")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an export to a fast-import stream on stdout
    Convert(commands::convert::ConvertArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // Logging goes to stderr so it can never corrupt the command
        // stream on stdout.
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .format_timestamp(None)
        .init();

        match self.command {
            Commands::Convert(args) => commands::convert::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
