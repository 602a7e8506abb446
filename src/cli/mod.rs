//! Command-line interface.
//!
//! `simulate` runs the page runtime against the simulated embed and reports
//! what the page ends up showing, `catalog` lists the playback parameters of
//! every work and `config` prints the effective configuration.

mod commands;
pub mod formatting;
#[cfg(test)]
mod tests;
mod types;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
pub use types::{CliError, CommandResult};

use crate::config::{Config, ConfigPaths};

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "showreel")]
#[command(about = "Embedded video runtime for a portfolio page")]
pub struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the page against a simulated embed and print the resulting state
    Simulate(SimulateArgs),

    /// List the works in a catalog with their playback parameters
    Catalog {
        /// Catalog file (JSON array of work records)
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Print the effective configuration
    Config {
        /// Print the JSON schema instead of the values
        #[arg(long)]
        schema: bool,
    },
}

/// Arguments of `simulate`.
#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Catalog file (JSON array of work records)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Slug of the work whose modal is opened after start
    #[arg(long)]
    pub work: Option<String>,

    /// Seconds of simulated page time to run
    #[arg(long, default_value_t = 5.0)]
    pub seconds: f64,

    /// Number of capability loads that fail
    #[arg(long, default_value_t = 0)]
    pub fail_loads: u32,

    /// The capability never finishes loading
    #[arg(long)]
    pub never_ready: bool,

    /// Players stay paused as if the browser blocked autoplay
    #[arg(long)]
    pub block_autoplay: bool,

    /// Close the modal again before reporting
    #[arg(long)]
    pub close: bool,
}

impl Cli {
    /// Whether the command drives players and should log to a file as well.
    pub fn is_runtime(&self) -> bool {
        matches!(self.command, Commands::Simulate(_))
    }
}

/// Load the configuration named on the command line, or the default location.
///
/// A missing default file yields the default configuration; a missing
/// explicit file is an error.
///
/// # Errors
/// Returns error if the file cannot be read, parsed or validated.
pub fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::load_or_default(&ConfigPaths::main_config()?)?),
    }
}

/// Execute a parsed command.
///
/// # Errors
/// Returns `CliError` if the command fails.
pub async fn run(cli: Cli, config: Config) -> CommandResult {
    match cli.command {
        Commands::Simulate(args) => commands::simulate::execute(config, args).await,
        Commands::Catalog { catalog } => commands::catalog::execute(&catalog),
        Commands::Config { schema } => commands::config::execute(&config, schema),
    }
}
