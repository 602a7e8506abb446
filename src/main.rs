//! Showreel command-line entry point.
//!
//! `simulate` logs to the console and to a rotated file under the XDG state
//! directory; the other commands only log to the console.

use std::{error::Error, process};

use clap::Parser;
use showreel::{
    cli::{self, Cli, formatting::format_error},
    config::ConfigPaths,
    tracing_config,
};
use tracing::{Level, span};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    if cli.is_runtime() {
        tracing_config::init_with_file(&config.general.log_level, &ConfigPaths::log_dir()?)?;
    } else {
        tracing_config::init(&config.general.log_level)?;
    }
    let _span = span!(Level::INFO, "showreel_main").entered();

    match cli::run(cli, config).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
