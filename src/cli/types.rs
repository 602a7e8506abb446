use thiserror::Error;

use crate::ShowreelError;

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid arguments were provided to a command.
    ///
    /// Returned when arguments parse but do not make sense together, such
    /// as a work slug without a catalog.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The configuration or catalog could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ShowreelError),

    /// The simulated page could not be set up.
    #[error("Simulation error: {0}")]
    SimulationError(String),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for command execution results.
///
/// Commands return the text to print on success.
pub type CommandResult = Result<String, CliError>;
