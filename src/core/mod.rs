use std::path::Path;

use thiserror::Error;

/// Error types for the showreel crate.
///
/// Covers configuration and catalog loading. Playback failures live in
/// [`VideoError`](crate::services::video::VideoError) and never escape a
/// teardown path.
#[derive(Error, Debug)]
pub enum ShowreelError {
    /// Configuration validation error
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Component that failed validation
        component: String,
        /// Validation error details
        details: String,
    },

    /// Configuration field missing or invalid
    #[error("invalid config field '{field}' in {component}: {reason}")]
    InvalidConfigField {
        /// The field that is invalid
        field: String,
        /// Component containing the field
        component: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Catalog JSON parsing error with location context
    #[error("failed to parse catalog at '{location}': {details}")]
    CatalogParseError {
        /// Location of the catalog being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// No work record with the requested slug
    #[error("work '{0}' not found in catalog")]
    WorkNotFound(String),
}

/// A specialized `Result` type for showreel operations.
pub type Result<T> = std::result::Result<T, ShowreelError>;

impl ShowreelError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        ShowreelError::TomlParseError {
            location: Self::location(path),
            details: error.to_string(),
        }
    }

    /// Creates a catalog parsing error with optional file path context.
    pub fn catalog_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        ShowreelError::CatalogParseError {
            location: Self::location(path),
            details: error.to_string(),
        }
    }

    fn location(path: Option<&Path>) -> String {
        match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        }
    }
}
