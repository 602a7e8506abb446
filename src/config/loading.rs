use std::{fs, path::Path};

use tracing::{debug, info};

use super::Config;
use crate::{Result, ShowreelError};

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid TOML, or fails validation.
    pub fn load(path: &Path) -> Result<Config> {
        let file_content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&file_content).map_err(|e| ShowreelError::toml_parse(e, Some(path)))?;

        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Load the configuration at `path`, or the defaults if the file does not exist.
    ///
    /// # Errors
    /// Returns error if an existing file fails to load.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Config::default())
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns error if the string is not valid TOML or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| ShowreelError::toml_parse(e, None))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration back to TOML.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ShowreelError::ConfigValidation {
            component: String::from("config"),
            details: e.to_string(),
        })
    }

    /// Reject settings the players cannot run with.
    ///
    /// # Errors
    /// Returns `InvalidConfigField` for zero timer periods and
    /// `ConfigValidation` for a home segment that does not end after it starts.
    pub fn validate(&self) -> Result<()> {
        let video = &self.video;

        if video.monitor_interval_ms == 0 {
            return Err(ShowreelError::InvalidConfigField {
                field: String::from("monitor_interval_ms"),
                component: String::from("video"),
                reason: String::from("must be greater than zero"),
            });
        }

        if video.create_poll_interval_ms == 0 {
            return Err(ShowreelError::InvalidConfigField {
                field: String::from("create_poll_interval_ms"),
                component: String::from("video"),
                reason: String::from("must be greater than zero"),
            });
        }

        let home = &video.home;
        if home.source_id.trim().is_empty() {
            return Err(ShowreelError::InvalidConfigField {
                field: String::from("source_id"),
                component: String::from("video.home"),
                reason: String::from("must not be empty"),
            });
        }

        if home.start_offset_seconds < 0.0 {
            return Err(ShowreelError::ConfigValidation {
                component: String::from("video.home"),
                details: format!(
                    "start offset {} must not be negative",
                    home.start_offset_seconds
                ),
            });
        }

        if let Some(end) = home.end_offset_seconds {
            if end <= home.start_offset_seconds {
                return Err(ShowreelError::ConfigValidation {
                    component: String::from("video.home"),
                    details: format!(
                        "end offset {end} must be after start offset {}",
                        home.start_offset_seconds
                    ),
                });
            }
        }

        Ok(())
    }
}
