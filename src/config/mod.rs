//! Configuration schema definitions and validation.
//!
//! Defines the runtime's configuration: logging, video timing and retry
//! policy, and the page mount point identifiers. All sections are
//! serializable to/from TOML and every field has a default.

mod general;
mod loading;
mod mounts;
mod paths;
mod video;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use mounts::MountConfig;
pub use paths::ConfigPaths;
pub use video::{HomeBackgroundConfig, VideoConfig};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General runtime settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Video player timing and policy.
    #[serde(default)]
    pub video: VideoConfig,

    /// Page mount point identifiers.
    #[serde(default)]
    pub mounts: MountConfig,
}
