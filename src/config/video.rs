use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Timing, retry and fallback policy for the embedded video players.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct VideoConfig {
    /// Delay before retrying a failed capability load, in milliseconds.
    pub capability_retry_delay_ms: u64,

    /// Number of load retries before the fallback fill is applied.
    pub capability_max_retries: u32,

    /// Polling interval while a background player waits for the capability, in milliseconds.
    pub create_poll_interval_ms: u64,

    /// Delay before the detail background checks that autoplay started, in milliseconds.
    pub autoplay_check_delay_ms: u64,

    /// Period of the preview segment monitor, in milliseconds.
    ///
    /// 100 ms keeps the loop-back within a few frames of the segment end
    /// without hammering the embed with position reads.
    pub monitor_interval_ms: u64,

    /// Delay between opening a work and starting its preview, in milliseconds.
    pub preview_start_delay_ms: u64,

    /// Delay between opening a work and starting its detail background, in milliseconds.
    pub detail_start_delay_ms: u64,

    /// CSS fill applied to a background container when video is unavailable.
    pub fallback_fill: String,

    /// Keep autoplay-blocked players silent instead of showing a click-to-play overlay.
    pub suppress_autoplay_overlay: bool,

    /// Page origin passed to the embed.
    pub origin: Option<String>,

    /// Canonical parameters of the home background.
    pub home: HomeBackgroundConfig,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            capability_retry_delay_ms: 2000,
            capability_max_retries: 1,
            create_poll_interval_ms: 1000,
            autoplay_check_delay_ms: 500,
            monitor_interval_ms: 100,
            preview_start_delay_ms: 1000,
            detail_start_delay_ms: 500,
            fallback_fill: String::from("linear-gradient(135deg, #0a0a0a 0%, #1a1a1a 100%)"),
            suppress_autoplay_overlay: true,
            origin: None,
            home: HomeBackgroundConfig::default(),
        }
    }
}

impl VideoConfig {
    /// Delay before retrying a failed capability load.
    pub fn capability_retry_delay(&self) -> Duration {
        Duration::from_millis(self.capability_retry_delay_ms)
    }

    /// Polling interval for deferred background creation.
    pub fn create_poll_interval(&self) -> Duration {
        Duration::from_millis(self.create_poll_interval_ms)
    }

    /// Delay of the detail autoplay probe.
    pub fn autoplay_check_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_check_delay_ms)
    }

    /// Period of the preview segment monitor.
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }

    /// Delay between opening a work and its preview.
    pub fn preview_start_delay(&self) -> Duration {
        Duration::from_millis(self.preview_start_delay_ms)
    }

    /// Delay between opening a work and its detail background.
    pub fn detail_start_delay(&self) -> Duration {
        Duration::from_millis(self.detail_start_delay_ms)
    }
}

/// Source and segment of the home page background.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct HomeBackgroundConfig {
    /// Embed source id.
    pub source_id: String,

    /// Offset the loop returns to, in seconds.
    pub start_offset_seconds: f64,

    /// Offset where the embed clips playback, in seconds.
    pub end_offset_seconds: Option<f64>,
}

impl Default for HomeBackgroundConfig {
    fn default() -> Self {
        Self {
            source_id: String::from("9V2tVurYTxc"),
            start_offset_seconds: 2.0,
            end_offset_seconds: Some(110.0),
        }
    }
}
