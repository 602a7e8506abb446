use std::fmt;

use serde::{Deserialize, Serialize};

use super::VideoError;

/// Identifier of a page element a player or effect is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(String);

impl MountId {
    /// Create a mount id from an element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The element id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Background player slot an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackTarget {
    /// Page-lifetime background behind the landing section
    Home,

    /// Background inside the work-detail modal hero
    Detail,
}

impl PlaybackTarget {
    /// Both background slots.
    pub const ALL: [PlaybackTarget; 2] = [PlaybackTarget::Home, PlaybackTarget::Detail];

    pub(crate) fn index(self) -> usize {
        match self {
            PlaybackTarget::Home => 0,
            PlaybackTarget::Detail => 1,
        }
    }
}

impl fmt::Display for PlaybackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackTarget::Home => f.write_str("home"),
            PlaybackTarget::Detail => f.write_str("detail"),
        }
    }
}

/// Playback state reported by the embed.
///
/// Discriminants are the embed's wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// Created but never started
    Unstarted,

    /// Reached the clipped end
    Ended,

    /// Currently playing
    Playing,

    /// Paused by the user, the page, or an autoplay block
    Paused,

    /// Waiting for data
    Buffering,

    /// Loaded and ready to start
    Cued,
}

impl PlayerState {
    /// Wire code used by the embed.
    pub fn code(self) -> i32 {
        match self {
            PlayerState::Unstarted => -1,
            PlayerState::Ended => 0,
            PlayerState::Playing => 1,
            PlayerState::Paused => 2,
            PlayerState::Buffering => 3,
            PlayerState::Cued => 5,
        }
    }
}

impl TryFrom<i32> for PlayerState {
    type Error = VideoError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(PlayerState::Unstarted),
            0 => Ok(PlayerState::Ended),
            1 => Ok(PlayerState::Playing),
            2 => Ok(PlayerState::Paused),
            3 => Ok(PlayerState::Buffering),
            5 => Ok(PlayerState::Cued),
            other => Err(VideoError::UnknownState(other)),
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerState::Unstarted => "UNSTARTED",
            PlayerState::Ended => "ENDED",
            PlayerState::Playing => "PLAYING",
            PlayerState::Paused => "PAUSED",
            PlayerState::Buffering => "BUFFERING",
            PlayerState::Cued => "CUED",
        };
        f.write_str(name)
    }
}

/// Error code carried by an embed error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    /// Short description of the well-known embed error codes.
    pub fn describe(self) -> &'static str {
        match self.0 {
            2 => "invalid parameter",
            5 => "html5 player error",
            100 => "video not found",
            101 | 150 => "embedding not allowed",
            _ => "unknown error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.describe())
    }
}

/// Notification delivered by a live embed player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The player finished initialising and accepts commands
    Ready,

    /// The playback state changed
    StateChange(PlayerState),

    /// The player failed
    Error(ErrorCode),
}

/// A time-bounded slice of a source used for autoplay previews.
///
/// `start_offset_seconds < end_offset_seconds` is assumed, not enforced. A
/// segment that violates it makes the monitor loop back on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSegment {
    /// Embed source id
    pub source_id: String,

    /// Offset playback starts from and loops back to
    pub start_offset_seconds: f64,

    /// Offset at which playback loops back or pauses
    pub end_offset_seconds: f64,

    /// Loop back to the start instead of pausing at the end
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

impl PreviewSegment {
    /// Create a segment.
    pub fn new(source_id: impl Into<String>, start: f64, end: f64, loop_playback: bool) -> Self {
        Self {
            source_id: source_id.into(),
            start_offset_seconds: start,
            end_offset_seconds: end,
            loop_playback,
        }
    }

    /// Whether the segment satisfies `0 <= start < end`.
    pub fn is_well_formed(&self) -> bool {
        self.start_offset_seconds >= 0.0 && self.start_offset_seconds < self.end_offset_seconds
    }
}

/// Construction options handed to the embed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// Embed source id
    pub source_id: String,

    /// Offset the embed starts at, in seconds
    pub start: f64,

    /// Offset the embed clips at, in seconds
    pub end: Option<f64>,

    /// Start muted
    pub mute: bool,

    /// Native looping. Always off: it restarts at zero instead of `start`.
    pub native_loop: bool,

    /// Start playback as soon as possible
    pub autoplay: bool,

    /// Show the embed's own controls
    pub controls: bool,

    /// Play inline on mobile instead of fullscreen
    pub plays_inline: bool,

    /// Page origin, for the embed's postMessage checks
    pub origin: Option<String>,
}

impl PlayerOptions {
    /// Options for a muted, chrome-less autoplaying player.
    pub fn autoplay_muted(
        source_id: impl Into<String>,
        start: f64,
        end: Option<f64>,
        origin: Option<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            start,
            end,
            mute: true,
            native_loop: false,
            autoplay: true,
            controls: false,
            plays_inline: true,
            origin,
        }
    }
}
