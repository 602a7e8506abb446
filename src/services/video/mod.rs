//! Embedded video player lifecycle.
//!
//! The [`ReadinessGate`] loads the third-party embed once per page. The
//! [`BackgroundController`] owns the looping home and detail backgrounds and
//! the [`PreviewController`] owns the short segment preview in the work modal.
//! All three talk to the embed through [`EmbedApi`] and to the page through
//! [`Surface`].

/// Background player controller
pub mod background;
/// Embedding capability contract
pub mod embed;
/// Video service error types
pub mod error;
/// Autoplay-blocked policy
pub mod policy;
/// Preview player controller and segment monitor
pub mod preview;
/// Capability readiness gate
pub mod readiness;
/// Headless embed used by the simulator and tests
pub mod simulated;
/// Page mount point contract
pub mod surface;
/// Player and segment types
pub mod types;

pub(crate) mod task;

#[cfg(test)]
mod tests;

pub use background::{BackgroundController, SlotState};
pub use embed::{EmbedApi, EmbedPlayer, PlayerEventSender, PlayerEvents};
pub use error::VideoError;
pub use policy::{AutoplayOutcome, AutoplayPolicy};
pub use preview::{PreviewController, PreviewState};
pub use readiness::{ReadinessGate, ReadinessState};
pub use simulated::{
    ClockMode, JournalEntry, PlayerCommand, SimulatedEmbed, SimulatedPlayer, SimulationOptions,
};
pub use surface::{ElementState, MemorySurface, Surface, SurfaceFlags, Visibility};
pub use types::{
    ErrorCode, MountId, PlaybackTarget, PlayerEvent, PlayerOptions, PlayerState, PreviewSegment,
};
