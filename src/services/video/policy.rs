use std::sync::Arc;

use tracing::info;

use super::{MountId, Surface, Visibility};

/// What happened when a player reported that autoplay did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayOutcome {
    /// Logged only; the page keeps showing its placeholder
    Silent,

    /// The click-to-play overlay was revealed
    OverlayShown,
}

/// Reaction to a blocked autoplay.
///
/// A blocked autoplay is not an error. With `suppress_overlay` set (the
/// default) it is only logged.
#[derive(Clone)]
pub struct AutoplayPolicy {
    suppress_overlay: bool,
    overlay: MountId,
    surface: Arc<dyn Surface>,
}

impl AutoplayPolicy {
    /// Create the policy.
    pub fn new(suppress_overlay: bool, overlay: MountId, surface: Arc<dyn Surface>) -> Self {
        Self {
            suppress_overlay,
            overlay,
            surface,
        }
    }

    /// Whether blocked autoplay stays silent.
    pub fn suppresses_overlay(&self) -> bool {
        self.suppress_overlay
    }

    /// Apply the policy for a player owned by `component`.
    pub fn on_blocked(&self, component: &'static str) -> AutoplayOutcome {
        if self.suppress_overlay {
            info!(component, "Autoplay blocked, staying silent");
            AutoplayOutcome::Silent
        } else {
            info!(component, overlay = %self.overlay, "Autoplay blocked, showing play overlay");
            self.surface
                .set_visibility(&self.overlay, Visibility::Shown);
            AutoplayOutcome::OverlayShown
        }
    }

    /// Hide the overlay again.
    pub fn dismiss(&self) {
        self.surface
            .set_visibility(&self.overlay, Visibility::Hidden);
    }
}
