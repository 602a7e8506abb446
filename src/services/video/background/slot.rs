use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use tracing::{error, warn};

use crate::services::video::{EmbedPlayer, MountId, PlaybackTarget, task::TaskGuard};

/// Lifecycle of one background slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// No player and no pending creation
    #[default]
    Absent,

    /// Waiting for the capability; `attempts` polls have found it missing
    Deferred {
        /// Polls that found the capability missing
        attempts: u32,
    },

    /// Player constructed, waiting for its ready notification
    Creating,

    /// Player ready and asked to play
    Ready,

    /// Player reached its end at least once and was sent back to the start
    Looping,

    /// The player failed and the container shows the fallback fill
    FallbackShown,
}

/// Parameters of a background creation request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CreateRequest {
    pub(crate) source_id: String,
    pub(crate) start: f64,
    pub(crate) end: Option<f64>,
    pub(crate) mount: MountId,
    pub(crate) container: MountId,
}

/// A creation waiting for the capability.
pub(crate) struct PendingCreate {
    pub(crate) id: u64,
    pub(crate) attempts: Arc<AtomicU32>,
    pub(crate) task: TaskGuard,
}

impl PendingCreate {
    pub(crate) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }
}

/// A live background player and everything tied to its lifetime.
pub(crate) struct BackgroundHandle {
    pub(crate) generation: u64,
    pub(crate) player: Arc<dyn EmbedPlayer>,
    pub(crate) request: CreateRequest,
    pub(crate) events: TaskGuard,
    pub(crate) autoplay_probe: Option<TaskGuard>,
}

impl BackgroundHandle {
    /// Stop the handle's tasks, then release the player.
    ///
    /// Embed failures are logged and discarded; teardown always completes.
    pub(crate) fn teardown(self, target: PlaybackTarget, stop_first: bool) {
        let BackgroundHandle {
            player,
            events,
            autoplay_probe,
            ..
        } = self;

        drop(autoplay_probe);
        drop(events);

        if stop_first {
            if let Err(e) = player.stop() {
                warn!(component = "background", %target, error = %e, "Error stopping player");
            }
        }

        if let Err(e) = player.destroy() {
            error!(component = "background", %target, error = %e, "Error destroying player");
        }
    }
}

/// Owned state of one target.
#[derive(Default)]
pub(crate) struct Slot {
    pub(crate) handle: Option<BackgroundHandle>,
    pub(crate) pending: Option<PendingCreate>,
    pub(crate) state: SlotState,
}
