use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MountId, PlayerEvent, PlayerOptions, PlayerState, VideoError};

/// Receiver of a player's ready, state-change and error notifications.
pub type PlayerEvents = mpsc::UnboundedReceiver<PlayerEvent>;

/// Sender half used by embed implementations.
pub type PlayerEventSender = mpsc::UnboundedSender<PlayerEvent>;

/// The third-party embedding capability.
///
/// Loading is asynchronous and completes at most once per successful
/// attempt. Players are constructed on an existing mount point and deliver
/// their notifications through the returned [`PlayerEvents`].
#[async_trait]
pub trait EmbedApi: Send + Sync + 'static {
    /// Load the capability. Resolving `Ok` corresponds to the embed's global
    /// ready callback.
    ///
    /// # Errors
    /// Returns `VideoError::LoadFailed` if the capability could not be loaded.
    async fn load(&self) -> Result<(), VideoError>;

    /// Whether the capability is loaded and players can be constructed.
    fn is_loaded(&self) -> bool;

    /// Construct a player on `mount`.
    ///
    /// # Errors
    /// Returns `VideoError::CapabilityUnavailable` before a successful load,
    /// or `VideoError::ConstructionFailed` if the embed rejects the options.
    fn construct(
        &self,
        mount: &MountId,
        options: PlayerOptions,
    ) -> Result<(Arc<dyn EmbedPlayer>, PlayerEvents), VideoError>;
}

/// A live embedded player instance.
///
/// Every command may fail once the underlying instance is gone; callers on
/// teardown paths log and discard those errors.
pub trait EmbedPlayer: Send + Sync {
    /// Start or resume playback.
    fn play(&self) -> Result<(), VideoError>;

    /// Pause playback.
    fn pause(&self) -> Result<(), VideoError>;

    /// Stop playback and release the stream.
    fn stop(&self) -> Result<(), VideoError>;

    /// Seek to `seconds`. `allow_seek_ahead` lets the embed fetch unbuffered data.
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) -> Result<(), VideoError>;

    /// Mute audio.
    fn mute(&self) -> Result<(), VideoError>;

    /// Unmute audio.
    fn unmute(&self) -> Result<(), VideoError>;

    /// Current playback position in seconds.
    fn current_time(&self) -> Result<f64, VideoError>;

    /// Current playback state.
    fn player_state(&self) -> Result<PlayerState, VideoError>;

    /// Tear down the instance and its element.
    fn destroy(&self) -> Result<(), VideoError>;
}
