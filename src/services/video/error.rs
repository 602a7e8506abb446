use super::MountId;

/// Errors that can occur while driving embedded players
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VideoError {
    /// The embed capability has not been loaded
    #[error("embed capability is not loaded")]
    CapabilityUnavailable,

    /// Loading the embed capability failed
    #[error("failed to load embed capability: {0}")]
    LoadFailed(String),

    /// The page has no element with the given id
    #[error("mount point {0} not found")]
    MountNotFound(MountId),

    /// The embed refused to construct a player
    #[error("failed to construct player: {0}")]
    ConstructionFailed(String),

    /// The player was already destroyed
    #[error("player has been destroyed")]
    PlayerDestroyed,

    /// A playback command failed inside the embed
    #[error("{command} failed: {details}")]
    CommandFailed {
        /// Name of the command
        command: &'static str,
        /// Failure details reported by the embed
        details: String,
    },

    /// The embed reported a state code outside the known set
    #[error("unknown player state code {0}")]
    UnknownState(i32),
}
