use crate::services::video::PreviewSegment;

/// Observable state of the preview slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewState {
    /// Segment of the current or last requested preview
    pub segment: Option<PreviewSegment>,

    /// Audio is muted
    pub is_muted: bool,

    /// Playback has been confirmed by a playing notification
    pub is_playing: bool,

    /// A player was constructed for the current segment
    pub is_initialized: bool,
}

impl PreviewState {
    /// Source id of the current preview.
    pub fn source_id(&self) -> Option<&str> {
        self.segment
            .as_ref()
            .map(|segment| segment.source_id.as_str())
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            segment: None,
            is_muted: true,
            is_playing: false,
            is_initialized: false,
        }
    }
}
