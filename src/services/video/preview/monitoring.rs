use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tracing::{error, info, trace, warn};

use crate::services::video::{EmbedPlayer, PreviewSegment, VideoError, task::TaskGuard};

const COMPONENT: &str = "preview";

/// What the monitor does after reading a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MonitorAction {
    /// Nothing to do
    Continue,

    /// Seek back to the segment start and replay
    LoopBack,

    /// Pause and stop monitoring
    Finish,
}

/// Decides loop-back and pause-at-end from observed positions.
///
/// After a loop-back the tracker ignores positions at or past the end until
/// it sees one before the end, so a seek the embed has not applied yet is
/// never issued twice.
#[derive(Debug, Clone)]
pub(crate) struct SegmentTracker {
    end: f64,
    loop_playback: bool,
    awaiting_seek: bool,
    finished: bool,
}

impl SegmentTracker {
    pub(crate) fn new(segment: &PreviewSegment) -> Self {
        Self {
            end: segment.end_offset_seconds,
            loop_playback: segment.loop_playback,
            awaiting_seek: false,
            finished: false,
        }
    }

    pub(crate) fn observe(&mut self, position: f64) -> MonitorAction {
        if self.finished {
            return MonitorAction::Continue;
        }

        if position < self.end {
            self.awaiting_seek = false;
            return MonitorAction::Continue;
        }

        if !self.loop_playback {
            self.finished = true;
            return MonitorAction::Finish;
        }

        if self.awaiting_seek {
            MonitorAction::Continue
        } else {
            self.awaiting_seek = true;
            MonitorAction::LoopBack
        }
    }
}

/// Polls a preview player's position and enforces its segment bounds.
///
/// The embed has no "reached time X" notification and its native end
/// clipping cannot loop back to a non-zero start, so the position is polled.
pub(crate) struct SegmentMonitor;

impl SegmentMonitor {
    /// Start monitoring. The returned guard stops the monitor when dropped.
    pub(crate) fn spawn(
        player: Arc<dyn EmbedPlayer>,
        segment: PreviewSegment,
        period: Duration,
    ) -> TaskGuard {
        info!(component = COMPONENT, ?period, "Starting loop monitoring");

        TaskGuard::spawn(async move {
            Self::run(player, segment, period).await;
        })
    }

    async fn run(player: Arc<dyn EmbedPlayer>, segment: PreviewSegment, period: Duration) {
        let mut tracker = SegmentTracker::new(&segment);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let position = match player.current_time() {
                Ok(position) => position,
                Err(VideoError::PlayerDestroyed) => {
                    error!(component = COMPONENT, "Player became unavailable during monitoring");
                    return;
                }
                Err(e) => {
                    error!(component = COMPONENT, error = %e, "Error in loop monitoring");
                    continue;
                }
            };

            match tracker.observe(position) {
                MonitorAction::Continue => {
                    trace!(component = COMPONENT, position, "Monitor tick");
                }
                MonitorAction::LoopBack => {
                    info!(
                        component = COMPONENT,
                        from = segment.end_offset_seconds,
                        to = segment.start_offset_seconds,
                        "Looping preview segment"
                    );
                    if let Err(e) = player.seek_to(segment.start_offset_seconds, true) {
                        warn!(component = COMPONENT, error = %e, "Failed to seek back to start");
                    }
                    if let Err(e) = player.play() {
                        warn!(component = COMPONENT, error = %e, "Failed to replay segment");
                    }
                }
                MonitorAction::Finish => {
                    info!(component = COMPONENT, "End time reached, pausing preview");
                    if let Err(e) = player.pause() {
                        warn!(component = COMPONENT, error = %e, "Failed to pause at segment end");
                    }
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(loop_playback: bool) -> PreviewSegment {
        PreviewSegment::new("abc", 10.0, 40.0, loop_playback)
    }

    #[test]
    fn loops_once_per_crossing() {
        let mut tracker = SegmentTracker::new(&segment(true));

        assert_eq!(tracker.observe(39.9), MonitorAction::Continue);
        assert_eq!(tracker.observe(40.0), MonitorAction::LoopBack);
        assert_eq!(tracker.observe(40.1), MonitorAction::Continue);
        assert_eq!(tracker.observe(10.0), MonitorAction::Continue);
        assert_eq!(tracker.observe(40.2), MonitorAction::LoopBack);
    }

    #[test]
    fn finishes_once_without_loop() {
        let mut tracker = SegmentTracker::new(&segment(false));

        assert_eq!(tracker.observe(41.0), MonitorAction::Finish);
        assert_eq!(tracker.observe(41.0), MonitorAction::Continue);
        assert_eq!(tracker.observe(10.0), MonitorAction::Continue);
        assert_eq!(tracker.observe(45.0), MonitorAction::Continue);
    }

    #[test]
    fn malformed_segment_seeks_once_then_holds() {
        let mut tracker = SegmentTracker::new(&PreviewSegment::new("abc", 40.0, 10.0, true));

        assert_eq!(tracker.observe(40.0), MonitorAction::LoopBack);
        assert_eq!(tracker.observe(40.0), MonitorAction::Continue);
    }
}
