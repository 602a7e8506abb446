mod monitoring;
mod state;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use futures::Stream;
use monitoring::SegmentMonitor;
pub use state::PreviewState;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::{
    AutoplayPolicy, EmbedApi, EmbedPlayer, PlayerEvent, PlayerEvents, PlayerOptions, PlayerState,
    PreviewSegment, Surface, SurfaceFlags, Visibility, task::TaskGuard,
};
use crate::{
    config::{MountConfig, VideoConfig},
    services::common::Property,
};

const COMPONENT: &str = "preview";

/// Owns the single short-segment autoplay preview shown in the work modal.
///
/// The preview fades in over a static still once it is confirmed playing,
/// loops or pauses at the segment end, and restores the still on cleanup.
/// Unlike the background players it never waits for the capability: if the
/// embed is not loaded the preview is skipped and the still stays.
#[derive(Clone)]
pub struct PreviewController {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn EmbedApi>,
    surface: Arc<dyn Surface>,
    video: VideoConfig,
    mounts: MountConfig,
    autoplay: AutoplayPolicy,
    state: Property<PreviewState>,
    slot: Mutex<Option<PreviewHandle>>,
    next_generation: AtomicU64,
}

struct PreviewHandle {
    generation: u64,
    player: Arc<dyn EmbedPlayer>,
    segment: PreviewSegment,
    events: TaskGuard,
    monitor: Option<TaskGuard>,
}

impl PreviewController {
    /// Create the controller.
    pub fn new(
        api: Arc<dyn EmbedApi>,
        surface: Arc<dyn Surface>,
        video: VideoConfig,
        mounts: MountConfig,
    ) -> Self {
        let autoplay = AutoplayPolicy::new(
            video.suppress_autoplay_overlay,
            mounts.play_overlay(),
            Arc::clone(&surface),
        );

        Self {
            inner: Arc::new(Inner {
                api,
                surface,
                video,
                mounts,
                autoplay,
                state: Property::new(PreviewState::default()),
                slot: Mutex::new(None),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// Start a preview of `segment`, replacing any current one.
    ///
    /// Fails silently (logged) when the video surface is missing or the
    /// capability is not loaded.
    #[instrument(skip(self), fields(component = COMPONENT))]
    pub async fn init(&self, segment: PreviewSegment) {
        info!(
            component = COMPONENT,
            source_id = %segment.source_id,
            start = segment.start_offset_seconds,
            end = segment.end_offset_seconds,
            loop_playback = segment.loop_playback,
            "Initializing preview"
        );

        let inner = &self.inner;
        let mut slot = inner.slot.lock().await;

        if slot.is_some() || inner.state.get().is_initialized {
            inner.cleanup_locked(&mut slot);
        }

        if !segment.is_well_formed() {
            warn!(
                component = COMPONENT,
                source_id = %segment.source_id,
                "Preview segment does not end after it starts"
            );
        }

        inner.state.set(PreviewState {
            segment: Some(segment.clone()),
            ..PreviewState::default()
        });

        let hero_video = inner.mounts.hero_video();
        if !inner.surface.contains(&hero_video) {
            error!(component = COMPONENT, mount = %hero_video, "Video container not found");
            return;
        }

        let mount = inner.mounts.preview_player();
        if let Err(e) = inner.surface.create(&hero_video, &mount) {
            error!(component = COMPONENT, error = %e, "Failed to create player element");
            return;
        }

        if !inner.api.is_loaded() {
            error!(component = COMPONENT, "Embed capability not loaded, keeping still image");
            return;
        }

        let options = PlayerOptions::autoplay_muted(
            &segment.source_id,
            segment.start_offset_seconds,
            Some(segment.end_offset_seconds),
            inner.video.origin.clone(),
        );

        let (player, events) = match inner.api.construct(&mount, options) {
            Ok(constructed) => constructed,
            Err(e) => {
                error!(component = COMPONENT, error = %e, "Failed to construct player");
                return;
            }
        };

        let generation = inner.next_generation.fetch_add(1, Ordering::Relaxed);
        *slot = Some(PreviewHandle {
            generation,
            player,
            segment,
            events: inner.pump_events(generation, events),
            monitor: None,
        });

        inner.state.modify(|state| state.is_initialized = true);
        info!(component = COMPONENT, "Player object created");
    }

    /// Flip between muted and unmuted. A no-op without a live player.
    pub async fn toggle_mute(&self) {
        let inner = &self.inner;
        let slot = inner.slot.lock().await;

        let Some(handle) = slot.as_ref() else {
            error!(component = COMPONENT, "Cannot toggle mute: no player");
            return;
        };

        let mute_toggle = inner.mounts.mute_toggle();
        if inner.state.get().is_muted {
            if let Err(e) = handle.player.unmute() {
                warn!(component = COMPONENT, error = %e, "Failed to unmute");
                return;
            }
            inner.state.modify(|state| state.is_muted = false);
            inner
                .surface
                .set_flags(&mute_toggle, SurfaceFlags::UNMUTED, true);
            info!(component = COMPONENT, "Unmuted");
        } else {
            if let Err(e) = handle.player.mute() {
                warn!(component = COMPONENT, error = %e, "Failed to mute");
                return;
            }
            inner.state.modify(|state| state.is_muted = true);
            inner
                .surface
                .set_flags(&mute_toggle, SurfaceFlags::UNMUTED, false);
            info!(component = COMPONENT, "Muted");
        }
    }

    /// Start playback from the click-to-play overlay and hide it.
    pub async fn resume(&self) {
        let slot = self.inner.slot.lock().await;
        if let Some(handle) = slot.as_ref() {
            info!(component = COMPONENT, "Manual play triggered");
            if let Err(e) = handle.player.play() {
                warn!(component = COMPONENT, error = %e, "Failed to start playback");
            }
            self.inner.autoplay.dismiss();
        }
    }

    /// Tear down the preview and restore the still. Safe to call repeatedly.
    #[instrument(skip(self), fields(component = COMPONENT))]
    pub async fn cleanup(&self) {
        info!(component = COMPONENT, "Cleanup called");
        let mut slot = self.inner.slot.lock().await;
        self.inner.cleanup_locked(&mut slot);
    }

    /// Alias of [`cleanup`](Self::cleanup).
    pub async fn destroy(&self) {
        self.cleanup().await;
    }

    /// Snapshot of the preview state.
    pub fn state(&self) -> PreviewState {
        self.inner.state.get()
    }

    /// Stream of preview state changes, starting with the current state.
    pub fn watch(&self) -> impl Stream<Item = PreviewState> + Send + use<> {
        self.inner.state.watch()
    }

    /// Whether a player exists.
    pub async fn has_player(&self) -> bool {
        self.inner.slot.lock().await.is_some()
    }

    /// Whether the segment monitor is running.
    pub async fn is_monitoring(&self) -> bool {
        self.inner
            .slot
            .lock()
            .await
            .as_ref()
            .and_then(|handle| handle.monitor.as_ref())
            .is_some_and(|monitor| !monitor.is_finished())
    }
}

impl Inner {
    fn cleanup_locked(&self, slot: &mut Option<PreviewHandle>) {
        if let Some(handle) = slot.take() {
            let PreviewHandle {
                player,
                events,
                monitor,
                ..
            } = handle;

            if monitor.is_some() {
                drop(monitor);
                info!(component = COMPONENT, "Loop monitoring stopped");
            }
            drop(events);

            if let Err(e) = player.stop() {
                warn!(component = COMPONENT, error = %e, "Error stopping player");
            }
            match player.destroy() {
                Ok(()) => info!(component = COMPONENT, "Player destroyed"),
                Err(e) => error!(component = COMPONENT, error = %e, "Error destroying player"),
            }
        }

        let mounts = &self.mounts;
        self.surface
            .set_flags(&mounts.hero_still(), SurfaceFlags::FADE_OUT, false);
        self.surface
            .set_flags(&mounts.hero_video(), SurfaceFlags::FADE_IN, false);
        self.surface.clear(&mounts.hero_video());
        self.surface
            .set_visibility(&mounts.mute_toggle(), Visibility::Hidden);
        self.surface
            .set_flags(&mounts.mute_toggle(), SurfaceFlags::UNMUTED, false);
        self.autoplay.dismiss();

        self.state.set(PreviewState::default());
        debug!(component = COMPONENT, "Cleanup complete");
    }

    fn pump_events(self: &Arc<Self>, generation: u64, mut events: PlayerEvents) -> TaskGuard {
        let weak = Arc::downgrade(self);

        TaskGuard::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                inner.handle_event(generation, event).await;
            }
            debug!(component = COMPONENT, "Player event stream closed");
        })
    }

    async fn handle_event(&self, generation: u64, event: PlayerEvent) {
        let mut slot = self.slot.lock().await;
        let Some(handle) = slot
            .as_mut()
            .filter(|handle| handle.generation == generation)
        else {
            debug!(component = COMPONENT, ?event, "Ignoring event from a replaced player");
            return;
        };

        match event {
            PlayerEvent::Ready => self.on_ready(handle),
            PlayerEvent::StateChange(state) => self.on_state_change(handle, state),
            PlayerEvent::Error(code) => {
                error!(component = COMPONENT, %code, "Player error, keeping still image");
            }
        }
    }

    fn on_ready(&self, handle: &mut PreviewHandle) {
        let start = handle.segment.start_offset_seconds;
        info!(component = COMPONENT, start, "Ready, starting playback");

        if let Err(e) = handle.player.mute() {
            warn!(component = COMPONENT, error = %e, "Failed to mute");
        }
        if let Err(e) = handle.player.seek_to(start, true) {
            warn!(component = COMPONENT, error = %e, "Failed to seek to segment start");
        }
        if let Err(e) = handle.player.play() {
            warn!(component = COMPONENT, error = %e, "Failed to start playback");
        }

        self.surface
            .set_visibility(&self.mounts.mute_toggle(), Visibility::Shown);

        handle.monitor = Some(SegmentMonitor::spawn(
            Arc::clone(&handle.player),
            handle.segment.clone(),
            self.video.monitor_interval(),
        ));
    }

    fn on_state_change(&self, handle: &mut PreviewHandle, state: PlayerState) {
        debug!(component = COMPONENT, %state, "State changed");

        match state {
            PlayerState::Playing => {
                self.state.modify(|preview| preview.is_playing = true);
                self.surface
                    .set_flags(&self.mounts.hero_still(), SurfaceFlags::FADE_OUT, true);
                self.surface
                    .set_flags(&self.mounts.hero_video(), SurfaceFlags::FADE_IN, true);
            }
            PlayerState::Paused if !self.state.get().is_playing => {
                self.autoplay.on_blocked(COMPONENT);
            }
            PlayerState::Ended if !handle.segment.loop_playback => {
                info!(component = COMPONENT, "Video ended, preview does not loop");
            }
            PlayerState::Ended => {
                info!(component = COMPONENT, "Video ended, looping back to start");
                if let Err(e) = handle
                    .player
                    .seek_to(handle.segment.start_offset_seconds, true)
                {
                    warn!(component = COMPONENT, error = %e, "Failed to seek back to start");
                }
                if let Err(e) = handle.player.play() {
                    warn!(component = COMPONENT, error = %e, "Failed to restart playback");
                }
            }
            _ => {}
        }
    }
}
