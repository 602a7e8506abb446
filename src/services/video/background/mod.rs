mod slot;

use std::sync::{
    Arc,
    atomic::{AtomicU32, AtomicU64, Ordering},
};

pub use slot::SlotState;
use slot::{BackgroundHandle, CreateRequest, PendingCreate, Slot};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::{
    AutoplayPolicy, EmbedApi, MountId, PlaybackTarget, PlayerEvent, PlayerEvents, PlayerOptions,
    PlayerState, ReadinessGate, Surface, task::TaskGuard,
};
use crate::config::{MountConfig, VideoConfig};

const COMPONENT: &str = "background";

/// Owns the long-running looping background players.
///
/// Holds at most one player per [`PlaybackTarget`]. Creating a player for a
/// target always destroys the previous one first, and every task a player
/// owns (event pump, autoplay probe) is aborted before the player itself is
/// destroyed.
#[derive(Clone)]
pub struct BackgroundController {
    inner: Arc<Inner>,
}

struct Inner {
    gate: Arc<ReadinessGate>,
    api: Arc<dyn EmbedApi>,
    surface: Arc<dyn Surface>,
    video: VideoConfig,
    mounts: MountConfig,
    autoplay: AutoplayPolicy,
    slots: Mutex<[Slot; 2]>,
    next_id: AtomicU64,
}

impl BackgroundController {
    /// Create the controller. No player exists until [`create_player`](Self::create_player).
    pub fn new(
        gate: Arc<ReadinessGate>,
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
                gate,
                api,
                surface,
                video,
                mounts,
                autoplay,
                slots: Mutex::new(Default::default()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Create the player for `target`, replacing any existing one.
    ///
    /// If the capability is not ready yet the creation is deferred and
    /// re-attempted every poll interval until it is. A later
    /// `create_player` or [`cleanup`](Self::cleanup) for the same target
    /// cancels a deferred creation.
    #[instrument(skip(self, source_id), fields(component = COMPONENT))]
    pub async fn create_player(
        &self,
        target: PlaybackTarget,
        source_id: impl Into<String>,
        start: f64,
        end: Option<f64>,
    ) {
        let request = CreateRequest {
            source_id: source_id.into(),
            start,
            end,
            mount: self.inner.mount_for(target),
            container: self.inner.container_for(target),
        };
        info!(component = COMPONENT, %target, mount = %request.mount, "Creating player");

        let mut slots = self.inner.slots.lock().await;
        let slot = &mut slots[target.index()];

        if slot.pending.take().is_some() {
            debug!(component = COMPONENT, %target, "Cancelled superseded deferred creation");
        }

        if self.inner.gate.is_ready() {
            self.inner.construct(slot, target, request);
        } else {
            warn!(component = COMPONENT, %target, "Embed capability not ready, deferring creation");
            slot.pending = Some(self.inner.defer(target, request));
            slot.state = SlotState::Deferred { attempts: 0 };
        }
    }

    /// Create the home player with its canonical parameters.
    pub async fn create_home(&self) {
        let home = &self.inner.video.home;
        self.create_player(
            PlaybackTarget::Home,
            home.source_id.clone(),
            home.start_offset_seconds,
            home.end_offset_seconds,
        )
        .await;
    }

    /// Stop and destroy the player for `target`. Safe to call repeatedly.
    #[instrument(skip(self), fields(component = COMPONENT))]
    pub async fn cleanup(&self, target: PlaybackTarget) {
        info!(component = COMPONENT, %target, "Cleaning up player");

        let mut slots = self.inner.slots.lock().await;
        let slot = &mut slots[target.index()];

        if slot.pending.take().is_some() {
            debug!(component = COMPONENT, %target, "Cancelled deferred creation");
        }

        if let Some(handle) = slot.handle.take() {
            handle.teardown(target, true);
        }

        slot.state = SlotState::Absent;
    }

    /// Recreate the home player if it has gone missing.
    ///
    /// A no-op for the detail target, and while a home player exists or a
    /// home creation is still deferred.
    pub async fn ensure_ready(&self, target: PlaybackTarget) {
        if target != PlaybackTarget::Home {
            return;
        }

        let missing = {
            let slots = self.inner.slots.lock().await;
            let slot = &slots[target.index()];
            slot.handle.is_none() && slot.pending.is_none()
        };

        if missing {
            info!(component = COMPONENT, %target, "Player not found, recreating");
            self.create_home().await;
        }
    }

    /// Stop and destroy every background player.
    pub async fn shutdown(&self) {
        for target in PlaybackTarget::ALL {
            self.cleanup(target).await;
        }
    }

    /// Whether a player exists for `target`.
    pub async fn has_player(&self, target: PlaybackTarget) -> bool {
        self.inner.slots.lock().await[target.index()].handle.is_some()
    }

    /// Lifecycle state of `target`.
    pub async fn slot_state(&self, target: PlaybackTarget) -> SlotState {
        self.inner.slots.lock().await[target.index()].state
    }

    /// Polls a deferred creation for `target` has made so far, if one is pending.
    pub async fn pending_attempts(&self, target: PlaybackTarget) -> Option<u32> {
        self.inner.slots.lock().await[target.index()]
            .pending
            .as_ref()
            .map(PendingCreate::attempts)
    }

    /// Source id of the player for `target`.
    pub async fn source_id(&self, target: PlaybackTarget) -> Option<String> {
        self.inner.slots.lock().await[target.index()]
            .handle
            .as_ref()
            .map(|handle| handle.request.source_id.clone())
    }
}

impl Inner {
    fn mount_for(&self, target: PlaybackTarget) -> MountId {
        match target {
            PlaybackTarget::Home => self.mounts.home_player(),
            PlaybackTarget::Detail => self.mounts.detail_player(),
        }
    }

    fn container_for(&self, target: PlaybackTarget) -> MountId {
        match target {
            PlaybackTarget::Home => self.mounts.home_container(),
            PlaybackTarget::Detail => self.mounts.detail_container(),
        }
    }

    fn defer(self: &Arc<Self>, target: PlaybackTarget, request: CreateRequest) -> PendingCreate {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let interval = self.video.create_poll_interval();
        let weak = Arc::downgrade(self);

        let task = TaskGuard::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let Some(inner) = weak.upgrade() else {
                    return;
                };

                if inner.gate.is_ready() {
                    inner.complete_deferred(target, id, request).await;
                    return;
                }

                let attempt = counter.fetch_add(1, Ordering::Relaxed) + 1;
                inner.note_deferred(target, id, attempt).await;
                debug!(component = COMPONENT, %target, attempt, "Embed capability still not ready");
            }
        });

        PendingCreate { id, attempts, task }
    }

    async fn note_deferred(&self, target: PlaybackTarget, id: u64, attempts: u32) {
        let mut slots = self.slots.lock().await;
        let slot = &mut slots[target.index()];
        if slot.pending.as_ref().is_some_and(|pending| pending.id == id) {
            slot.state = SlotState::Deferred { attempts };
        }
    }

    async fn complete_deferred(
        self: &Arc<Self>,
        target: PlaybackTarget,
        id: u64,
        request: CreateRequest,
    ) {
        let mut slots = self.slots.lock().await;
        let slot = &mut slots[target.index()];

        match slot.pending.take() {
            Some(pending) if pending.id == id => pending.task.detach(),
            other => {
                slot.pending = other;
                return;
            }
        }

        info!(component = COMPONENT, %target, "Embed capability ready, creating deferred player");
        self.construct(slot, target, request);
    }

    fn construct(
        self: &Arc<Self>,
        slot: &mut Slot,
        target: PlaybackTarget,
        request: CreateRequest,
    ) {
        if let Some(existing) = slot.handle.take() {
            info!(component = COMPONENT, %target, "Destroying existing player");
            existing.teardown(target, false);
        }

        if !self.surface.contains(&request.mount) {
            error!(component = COMPONENT, %target, mount = %request.mount, "Mount point not found");
            slot.state = SlotState::Absent;
            return;
        }

        let options = PlayerOptions::autoplay_muted(
            &request.source_id,
            request.start,
            request.end,
            self.video.origin.clone(),
        );

        match self.api.construct(&request.mount, options) {
            Ok((player, events)) => {
                let generation = self.next_id.fetch_add(1, Ordering::Relaxed);
                let events = self.pump_events(target, generation, events);
                slot.handle = Some(BackgroundHandle {
                    generation,
                    player,
                    request,
                    events,
                    autoplay_probe: None,
                });
                slot.state = SlotState::Creating;
            }
            Err(e) => {
                error!(component = COMPONENT, %target, error = %e, "Failed to construct player");
                self.apply_fallback(&request.container);
                slot.state = SlotState::FallbackShown;
            }
        }
    }

    fn pump_events(
        self: &Arc<Self>,
        target: PlaybackTarget,
        generation: u64,
        mut events: PlayerEvents,
    ) -> TaskGuard {
        let weak = Arc::downgrade(self);

        TaskGuard::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                inner.handle_event(target, generation, event).await;
            }
            debug!(component = COMPONENT, %target, "Player event stream closed");
        })
    }

    async fn handle_event(
        self: &Arc<Self>,
        target: PlaybackTarget,
        generation: u64,
        event: PlayerEvent,
    ) {
        let mut slots = self.slots.lock().await;
        let slot = &mut slots[target.index()];

        let Some(handle) = slot
            .handle
            .as_mut()
            .filter(|handle| handle.generation == generation)
        else {
            debug!(component = COMPONENT, %target, ?event, "Ignoring event from a replaced player");
            return;
        };

        match event {
            PlayerEvent::Ready => {
                info!(component = COMPONENT, %target, "Player ready");
                if let Err(e) = handle.player.mute() {
                    warn!(component = COMPONENT, %target, error = %e, "Failed to mute player");
                }
                if let Err(e) = handle.player.play() {
                    warn!(component = COMPONENT, %target, error = %e, "Failed to start playback");
                }
                slot.state = SlotState::Ready;

                if target == PlaybackTarget::Detail {
                    handle.autoplay_probe = Some(self.probe_autoplay(target, generation));
                }
            }
            PlayerEvent::StateChange(PlayerState::Ended) => {
                info!(component = COMPONENT, %target, "Player ended, looping");
                if let Err(e) = handle.player.seek_to(handle.request.start, true) {
                    warn!(
                        component = COMPONENT,
                        %target,
                        error = %e,
                        "Failed to seek back to start"
                    );
                }
                if let Err(e) = handle.player.play() {
                    warn!(component = COMPONENT, %target, error = %e, "Failed to restart playback");
                }
                slot.state = SlotState::Looping;
            }
            PlayerEvent::StateChange(state) => {
                debug!(component = COMPONENT, %target, %state, "Player state changed");
            }
            PlayerEvent::Error(code) => {
                error!(component = COMPONENT, %target, %code, "Player error");
                self.apply_fallback(&handle.request.container);
                slot.state = SlotState::FallbackShown;
            }
        }
    }

    fn probe_autoplay(self: &Arc<Self>, target: PlaybackTarget, generation: u64) -> TaskGuard {
        let weak = Arc::downgrade(self);
        let delay = self.video.autoplay_check_delay();

        TaskGuard::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(inner) = weak.upgrade() else {
                return;
            };

            let player = {
                let slots = inner.slots.lock().await;
                match slots[target.index()]
                    .handle
                    .as_ref()
                    .filter(|handle| handle.generation == generation)
                {
                    Some(handle) => Arc::clone(&handle.player),
                    None => return,
                }
            };

            match player.player_state() {
                Ok(PlayerState::Playing) => {
                    debug!(component = COMPONENT, %target, "Autoplay confirmed");
                }
                Ok(state) => {
                    debug!(
                        component = COMPONENT,
                        %target,
                        %state,
                        "Player not playing after autoplay check"
                    );
                    inner.autoplay.on_blocked(COMPONENT);
                }
                Err(e) => {
                    debug!(
                        component = COMPONENT,
                        %target,
                        error = %e,
                        "Could not read player state"
                    );
                }
            }
        })
    }

    fn apply_fallback(&self, container: &MountId) {
        info!(component = COMPONENT, %container, "Applying fallback background");
        self.surface
            .set_background(container, &self.video.fallback_fill);
    }
}
