//! Page-lifetime wiring of the video players.
//!
//! [`PageRuntime`] is constructed once per page and passed to whatever needs
//! the players. It owns the readiness gate and both controllers and
//! sequences the work modal: detail background and preview start after
//! short delays so the still image shows first.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    catalog::WorkRecord,
    config::{Config, MountConfig},
    services::video::{
        BackgroundController, EmbedApi, MemorySurface, PlaybackTarget, PreviewController,
        ReadinessGate, Surface, VideoError, task::TaskGuard,
    },
};

const COMPONENT: &str = "page";

/// Owner of the gate, the controllers and the modal sequencing.
pub struct PageRuntime {
    config: Config,
    surface: Arc<dyn Surface>,
    gate: Arc<ReadinessGate>,
    background: BackgroundController,
    preview: PreviewController,
    home_start: Mutex<Option<TaskGuard>>,
    modal_tasks: Mutex<Vec<TaskGuard>>,
}

impl PageRuntime {
    /// Build the runtime. Nothing is loaded until [`start`](Self::start).
    pub fn new(config: Config, api: Arc<dyn EmbedApi>, surface: Arc<dyn Surface>) -> Self {
        let gate = ReadinessGate::new(
            Arc::clone(&api),
            Arc::clone(&surface),
            &config.video,
            &config.mounts,
        );
        let background = BackgroundController::new(
            Arc::clone(&gate),
            Arc::clone(&api),
            Arc::clone(&surface),
            config.video.clone(),
            config.mounts.clone(),
        );
        let preview = PreviewController::new(
            api,
            Arc::clone(&surface),
            config.video.clone(),
            config.mounts.clone(),
        );

        Self {
            config,
            surface,
            gate,
            background,
            preview,
            home_start: Mutex::new(None),
            modal_tasks: Mutex::new(Vec::new()),
        }
    }

    /// Load the embed capability and start the home background once it is ready.
    #[instrument(skip(self), fields(component = COMPONENT))]
    pub async fn start(&self) {
        let mut home_start = self.home_start.lock().await;
        if home_start.is_some() {
            debug!(component = COMPONENT, "Page already started");
            return;
        }

        info!(component = COMPONENT, "Starting page runtime");
        self.gate.request_capability();

        let gate = Arc::clone(&self.gate);
        let background = self.background.clone();
        *home_start = Some(TaskGuard::spawn(async move {
            if gate.wait_ready().await {
                background.create_home().await;
            } else {
                warn!(
                    component = COMPONENT,
                    "Embed capability unavailable, home stays on fallback"
                );
            }
        }));
    }

    /// Open the modal for `work`.
    ///
    /// Whatever the previous work left behind is torn down first.
    #[instrument(skip(self, work), fields(component = COMPONENT, slug = %work.slug))]
    pub async fn open_work(&self, work: &WorkRecord) {
        info!(component = COMPONENT, slug = %work.slug, "Opening work");
        self.reset_modal().await;

        let mut tasks = self.modal_tasks.lock().await;
        let video = &self.config.video;

        if let Some((source_id, start)) = work.detail_background() {
            match self.mount_detail_background() {
                Ok(()) => {
                    let background = self.background.clone();
                    let source_id = source_id.to_string();
                    let delay = video.detail_start_delay();
                    tasks.push(TaskGuard::spawn(async move {
                        tokio::time::sleep(delay).await;
                        background
                            .create_player(PlaybackTarget::Detail, source_id, start, None)
                            .await;
                    }));
                }
                Err(e) => {
                    warn!(component = COMPONENT, error = %e, "Cannot mount detail background");
                }
            }
        }

        match work.preview_segment() {
            Some(segment) => {
                let preview = self.preview.clone();
                let delay = video.preview_start_delay();
                tasks.push(TaskGuard::spawn(async move {
                    tokio::time::sleep(delay).await;
                    preview.init(segment).await;
                }));
            }
            None => {
                debug!(component = COMPONENT, slug = %work.slug, "No preview, showing still");
            }
        }
    }

    /// Close the modal and release its players.
    #[instrument(skip(self), fields(component = COMPONENT))]
    pub async fn close_work(&self) {
        info!(component = COMPONENT, "Closing work");
        self.reset_modal().await;

        if self.gate.is_ready() {
            self.background.ensure_ready(PlaybackTarget::Home).await;
        }
    }

    /// Release every player, including the home background.
    #[instrument(skip(self), fields(component = COMPONENT))]
    pub async fn shutdown(&self) {
        info!(component = COMPONENT, "Shutting down page runtime");
        self.home_start.lock().await.take();
        self.reset_modal().await;
        self.background.shutdown().await;
    }

    /// The readiness gate.
    pub fn gate(&self) -> &Arc<ReadinessGate> {
        &self.gate
    }

    /// The background controller.
    pub fn background(&self) -> &BackgroundController {
        &self.background
    }

    /// The preview controller.
    pub fn preview(&self) -> &PreviewController {
        &self.preview
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of modal start tasks still waiting on their delay.
    pub async fn pending_modal_tasks(&self) -> usize {
        self.modal_tasks
            .lock()
            .await
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }

    async fn reset_modal(&self) {
        let cancelled = std::mem::take(&mut *self.modal_tasks.lock().await);
        if !cancelled.is_empty() {
            debug!(component = COMPONENT, tasks = cancelled.len(), "Cancelling modal tasks");
        }
        drop(cancelled);

        self.preview.cleanup().await;
        self.background.cleanup(PlaybackTarget::Detail).await;
        self.surface.remove(&self.config.mounts.detail_container());
    }

    fn mount_detail_background(&self) -> Result<(), VideoError> {
        let mounts = &self.config.mounts;
        self.surface
            .create(&mounts.modal_hero(), &mounts.detail_container())?;
        self.surface
            .create(&mounts.detail_container(), &mounts.detail_player())
    }
}

/// In-memory page with every mount point the players expect.
///
/// # Errors
/// Returns `VideoError::MountNotFound` if the mount ids nest inconsistently.
pub fn page_surface(mounts: &MountConfig) -> Result<MemorySurface, VideoError> {
    let surface = MemorySurface::with_elements([mounts.home_container(), mounts.modal_hero()]);

    surface.create(&mounts.home_container(), &mounts.home_player())?;
    for child in [
        mounts.hero_still(),
        mounts.hero_video(),
        mounts.mute_toggle(),
        mounts.play_overlay(),
    ] {
        surface.create(&mounts.modal_hero(), &child)?;
    }

    Ok(surface)
}
