use std::{sync::Arc, time::Duration};

use futures::Stream;
use tracing::{debug, error, info, instrument};

use super::{EmbedApi, MountId, Surface};
use crate::{
    config::{MountConfig, VideoConfig},
    services::common::Property,
};

/// Load progress of the embed capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadinessState {
    /// The capability is loaded and players can be constructed
    pub is_ready: bool,

    /// A load attempt or a retry delay is in flight
    pub loading: bool,

    /// Retries consumed so far
    pub retry_count: u32,

    /// Retries allowed after the first failed attempt
    pub max_retries: u32,

    /// Load attempts started, including the first
    pub attempts: u32,

    /// Retries are exhausted and the fallback fill was applied
    pub fallback_applied: bool,
}

impl ReadinessState {
    /// Whether no further load attempts will happen.
    pub fn is_settled(&self) -> bool {
        self.is_ready || self.fallback_applied
    }
}

/// One-time initialisation barrier for the embed capability.
///
/// Lives for the whole page. The first [`request_capability`] starts the
/// load; a failure is retried `max_retries` times after a fixed delay, after
/// which the home container gets the fallback fill and the gate gives up for
/// good.
///
/// [`request_capability`]: ReadinessGate::request_capability
pub struct ReadinessGate {
    api: Arc<dyn EmbedApi>,
    surface: Arc<dyn Surface>,
    fallback_container: MountId,
    fallback_fill: String,
    retry_delay: Duration,
    state: Property<ReadinessState>,
}

impl ReadinessGate {
    /// Create the gate. Nothing is loaded until [`request_capability`](Self::request_capability).
    pub fn new(
        api: Arc<dyn EmbedApi>,
        surface: Arc<dyn Surface>,
        video: &VideoConfig,
        mounts: &MountConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            surface,
            fallback_container: mounts.home_container(),
            fallback_fill: video.fallback_fill.clone(),
            retry_delay: video.capability_retry_delay(),
            state: Property::new(ReadinessState {
                max_retries: video.capability_max_retries,
                ..ReadinessState::default()
            }),
        })
    }

    /// Start loading the capability.
    ///
    /// A no-op while a load is in flight, once ready, and after the retries
    /// are exhausted.
    #[instrument(skip(self))]
    pub fn request_capability(self: &Arc<Self>) {
        let start = self.state.modify(|state| {
            if state.loading || state.is_settled() {
                false
            } else {
                state.loading = true;
                true
            }
        });

        if !start {
            debug!(component = "readiness", "Capability load already requested");
            return;
        }

        let gate = Arc::clone(self);
        tokio::spawn(async move {
            gate.run_load().await;
        });
    }

    async fn run_load(&self) {
        loop {
            let attempt = self.state.modify(|state| {
                state.attempts += 1;
                state.attempts
            });
            info!(component = "readiness", attempt, "Loading embed capability");

            match self.api.load().await {
                Ok(()) => {
                    self.state.modify(|state| {
                        state.is_ready = true;
                        state.loading = false;
                    });
                    info!(component = "readiness", "Embed capability ready");
                    return;
                }
                Err(e) => {
                    error!(component = "readiness", error = %e, "Failed to load embed capability");
                }
            }

            let retry = self.state.modify(|state| {
                if state.retry_count < state.max_retries {
                    state.retry_count += 1;
                    true
                } else {
                    state.loading = false;
                    state.fallback_applied = true;
                    false
                }
            });

            if !retry {
                error!(
                    component = "readiness",
                    container = %self.fallback_container,
                    "Max retries reached, applying fallback"
                );
                self.surface
                    .set_background(&self.fallback_container, &self.fallback_fill);
                return;
            }

            let state = self.state.get();
            info!(
                component = "readiness",
                retry = state.retry_count,
                max_retries = state.max_retries,
                "Retrying capability load in {:?}",
                self.retry_delay
            );
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    /// Whether players can be constructed.
    pub fn is_ready(&self) -> bool {
        self.state.get().is_ready && self.api.is_loaded()
    }

    /// Snapshot of the load progress.
    pub fn state(&self) -> ReadinessState {
        self.state.get()
    }

    /// Stream of load progress, starting with the current state.
    pub fn watch(&self) -> impl Stream<Item = ReadinessState> + Send + use<> {
        self.state.watch()
    }

    /// Wait until the gate settles. Returns `true` if the capability became ready.
    pub async fn wait_ready(&self) -> bool {
        self.state.wait_for(ReadinessState::is_settled).await.is_ready
    }
}
