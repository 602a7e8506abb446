//! Unit tests for the video service
//!
//! Every test runs on a paused clock against [`SimulatedEmbed`] and an
//! in-memory page, so the 2000/1000/500/100 ms timers are deterministic.

#![allow(clippy::unwrap_used)]

mod background;

use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    page::page_surface,
    services::video::{
        BackgroundController, JournalEntry, MemorySurface, PreviewController, ReadinessGate,
        SimulatedEmbed, SimulationOptions, Surface,
    },
};

struct Harness {
    config: Config,
    embed: Arc<SimulatedEmbed>,
    surface: Arc<MemorySurface>,
}

impl Harness {
    fn new(options: SimulationOptions) -> Self {
        Self::with_config(Config::default(), options)
    }

    fn with_config(config: Config, options: SimulationOptions) -> Self {
        let surface = page_surface(&config.mounts).unwrap();
        let mounts = &config.mounts;
        surface
            .create(&mounts.modal_hero(), &mounts.detail_container())
            .unwrap();
        surface
            .create(&mounts.detail_container(), &mounts.detail_player())
            .unwrap();

        Self {
            embed: Arc::new(SimulatedEmbed::new(options)),
            surface: Arc::new(surface),
            config,
        }
    }

    fn gate(&self) -> Arc<ReadinessGate> {
        ReadinessGate::new(
            self.embed.clone(),
            self.surface.clone(),
            &self.config.video,
            &self.config.mounts,
        )
    }

    async fn ready_gate(&self) -> Arc<ReadinessGate> {
        let gate = self.gate();
        gate.request_capability();
        assert!(gate.wait_ready().await);
        gate
    }

    fn background(&self, gate: Arc<ReadinessGate>) -> BackgroundController {
        BackgroundController::new(
            gate,
            self.embed.clone(),
            self.surface.clone(),
            self.config.video.clone(),
            self.config.mounts.clone(),
        )
    }

    fn preview(&self) -> PreviewController {
        PreviewController::new(
            self.embed.clone(),
            self.surface.clone(),
            self.config.video.clone(),
            self.config.mounts.clone(),
        )
    }

    fn constructed(&self) -> usize {
        self.embed
            .journal()
            .iter()
            .filter(|entry| matches!(entry, JournalEntry::Constructed { .. }))
            .count()
    }

    fn destroyed(&self) -> usize {
        self.embed
            .journal()
            .iter()
            .filter(|entry| matches!(entry, JournalEntry::Destroyed { .. }))
            .count()
    }
}

async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

/// Let spawned tasks drain their queues without moving the clock meaningfully.
async fn settle() {
    advance(1).await;
}
