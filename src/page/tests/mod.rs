//! Unit tests for the page runtime
//!
//! Drive the modal sequencing on a paused clock against the simulated embed.

#![allow(clippy::unwrap_used)]

use std::{sync::Arc, time::Duration};

use crate::{
    catalog::Catalog,
    config::Config,
    page::{PageRuntime, page_surface},
    services::video::{
        JournalEntry, MemorySurface, PlaybackTarget, SimulatedEmbed, SimulationOptions, SlotState,
        Surface,
    },
};

const WORKS: &str = r#"[
    {
        "title": "Night Shift",
        "slug": "night-shift",
        "youtubeId": "YCn_VaIucU4",
        "previewStartTime": 1003,
        "previewEndTime": 1183,
        "loopPreview": false,
        "detailBackground": { "startOffsetSeconds": 1003 }
    },
    {
        "title": "MOVING",
        "slug": "moving",
        "youtubeId": "SZFRw7MSPog",
        "previewStartTime": 10,
        "previewEndTime": 40
    },
    {
        "title": "Insomnia",
        "slug": "insomnia",
        "youtubeId": ""
    }
]"#;

struct Page {
    runtime: PageRuntime,
    embed: Arc<SimulatedEmbed>,
    surface: Arc<MemorySurface>,
    catalog: Catalog,
}

impl Page {
    fn new(options: SimulationOptions) -> Self {
        let config = Config::default();
        let surface = Arc::new(page_surface(&config.mounts).unwrap());
        let embed = Arc::new(SimulatedEmbed::new(options));

        Self {
            runtime: PageRuntime::new(config, embed.clone(), surface.clone()),
            embed,
            surface,
            catalog: Catalog::from_json_str(WORKS).unwrap(),
        }
    }

    async fn open(&self, slug: &str) {
        self.runtime
            .open_work(self.catalog.get(slug).unwrap())
            .await;
    }

    fn constructed_sources(&self) -> Vec<String> {
        self.embed
            .journal()
            .into_iter()
            .filter_map(|entry| match entry {
                JournalEntry::Constructed { source_id, .. } => Some(source_id),
                _ => None,
            })
            .collect()
    }
}

async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[tokio::test(start_paused = true)]
async fn start_creates_home_once_ready() {
    let page = Page::new(SimulationOptions {
        load_latency: Duration::from_millis(300),
        ..SimulationOptions::default()
    });

    page.runtime.start().await;
    page.runtime.start().await;
    advance(200).await;
    assert!(!page.runtime.background().has_player(PlaybackTarget::Home).await);

    advance(200).await;
    let home = page.embed.latest_player().unwrap();
    assert_eq!(home.mount().as_str(), "video-background");
    assert_eq!(home.options().source_id, "9V2tVurYTxc");
    assert_eq!(home.options().start, 2.0);
    assert_eq!(home.options().end, Some(110.0));
    assert_eq!(page.embed.load_attempts(), 1);
    assert_eq!(page.constructed_sources().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn start_falls_back_when_capability_never_loads() {
    let page = Page::new(SimulationOptions {
        failed_loads: u32::MAX,
        ..SimulationOptions::default()
    });
    let mounts = &page.runtime.config().mounts;

    page.runtime.start().await;
    advance(5000).await;

    assert!(page.runtime.gate().state().fallback_applied);
    assert_eq!(
        page.surface.background(&mounts.home_container()),
        Some(page.runtime.config().video.fallback_fill.clone())
    );
    assert!(page.constructed_sources().is_empty());
    assert_eq!(
        page.runtime.background().slot_state(PlaybackTarget::Home).await,
        SlotState::Absent
    );
}

#[tokio::test(start_paused = true)]
async fn open_work_starts_detail_then_preview() {
    let page = Page::new(SimulationOptions::default());
    let mounts = &page.runtime.config().mounts;
    page.runtime.start().await;
    advance(10).await;

    page.open("night-shift").await;
    assert!(page.surface.contains(&mounts.detail_container()));
    assert!(page.surface.contains(&mounts.detail_player()));
    assert_eq!(page.runtime.pending_modal_tasks().await, 2);

    advance(450).await;
    assert!(!page.runtime.background().has_player(PlaybackTarget::Detail).await);

    advance(100).await;
    let detail = page.embed.live_on(&mounts.detail_player());
    assert_eq!(detail.len(), 1);
    assert_eq!(detail[0].options().start, 1003.0);
    assert_eq!(detail[0].options().end, None);
    assert!(!page.runtime.preview().has_player().await);

    advance(500).await;
    assert!(page.runtime.preview().has_player().await);
    assert_eq!(page.runtime.preview().state().source_id(), Some("YCn_VaIucU4"));
    assert_eq!(page.runtime.pending_modal_tasks().await, 0);
}

#[tokio::test(start_paused = true)]
async fn work_without_video_keeps_still() {
    let page = Page::new(SimulationOptions::default());
    page.runtime.start().await;
    advance(10).await;

    page.open("insomnia").await;
    advance(2000).await;

    assert_eq!(page.constructed_sources(), vec![String::from("9V2tVurYTxc")]);
    assert!(!page.runtime.preview().has_player().await);
    assert!(
        !page
            .surface
            .contains(&page.runtime.config().mounts.detail_container())
    );
}

#[tokio::test(start_paused = true)]
async fn close_before_delays_cancels_starts() {
    let page = Page::new(SimulationOptions::default());
    let mounts = &page.runtime.config().mounts;
    page.runtime.start().await;
    advance(10).await;

    page.open("night-shift").await;
    advance(200).await;
    page.runtime.close_work().await;
    advance(2000).await;

    assert_eq!(page.constructed_sources(), vec![String::from("9V2tVurYTxc")]);
    assert!(!page.surface.contains(&mounts.detail_container()));
    assert_eq!(page.runtime.pending_modal_tasks().await, 0);
}

#[tokio::test(start_paused = true)]
async fn close_releases_modal_players_and_keeps_home() {
    let page = Page::new(SimulationOptions::default());
    page.runtime.start().await;
    advance(10).await;

    page.open("night-shift").await;
    advance(1500).await;
    assert_eq!(page.embed.live_players().len(), 3);

    page.runtime.close_work().await;

    let live = page.embed.live_players();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].mount().as_str(), "video-background");
    assert!(!page.runtime.preview().state().is_initialized);
}

#[tokio::test(start_paused = true)]
async fn switching_works_leaves_one_preview() {
    let page = Page::new(SimulationOptions::default());
    let mounts = &page.runtime.config().mounts;
    page.runtime.start().await;
    advance(10).await;

    page.open("night-shift").await;
    advance(1200).await;
    page.open("moving").await;
    advance(1200).await;

    let previews = page.embed.live_on(&mounts.preview_player());
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].options().source_id, "SZFRw7MSPog");
    assert!(page.embed.live_on(&mounts.detail_player()).is_empty());
    assert!(!page.runtime.background().has_player(PlaybackTarget::Detail).await);
}

#[tokio::test(start_paused = true)]
async fn close_recreates_missing_home() {
    let page = Page::new(SimulationOptions::default());
    page.runtime.start().await;
    advance(10).await;

    page.runtime.background().cleanup(PlaybackTarget::Home).await;
    page.runtime.close_work().await;

    assert!(page.runtime.background().has_player(PlaybackTarget::Home).await);
    assert_eq!(page.constructed_sources().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_everything() {
    let page = Page::new(SimulationOptions::default());
    page.runtime.start().await;
    advance(10).await;
    page.open("moving").await;
    advance(1500).await;

    page.runtime.shutdown().await;
    page.runtime.shutdown().await;

    assert!(page.embed.live_players().is_empty());
    for target in PlaybackTarget::ALL {
        assert!(!page.runtime.background().has_player(target).await);
    }
    assert!(!page.runtime.preview().has_player().await);
}
