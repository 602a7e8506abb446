use std::time::Duration;

use super::{Harness, advance, settle};
use crate::services::video::{
    ErrorCode, JournalEntry, PlaybackTarget, PlayerCommand, PlayerEvent, PlayerState,
    SimulationOptions, SlotState, Surface, Visibility,
};

#[tokio::test(start_paused = true)]
async fn create_twice_leaves_one_live_player() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    background
        .create_player(PlaybackTarget::Home, "xyz", 2.0, Some(110.0))
        .await;
    settle().await;

    let live = harness.embed.live_on(&harness.config.mounts.home_player());
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].options().source_id, "xyz");
    assert_eq!(
        background.source_id(PlaybackTarget::Home).await.as_deref(),
        Some("xyz")
    );

    let journal = harness.embed.journal();
    let destroyed_first = journal
        .iter()
        .position(|entry| *entry == JournalEntry::Destroyed { player: 1 })
        .unwrap();
    let constructed_second = journal
        .iter()
        .position(|entry| matches!(entry, JournalEntry::Constructed { player: 2, .. }))
        .unwrap();
    assert!(destroyed_first < constructed_second);
}

#[tokio::test(start_paused = true)]
async fn ready_forces_mute_then_plays() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    assert_eq!(
        background.slot_state(PlaybackTarget::Home).await,
        SlotState::Creating
    );
    settle().await;

    let player = harness.embed.latest_player().unwrap();
    assert_eq!(player.commands(), vec![PlayerCommand::Mute, PlayerCommand::Play]);
    assert_eq!(player.state(), PlayerState::Playing);
    assert!(player.options().mute);
    assert!(!player.options().native_loop);
    assert_eq!(
        background.slot_state(PlaybackTarget::Home).await,
        SlotState::Ready
    );
}

#[tokio::test(start_paused = true)]
async fn ended_seeks_back_to_start_and_replays() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    settle().await;

    let player = harness.embed.latest_player().unwrap();
    player.emit(PlayerEvent::StateChange(PlayerState::Ended));
    settle().await;

    assert_eq!(
        player.commands()[2..],
        [PlayerCommand::Seek(2.0), PlayerCommand::Play]
    );
    assert_eq!(
        background.slot_state(PlaybackTarget::Home).await,
        SlotState::Looping
    );
}

#[tokio::test(start_paused = true)]
async fn cleanup_is_idempotent() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    settle().await;
    let player = harness.embed.latest_player().unwrap();

    background.cleanup(PlaybackTarget::Home).await;
    let after_first = harness.embed.journal();
    background.cleanup(PlaybackTarget::Home).await;
    settle().await;

    assert_eq!(harness.embed.journal(), after_first);
    assert!(player.is_destroyed());
    assert_eq!(
        player.commands().iter().filter(|c| **c == PlayerCommand::Stop).count(),
        1
    );
    assert_eq!(harness.destroyed(), 1);
    assert!(!background.has_player(PlaybackTarget::Home).await);
    assert_eq!(
        background.slot_state(PlaybackTarget::Home).await,
        SlotState::Absent
    );
}

#[tokio::test(start_paused = true)]
async fn cleanup_without_player_is_a_no_op() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.gate());

    background.cleanup(PlaybackTarget::Detail).await;
    background.cleanup(PlaybackTarget::Detail).await;

    assert!(harness.embed.journal().is_empty());
}

#[tokio::test(start_paused = true)]
async fn teardown_completes_when_destroy_fails() {
    let harness = Harness::new(SimulationOptions {
        fail_destroy: true,
        ..SimulationOptions::default()
    });
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    settle().await;
    background.cleanup(PlaybackTarget::Home).await;

    assert!(!background.has_player(PlaybackTarget::Home).await);
    assert_eq!(
        background.slot_state(PlaybackTarget::Home).await,
        SlotState::Absent
    );
}

#[tokio::test(start_paused = true)]
async fn detail_error_applies_fallback_and_keeps_handle() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.ready_gate().await);
    let container = harness.config.mounts.detail_container();
    assert_eq!(container.as_str(), "modal-yt-background");

    background
        .create_player(PlaybackTarget::Detail, "abc", 0.0, None)
        .await;
    settle().await;

    let player = harness.embed.latest_player().unwrap();
    player.emit(PlayerEvent::Error(ErrorCode(150)));
    settle().await;

    assert_eq!(
        harness.surface.background(&container),
        Some(String::from(
            "linear-gradient(135deg, #0a0a0a 0%, #1a1a1a 100%)"
        ))
    );
    assert!(background.has_player(PlaybackTarget::Detail).await);
    assert!(!player.is_destroyed());
    assert_eq!(
        background.slot_state(PlaybackTarget::Detail).await,
        SlotState::FallbackShown
    );

    background.cleanup(PlaybackTarget::Detail).await;
    assert!(player.is_destroyed());
}

#[tokio::test(start_paused = true)]
async fn deferred_creation_polls_every_interval() {
    let harness = Harness::new(SimulationOptions {
        never_ready: true,
        ..SimulationOptions::default()
    });
    let gate = harness.gate();
    gate.request_capability();
    let background = harness.background(gate);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    assert_eq!(background.pending_attempts(PlaybackTarget::Home).await, Some(0));

    advance(3500).await;
    assert_eq!(background.pending_attempts(PlaybackTarget::Home).await, Some(3));

    advance(2000).await;
    assert_eq!(background.pending_attempts(PlaybackTarget::Home).await, Some(5));
    assert_eq!(
        background.slot_state(PlaybackTarget::Home).await,
        SlotState::Deferred { attempts: 5 }
    );
    assert_eq!(harness.constructed(), 0);
}

#[tokio::test(start_paused = true)]
async fn deferred_creation_completes_once_ready() {
    let harness = Harness::new(SimulationOptions {
        load_latency: Duration::from_millis(2500),
        ..SimulationOptions::default()
    });
    let gate = harness.gate();
    gate.request_capability();
    let background = harness.background(gate);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    advance(2900).await;
    assert!(!background.has_player(PlaybackTarget::Home).await);

    advance(200).await;
    assert!(background.has_player(PlaybackTarget::Home).await);
    assert_eq!(background.pending_attempts(PlaybackTarget::Home).await, None);
    assert_eq!(harness.constructed(), 1);
}

#[tokio::test(start_paused = true)]
async fn cleanup_cancels_deferred_creation() {
    let harness = Harness::new(SimulationOptions {
        load_latency: Duration::from_millis(3000),
        ..SimulationOptions::default()
    });
    let gate = harness.gate();
    gate.request_capability();
    let background = harness.background(gate.clone());

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    advance(1500).await;
    background.cleanup(PlaybackTarget::Home).await;

    advance(5000).await;
    assert!(gate.is_ready());
    assert_eq!(harness.constructed(), 0);
    assert_eq!(
        background.slot_state(PlaybackTarget::Home).await,
        SlotState::Absent
    );
}

#[tokio::test(start_paused = true)]
async fn newer_create_supersedes_deferred_one() {
    let harness = Harness::new(SimulationOptions {
        load_latency: Duration::from_millis(2500),
        ..SimulationOptions::default()
    });
    let gate = harness.gate();
    gate.request_capability();
    let background = harness.background(gate);

    background
        .create_player(PlaybackTarget::Home, "abc", 2.0, Some(110.0))
        .await;
    advance(400).await;
    background
        .create_player(PlaybackTarget::Home, "xyz", 2.0, Some(110.0))
        .await;
    advance(4000).await;

    assert_eq!(harness.constructed(), 1);
    assert_eq!(
        background.source_id(PlaybackTarget::Home).await.as_deref(),
        Some("xyz")
    );
}

#[tokio::test(start_paused = true)]
async fn targets_are_independent() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.ready_gate().await);

    background.create_home().await;
    background
        .create_player(PlaybackTarget::Detail, "abc", 0.0, None)
        .await;
    settle().await;
    background.cleanup(PlaybackTarget::Detail).await;

    assert!(background.has_player(PlaybackTarget::Home).await);
    assert_eq!(harness.embed.live_players().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn ensure_ready_recreates_missing_home_only() {
    let harness = Harness::new(SimulationOptions::default());
    let background = harness.background(harness.ready_gate().await);

    background.ensure_ready(PlaybackTarget::Detail).await;
    assert_eq!(harness.constructed(), 0);

    background.ensure_ready(PlaybackTarget::Home).await;
    background.ensure_ready(PlaybackTarget::Home).await;
    settle().await;

    assert_eq!(harness.constructed(), 1);
    let player = harness.embed.latest_player().unwrap();
    let home = &harness.config.video.home;
    assert_eq!(player.options().source_id, home.source_id);
    assert_eq!(player.options().start, home.start_offset_seconds);
    assert_eq!(player.options().end, home.end_offset_seconds);
}

#[tokio::test(start_paused = true)]
async fn missing_mount_leaves_slot_absent() {
    let harness = Harness::new(SimulationOptions::default());
    harness
        .surface
        .remove(&harness.config.mounts.detail_container());
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Detail, "abc", 0.0, None)
        .await;

    assert_eq!(harness.constructed(), 0);
    assert_eq!(
        background.slot_state(PlaybackTarget::Detail).await,
        SlotState::Absent
    );
}

#[tokio::test(start_paused = true)]
async fn blocked_detail_autoplay_is_silent_by_default() {
    let harness = Harness::new(SimulationOptions {
        autoplay_blocked: true,
        ..SimulationOptions::default()
    });
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Detail, "abc", 0.0, None)
        .await;
    advance(600).await;

    let overlay = harness.config.mounts.play_overlay();
    assert_eq!(harness.surface.visibility(&overlay), Visibility::Default);
    assert_eq!(
        harness.surface.background(&harness.config.mounts.detail_container()),
        None
    );
    assert!(background.has_player(PlaybackTarget::Detail).await);
}

#[tokio::test(start_paused = true)]
async fn blocked_detail_autoplay_shows_overlay_when_not_suppressed() {
    let mut config = crate::config::Config::default();
    config.video.suppress_autoplay_overlay = false;
    let harness = Harness::with_config(
        config,
        SimulationOptions {
            autoplay_blocked: true,
            ..SimulationOptions::default()
        },
    );
    let background = harness.background(harness.ready_gate().await);

    background
        .create_player(PlaybackTarget::Detail, "abc", 0.0, None)
        .await;
    advance(400).await;
    let overlay = harness.config.mounts.play_overlay();
    assert_eq!(harness.surface.visibility(&overlay), Visibility::Default);

    advance(200).await;
    assert_eq!(harness.surface.visibility(&overlay), Visibility::Shown);
}

#[tokio::test(start_paused = true)]
async fn home_has_no_autoplay_probe() {
    let mut config = crate::config::Config::default();
    config.video.suppress_autoplay_overlay = false;
    let harness = Harness::with_config(
        config,
        SimulationOptions {
            autoplay_blocked: true,
            ..SimulationOptions::default()
        },
    );
    let background = harness.background(harness.ready_gate().await);

    background.create_home().await;
    advance(1000).await;

    let overlay = harness.config.mounts.play_overlay();
    assert_eq!(harness.surface.visibility(&overlay), Visibility::Default);
}
