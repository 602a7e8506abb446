//! Unit tests for config module
//!
//! Tests configuration types, defaults, validation and serialization.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use crate::{
    ShowreelError,
    config::{Config, ConfigPaths, LogLevel},
};

#[test]
fn config_default_matches_page_timings() {
    let video = Config::default().video;

    assert_eq!(video.capability_retry_delay(), Duration::from_millis(2000));
    assert_eq!(video.capability_max_retries, 1);
    assert_eq!(video.create_poll_interval(), Duration::from_millis(1000));
    assert_eq!(video.autoplay_check_delay(), Duration::from_millis(500));
    assert_eq!(video.monitor_interval(), Duration::from_millis(100));
    assert_eq!(video.preview_start_delay(), Duration::from_millis(1000));
    assert_eq!(video.detail_start_delay(), Duration::from_millis(500));
    assert!(video.suppress_autoplay_overlay);
    assert_eq!(video.home.source_id, "9V2tVurYTxc");
    assert_eq!(video.home.start_offset_seconds, 2.0);
    assert_eq!(video.home.end_offset_seconds, Some(110.0));
}

#[test]
fn default_mounts_match_page_markup() {
    let mounts = Config::default().mounts;

    assert_eq!(mounts.home_container().as_str(), "video-background-container");
    assert_eq!(mounts.detail_container().as_str(), "modal-yt-background");
    assert_eq!(mounts.hero_still().as_str(), "modal-hero-still");
    assert_eq!(mounts.hero_video().as_str(), "modal-hero-video");
    assert_eq!(mounts.mute_toggle().as_str(), "modal-mute-toggle");
}

#[test]
fn config_serialize_toml() {
    let toml_str = Config::default().to_toml_string().unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[video]"));
    assert!(toml_str.contains("[video.home]"));
    assert!(toml_str.contains("[mounts]"));
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config::default();

    let toml_str = original.to_toml_string().unwrap();
    let parsed = Config::from_toml_str(&toml_str).unwrap();

    assert_eq!(original, parsed);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config = Config::from_toml_str(
        r#"
        [general]
        log_level = "debug"

        [video]
        capability_max_retries = 3
        suppress_autoplay_overlay = false

        [video.home]
        source_id = "SZFRw7MSPog"
        "#,
    )
    .unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.video.capability_max_retries, 3);
    assert!(!config.video.suppress_autoplay_overlay);
    assert_eq!(config.video.monitor_interval_ms, 100);
    assert_eq!(config.video.home.source_id, "SZFRw7MSPog");
    assert_eq!(config.video.home.start_offset_seconds, 2.0);
    assert_eq!(config.mounts, Config::default().mounts);
}

#[test]
fn config_minimal_toml() {
    let config = Config::from_toml_str("").unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn rejects_zero_monitor_interval() {
    let err = Config::from_toml_str("[video]\nmonitor_interval_ms = 0").unwrap_err();

    match err {
        ShowreelError::InvalidConfigField { field, .. } => {
            assert_eq!(field, "monitor_interval_ms");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_zero_poll_interval() {
    let err = Config::from_toml_str("[video]\ncreate_poll_interval_ms = 0").unwrap_err();

    assert!(matches!(err, ShowreelError::InvalidConfigField { .. }));
}

#[test]
fn rejects_home_segment_ending_before_start() {
    let err = Config::from_toml_str(
        r#"
        [video.home]
        start_offset_seconds = 120
        end_offset_seconds = 110
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, ShowreelError::ConfigValidation { .. }));
}

#[test]
fn open_ended_home_segment_is_valid() {
    let mut config = Config::default();
    config.video.home.end_offset_seconds = None;

    assert!(config.validate().is_ok());
}

#[test]
fn invalid_toml_reports_string_location() {
    let err = Config::from_toml_str("[video\n").unwrap_err();

    match err {
        ShowreelError::TomlParseError { location, .. } => assert_eq!(location, "string"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn log_level_serializes_lowercase() {
    let config = Config::from_toml_str("[general]\nlog_level = \"trace\"").unwrap();

    assert_eq!(config.general.log_level, LogLevel::Trace);
    assert_eq!(LogLevel::Warn.to_string(), "warn");
}

#[test]
fn config_paths_main_config_in_showreel_dir() {
    if let Ok(path) = ConfigPaths::main_config() {
        assert!(path.ends_with("showreel/config.toml"));
    }
}
