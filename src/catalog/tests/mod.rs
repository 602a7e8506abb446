//! Unit tests for the work catalog
//!
//! Parses in-memory JSON; file loading is covered by the integration tests.

#![allow(clippy::unwrap_used)]

use crate::{ShowreelError, catalog::Catalog, services::video::PreviewSegment};

const WORKS: &str = r#"[
    {
        "title": "MOVING",
        "slug": "moving",
        "year": "2023",
        "format": "Disney+ TV Series",
        "role": "Junior Editor",
        "hero_still_url": "images/works/moving-hero.jpg",
        "youtubeId": "SZFRw7MSPog",
        "previewStartTime": 10,
        "previewEndTime": 40,
        "tags": ["Drama", "Superpowers"],
        "credits": [{ "role": "Junior Editor", "name": "Jongkon Lim" }]
    },
    {
        "title": "Insomnia",
        "slug": "insomnia",
        "youtubeId": "",
        "previewStartTime": 0,
        "previewEndTime": 30
    },
    {
        "title": "Night Shift",
        "slug": "project-title-3",
        "youtubeId": "YCn_VaIucU4",
        "previewStartTime": 1003,
        "previewEndTime": 1183,
        "loopPreview": false,
        "detailBackground": { "startOffsetSeconds": 1003 }
    },
    {
        "title": "Tidal Patterns",
        "slug": "tidal-patterns",
        "youtubeId": "3WJweFedauI"
    }
]"#;

#[test]
fn parses_records_and_ignores_unknown_fields() {
    let catalog = Catalog::from_json_str(WORKS).unwrap();

    assert_eq!(catalog.len(), 4);
    let moving = catalog.get("moving").unwrap();
    assert_eq!(moving.year, "2023");
    assert_eq!(moving.tags, vec!["Drama", "Superpowers"]);
}

#[test]
fn preview_defaults_to_looping() {
    let catalog = Catalog::from_json_str(WORKS).unwrap();

    assert_eq!(
        catalog.get("moving").unwrap().preview_segment(),
        Some(PreviewSegment::new("SZFRw7MSPog", 10.0, 40.0, true))
    );
}

#[test]
fn loop_preview_false_pauses_at_end() {
    let catalog = Catalog::from_json_str(WORKS).unwrap();
    let segment = catalog.get("project-title-3").unwrap().preview_segment().unwrap();

    assert!(!segment.loop_playback);
    assert_eq!(segment.end_offset_seconds, 1183.0);
}

#[test]
fn empty_source_id_means_no_video() {
    let catalog = Catalog::from_json_str(WORKS).unwrap();
    let insomnia = catalog.get("insomnia").unwrap();

    assert_eq!(insomnia.source_id(), None);
    assert_eq!(insomnia.preview_segment(), None);
}

#[test]
fn preview_requires_both_times() {
    let catalog = Catalog::from_json_str(WORKS).unwrap();

    assert_eq!(catalog.get("tidal-patterns").unwrap().preview_segment(), None);
}

#[test]
fn detail_background_is_opt_in() {
    let catalog = Catalog::from_json_str(WORKS).unwrap();

    assert_eq!(
        catalog.get("project-title-3").unwrap().detail_background(),
        Some(("YCn_VaIucU4", 1003.0))
    );
    assert_eq!(catalog.get("moving").unwrap().detail_background(), None);
}

#[test]
fn rejects_duplicate_slugs() {
    let json = r#"[
        { "title": "A", "slug": "same" },
        { "title": "B", "slug": "same" }
    ]"#;

    let err = Catalog::from_json_str(json).unwrap_err();
    assert!(matches!(err, ShowreelError::ConfigValidation { .. }));
}

#[test]
fn malformed_json_reports_location() {
    let err = Catalog::from_json_str("[{").unwrap_err();

    match err {
        ShowreelError::CatalogParseError { location, .. } => assert_eq!(location, "string"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inverted_segment_is_kept() {
    let json = r#"[
        { "title": "A", "slug": "a", "youtubeId": "SZFRw7MSPog", "previewStartTime": 40, "previewEndTime": 10 }
    ]"#;

    let catalog = Catalog::from_json_str(json).unwrap();
    let segment = catalog.get("a").unwrap().preview_segment().unwrap();
    assert!(!segment.is_well_formed());
}

#[test]
fn missing_slug_is_not_found() {
    let catalog = Catalog::from_json_str(WORKS).unwrap();

    assert!(matches!(
        catalog.get("nope"),
        Err(ShowreelError::WorkNotFound(slug)) if slug == "nope"
    ));
}
