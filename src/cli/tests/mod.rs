//! Unit tests for CLI module
//!
//! Parses real argument lists and runs the commands against the default
//! configuration and the demo catalog.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{Cli, CliError, run},
    config::Config,
};

fn demo_catalog() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos/works.json")
        .display()
        .to_string()
}

async fn run_args(args: &[&str]) -> Result<String, CliError> {
    run(Cli::parse_from(args), Config::default()).await
}

#[tokio::test(start_paused = true)]
async fn simulate_rejects_duration_too_large() {
    let err = run_args(&["showreel", "simulate", "--seconds", "1e20"])
        .await
        .unwrap_err();

    match err {
        CliError::InvalidArguments(message) => assert!(message.contains("--seconds")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn simulate_rejects_negative_duration() {
    let err = run_args(&["showreel", "simulate", "--seconds=-1"])
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::InvalidArguments(_)));
}

#[tokio::test(start_paused = true)]
async fn simulate_work_requires_catalog() {
    let err = run_args(&["showreel", "simulate", "--work", "moving"])
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::InvalidArguments(_)));
}

#[tokio::test(start_paused = true)]
async fn simulate_unknown_work_is_config_error() {
    let catalog = demo_catalog();
    let err = run_args(&[
        "showreel",
        "simulate",
        "--catalog",
        &catalog,
        "--work",
        "missing",
    ])
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::ConfigError(_)));
}

#[tokio::test(start_paused = true)]
async fn simulate_reports_and_releases_players() {
    let catalog = demo_catalog();
    let output = run_args(&[
        "showreel",
        "simulate",
        "--catalog",
        &catalog,
        "--work",
        "project-new-3",
        "--seconds",
        "3",
    ])
    .await
    .unwrap();

    assert!(output.contains("Simulation report"));
    assert!(output.contains("0gQYFY2gw9A"));
    assert!(output.trim_end().ends_with(": 0"));
}

#[tokio::test]
async fn catalog_lists_detail_offsets() {
    let catalog = demo_catalog();
    let output = run_args(&["showreel", "catalog", "--catalog", &catalog])
        .await
        .unwrap();

    assert!(output.contains("11 works"));
    assert!(output.contains("from 720s, full length"));
    assert!(output.contains("from 1077s, full length"));
    assert!(output.contains("still only"));
}
