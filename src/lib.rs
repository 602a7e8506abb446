//! Showreel - embedded video runtime for a portfolio page.
//!
//! Showreel drives the third-party video embeds of a single-page portfolio:
//!
//! - A readiness gate that loads the embed once, retries, and falls back to a
//!   gradient fill when the embed never arrives
//! - Looping background players for the landing section and the work modal
//! - A short autoplay preview per work, looped or paused at its segment end
//! - A page runtime that sequences the modal and owns every player
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use showreel::{
//!     config::Config,
//!     page::{PageRuntime, page_surface},
//!     services::video::{SimulatedEmbed, SimulationOptions},
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let surface = Arc::new(page_surface(&config.mounts)?);
//! let embed = Arc::new(SimulatedEmbed::new(SimulationOptions::default()));
//!
//! let page = PageRuntime::new(config, embed, surface);
//! page.start().await;
//! # Ok(())
//! # }
//! ```

/// Work catalog consumed by the page.
pub mod catalog;

/// Command-line interface.
pub mod cli;

/// Configuration schema definitions and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Page-lifetime player wiring.
pub mod page;

/// Reactive services for the embedded players.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{Result, ShowreelError};
