/// Shared reactive primitives
pub mod common;
/// Embedded video player service
pub mod video;

pub use video::{BackgroundController, PreviewController, ReadinessGate};
