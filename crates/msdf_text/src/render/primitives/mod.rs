//! Core primitive types for rendering
//!
//! The perspective camera and the per-frame view snapshot the billboard
//! solver consumes.

pub mod camera;

// Re-export commonly used types
pub use camera::{Camera, CameraView};
