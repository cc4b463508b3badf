//! # MSDF Text
//!
//! Camera-facing text labels rendered from multi-channel signed distance
//! field font atlases.
//!
//! ## Features
//!
//! - **BMFont loading**: JSON font descriptors with kerning and multi-page atlases
//! - **Layout**: greedy word wrap, no-wrap and preformatted modes with alignment
//! - **Mesh building**: glyph quads plus a background and a rounded border drawn
//!   by the fragment shader from nine auxiliary quads
//! - **Billboarding**: constant pixel size, anchor and viewport placement, and
//!   clamping inside the view, solved every frame under any parent transform
//! - **Configuration**: labels described in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use msdf_text::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     msdf_text::foundation::logging::init();
//!
//!     let font = Arc::new(FontAtlas::from_file("resources/fonts/demo.json")?);
//!     let mut labels = TextLabelManager::new(font);
//!     let config = LabelConfig::load_from_file("resources/labels/title.ron")?;
//!     let key = labels.spawn(config, Transform::from_position(Vec3::new(0.0, 0.0, -4.0)))?;
//!
//!     let camera = Camera::perspective(Vec3::new(0.0, 1.0, 3.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
//!     labels.update(&camera.view(1280.0, 720.0))?;
//!
//!     if let (Some(mesh), Some(transform)) = (labels.mesh(key), labels.transform(key)) {
//!         println!("{} vertices at {:?}", mesh.vertex_count(), transform.position);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, LabelConfig},
        foundation::math::{Quat, Transform, Vec2, Vec3},
        render::{
            AnchorHorizontal, AnchorVertical, BillboardConfig, BillboardSolver, Camera,
            CameraView, Color, FontAtlas, LabelKey, TextLabelManager, TextMesh, TextUniforms,
        },
    };
}
