//! Text rendering system
//!
//! Font atlas loading, glyph layout, mesh building with background/border
//! quads, shader-side material data and the label manager.

pub mod font_atlas;
pub mod glyph_layout;
pub mod bounds;
pub mod text_layout;
pub mod text_material;
pub mod shading;
pub mod mesh_cache;
pub mod world_text;

pub use font_atlas::*;
pub use glyph_layout::*;
pub use bounds::*;
pub use text_layout::*;
pub use text_material::*;
pub use mesh_cache::*;
pub use world_text::*;
