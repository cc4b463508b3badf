//! # Rendering
//!
//! CPU side of camera-facing MSDF text: glyph layout and mesh building in
//! [`systems::text`], per-frame placement in [`systems::billboard`], and the
//! camera in [`primitives`].
//!
//! Nothing here talks to a graphics API. Meshes come out as plain vertex and
//! index buffers, uniforms as a `Pod` block, and shaders as GLSL source, so
//! any backend can upload them.

// Core primitives
pub mod primitives;

// Systems
pub mod systems;

mod label_pipeline_tests;

// Types most callers need
pub use primitives::{Camera, CameraView};
pub use systems::billboard::{
    AnchorHorizontal, AnchorVertical, BillboardConfig, BillboardError, BillboardSolver,
    BillboardState, ScreenPosition,
};
pub use systems::text::{
    AuxPart, BmFontLayout, Color, FontAtlas, FontError, GlyphLayoutService, LabelKey,
    LayoutRequest, MeshParams, TextBounds, TextLabelManager, TextMesh, TextMeshBuilder,
    TextPipelineState, TextUniforms, TextVertex, TEXT_FRAGMENT_SHADER, TEXT_VERTEX_SHADER,
};
