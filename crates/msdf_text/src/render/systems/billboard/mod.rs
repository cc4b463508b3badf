//! Billboard system
//!
//! Keeps text meshes facing the camera at a constant on-screen size, placed
//! by viewport percentage and optionally clamped inside the view.

pub mod types;
pub mod orientation;
pub mod solver;

pub use types::{
    AnchorHorizontal, AnchorVertical, BillboardConfig, BillboardState, ClampAdjustment,
    ScreenPosition,
};
pub use orientation::{calculate_billboard_matrix, facing_rotation, upright_flip, view_to_parent};
pub use solver::{
    anchor_offset, clamp_adjustment, depth_along_view, placement_offset, validate_view,
    BillboardError, BillboardSolver,
};
