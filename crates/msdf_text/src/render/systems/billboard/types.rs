//! Billboard data structures and types
//!
//! Configuration for camera-facing text and the per-frame state the solver
//! derives from it.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Transform, Vec2};

/// Which vertical edge of the glyph box sits on the placement point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorHorizontal {
    /// Left edge of the glyph box
    Left,
    /// Center of the glyph box
    #[default]
    Center,
    /// Right edge of the glyph box
    Right,
    /// Keep the mesh origin
    None,
}

/// Which horizontal edge of the glyph box sits on the placement point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorVertical {
    /// Top edge of the glyph box
    Top,
    /// Center of the glyph box
    #[default]
    Center,
    /// Bottom edge of the glyph box
    Bottom,
    /// Keep the mesh origin
    None,
}

/// Placement across the view rectangle, in percent
///
/// (0, 0) is the top-left corner of the view, (100, 100) the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPosition {
    /// 0 = left edge, 100 = right edge
    pub horizontal: f32,
    /// 0 = top edge, 100 = bottom edge
    pub vertical: f32,
}

impl Default for ScreenPosition {
    fn default() -> Self {
        Self { horizontal: 50.0, vertical: 50.0 }
    }
}

impl ScreenPosition {
    /// Create a placement from percentages
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self { horizontal, vertical }
    }
}

/// How a text billboard sizes and places itself
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillboardConfig {
    /// Desired glyph size on screen, in pixels
    pub font_size: f32,
    /// Horizontal anchor
    pub anchor_horz: AnchorHorizontal,
    /// Vertical anchor
    pub anchor_vert: AnchorVertical,
    /// Placement in the view rectangle
    pub position: ScreenPosition,
    /// Push the text back inside the view when it overflows an edge
    pub clamp_to_viewport: bool,
}

impl Default for BillboardConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            anchor_horz: AnchorHorizontal::Center,
            anchor_vert: AnchorVertical::Center,
            position: ScreenPosition::default(),
            clamp_to_viewport: true,
        }
    }
}

/// Translation that pulls an overflowing box back into view
///
/// Components are never positive: `bottom_left` holds how far the box pokes
/// past the left/bottom edges, `top_right` past the right/top edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClampAdjustment {
    /// Overflow past the left (x) and bottom (y) edges
    pub bottom_left: Vec2,
    /// Overflow past the right (x) and top (y) edges
    pub top_right: Vec2,
}

impl ClampAdjustment {
    /// Net view-space translation
    pub fn total(&self) -> Vec2 {
        self.top_right - self.bottom_left
    }

    /// True when the box is fully visible
    pub fn is_zero(&self) -> bool {
        self.bottom_left == Vec2::zeros() && self.top_right == Vec2::zeros()
    }
}

/// Everything the solver derived for one label in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillboardState {
    /// Signed depth of the parent along the view direction
    pub distance: f32,
    /// Height of the view rectangle at that depth (world units)
    pub view_height: f32,
    /// Width of the view rectangle at that depth (world units)
    pub view_width: f32,
    /// Design units to world units
    pub scale: f32,
    /// Anchor offset in design units
    pub anchor_offset: Vec2,
    /// Placement offset in view units
    pub placement_offset: Vec2,
    /// On-screen clamp, zero when clamping is off
    pub clamp: ClampAdjustment,
    /// `anchor_offset * scale + placement_offset + clamp`, in camera axes
    pub view_offset: Vec2,
    /// Local transform to apply under the parent
    pub transform: Transform,
}
