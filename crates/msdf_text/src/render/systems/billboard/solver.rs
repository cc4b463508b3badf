//! Billboard transform solver
//!
//! Each frame, for each label: measure the parent's depth along the view
//! direction, derive the visible rectangle at that depth, pick a scale that
//! keeps glyphs at a fixed pixel size, then combine anchor, screen placement
//! and the on-screen clamp into a local transform under the parent.
//!
//! All offsets are built in camera view space (x right, y up) and rotated
//! into the parent's frame at the end, since the result is a local transform.

use crate::foundation::math::{Transform, Vec2, Vec3};
use crate::render::primitives::CameraView;
use crate::render::systems::text::{BoundingSphere, TextBounds};

use super::orientation::{facing_rotation, view_to_parent};
use super::types::{
    AnchorHorizontal, AnchorVertical, BillboardConfig, BillboardState, ClampAdjustment,
    ScreenPosition,
};

/// Preconditions the solver refuses to work without
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BillboardError {
    /// Field of view must lie strictly between 0 and π
    #[error("invalid vertical field of view: {0} rad")]
    InvalidFieldOfView(f32),

    /// Viewport has no area
    #[error("viewport has no area: {width}x{height}")]
    EmptyViewport {
        /// Pixel width
        width: f32,
        /// Pixel height
        height: f32,
    },

    /// Font design size must be positive
    #[error("font design size must be positive, got {0}")]
    InvalidDesignSize(f32),

    /// The parent lies on the camera plane, so no scale exists
    #[error("label parent lies on the camera plane (depth {0})")]
    DegenerateDepth(f32),
}

/// Signed depth of `point` in front of the camera plane
///
/// This is the projection onto the view direction, not the straight-line
/// distance, so off-axis labels are not shrunk.
pub fn depth_along_view(view: &CameraView, point: &Vec3) -> f32 {
    (point - view.position).dot(&view.forward())
}

/// Offset (design units, y up) that moves the chosen anchor onto the origin
///
/// Empty bounds anchor at the mesh origin.
pub fn anchor_offset(
    horizontal: AnchorHorizontal,
    vertical: AnchorVertical,
    bounds: &TextBounds,
    sphere: &BoundingSphere,
) -> Vec2 {
    if bounds.is_empty() {
        return Vec2::zeros();
    }

    let x = match horizontal {
        AnchorHorizontal::Left => -bounds.min_x,
        AnchorHorizontal::Center => -sphere.center.x,
        AnchorHorizontal::Right => -bounds.max_x,
        AnchorHorizontal::None => 0.0,
    };
    // Layout y grows downward and the mesh is flipped, so these are not negated
    let y = match vertical {
        AnchorVertical::Top => bounds.min_y,
        AnchorVertical::Center => sphere.center.y,
        AnchorVertical::Bottom => bounds.max_y,
        AnchorVertical::None => 0.0,
    };
    Vec2::new(x, y)
}

/// Map a percentage placement onto the view rectangle, origin at its center
pub fn placement_offset(position: &ScreenPosition, view_width: f32, view_height: f32) -> Vec2 {
    Vec2::new(
        view_width * position.horizontal / 100.0 - view_width / 2.0,
        view_height / 2.0 - view_height * position.vertical / 100.0,
    )
}

/// Translation keeping a box of `size` centered at `center` inside the view
///
/// When the box fits on an axis, at most one side can overflow, and that
/// side's overflow is undone exactly. When it is larger than the view, its
/// left or top edge is pinned to the view edge instead, so the start of the
/// text stays readable.
pub fn clamp_adjustment(center: Vec2, size: Vec2, view_width: f32, view_height: f32) -> ClampAdjustment {
    let (left, right) = clamp_axis(center.x, size.x, view_width, false);
    let (bottom, top) = clamp_axis(center.y, size.y, view_height, true);
    ClampAdjustment {
        bottom_left: Vec2::new(left, bottom),
        top_right: Vec2::new(right, top),
    }
}

/// One axis of [`clamp_adjustment`]: (low-side overflow, high-side overflow)
fn clamp_axis(center: f32, size: f32, extent: f32, pin_high: bool) -> (f32, f32) {
    let space = (extent - size) / 2.0;
    if space >= 0.0 {
        return ((center + space).min(0.0), (space - center).min(0.0));
    }

    let target = if pin_high { space } else { -space };
    let shift = target - center;
    if shift > 0.0 { (-shift, 0.0) } else { (0.0, shift) }
}

/// Solves the per-frame transform of a text billboard
#[derive(Debug, Clone, Default)]
pub struct BillboardSolver {
    config: BillboardConfig,
}

impl BillboardSolver {
    /// Create a solver for the given configuration
    pub fn new(config: BillboardConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &BillboardConfig {
        &self.config
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: BillboardConfig) {
        self.config = config;
    }

    /// Compute the local transform of a text mesh under `parent`
    ///
    /// # Arguments
    /// * `view` - Camera snapshot for this frame
    /// * `parent` - World transform of the label's parent
    /// * `bounds` - Glyph box of the mesh (design units, layout y-down)
    /// * `sphere` - Glyph circle of the mesh
    /// * `design_size` - Font size the atlas was generated at
    ///
    /// # Errors
    /// Fails when the camera, viewport or font make the scale undefined.
    /// A parent behind the camera is allowed; it yields a negative scale.
    pub fn solve(
        &self,
        view: &CameraView,
        parent: &Transform,
        bounds: &TextBounds,
        sphere: &BoundingSphere,
        design_size: f32,
    ) -> Result<BillboardState, BillboardError> {
        validate_view(view, design_size)?;

        let distance = depth_along_view(view, &parent.position);
        if distance.abs() < f32::EPSILON {
            return Err(BillboardError::DegenerateDepth(distance));
        }
        if distance < 0.0 {
            log::trace!("Billboard parent is behind the camera (depth {distance})");
        }

        let view_height = 2.0 * (view.fov / 2.0).tan() * distance;
        let view_width = view_height * view.aspect();
        let pixels_per_unit = view.viewport_width / view_width;
        let scale = self.config.font_size / (pixels_per_unit * design_size);

        let anchor = anchor_offset(self.config.anchor_horz, self.config.anchor_vert, bounds, sphere);
        let placement = placement_offset(&self.config.position, view_width, view_height);
        let unclamped = anchor * scale + placement;

        let clamp = if self.config.clamp_to_viewport && !bounds.is_empty() {
            let parent_view = view.world_to_view(parent.position);
            let box_center = parent_view.xy()
                + unclamped
                + Vec2::new(sphere.center.x * scale, -sphere.center.y * scale);
            let box_size = Vec2::new(bounds.width(), bounds.height()) * scale.abs();
            clamp_adjustment(box_center, box_size, view_width.abs(), view_height.abs())
        } else {
            ClampAdjustment::default()
        };

        let view_offset = unclamped + clamp.total();
        let to_parent = view_to_parent(&parent.rotation, &view.orientation);
        let offset = to_parent * Vec3::new(view_offset.x, view_offset.y, 0.0);

        let transform = Transform {
            position: offset.component_div(&parent.scale),
            rotation: facing_rotation(&parent.rotation, &view.orientation),
            scale: Vec3::repeat(scale).component_div(&parent.scale),
        };

        log::trace!(
            "Billboard solved: depth {:.3}, scale {:.6}, offset {:?}",
            distance,
            scale,
            view_offset
        );

        Ok(BillboardState {
            distance,
            view_height,
            view_width,
            scale,
            anchor_offset: anchor,
            placement_offset: placement,
            clamp,
            view_offset,
            transform,
        })
    }
}

/// Check the frame-wide preconditions shared by every label
///
/// # Errors
/// Non-positive or straight-angle field of view, an empty viewport or a
/// non-positive font design size.
pub fn validate_view(view: &CameraView, design_size: f32) -> Result<(), BillboardError> {
    if !(view.fov > 0.0 && view.fov < std::f32::consts::PI) {
        return Err(BillboardError::InvalidFieldOfView(view.fov));
    }
    if !(view.viewport_width > 0.0 && view.viewport_height > 0.0) {
        return Err(BillboardError::EmptyViewport {
            width: view.viewport_width,
            height: view.viewport_height,
        });
    }
    if !(design_size > 0.0) {
        return Err(BillboardError::InvalidDesignSize(design_size));
    }
    Ok(())
}
