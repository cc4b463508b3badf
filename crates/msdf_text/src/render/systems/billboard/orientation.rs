//! Billboard orientation calculations

use crate::foundation::math::{constants, Mat4, Quat, Transform, Vec3};

/// Half turn about X
///
/// Glyph layout runs top-down (y grows downward) while the world is Y-up, so
/// the mesh is flipped before it is turned toward the camera.
pub fn upright_flip() -> Quat {
    Quat::from_axis_angle(&Vec3::x_axis(), constants::PI)
}

/// Rotation that takes camera-space directions into the parent's local space
pub fn view_to_parent(parent_rotation: &Quat, camera_orientation: &Quat) -> Quat {
    parent_rotation.inverse() * camera_orientation
}

/// Local rotation that makes a text mesh face the camera under any parent
///
/// `parent * facing_rotation(parent, camera) == camera * upright_flip()`.
pub fn facing_rotation(parent_rotation: &Quat, camera_orientation: &Quat) -> Quat {
    view_to_parent(parent_rotation, camera_orientation) * upright_flip()
}

/// World matrix of a billboard given its parent and solved local transform
pub fn calculate_billboard_matrix(parent: &Transform, local: &Transform) -> Mat4 {
    parent.combine(local).to_matrix()
}
