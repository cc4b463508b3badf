//! # 3D Camera
//!
//! Perspective camera with look-at orientation, plus [`CameraView`], the
//! immutable per-frame snapshot handed to the billboard solver.
//!
//! ## Conventions
//! - Right-handed, Y-up world space
//! - The camera looks down its local -Z axis
//! - Field of view is vertical and stored in radians

use crate::foundation::math::{Mat4, Quat, Vec3, utils};

/// 3D perspective camera
///
/// Matrices are computed on demand rather than cached.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees (converted to radians internally)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use msdf_text::foundation::math::Vec3;
    /// use msdf_text::render::primitives::Camera;
    ///
    /// let camera = Camera::perspective(Vec3::new(0.0, 2.0, 5.0), 75.0, 16.0 / 9.0, 0.1, 100.0);
    /// assert!(camera.fov > 1.3 && camera.fov < 1.31);
    /// ```
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Set the target point and up vector together
    ///
    /// The up vector does not need to be perpendicular to the view direction.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// World orientation whose local -Z is the view direction and local +Y
    /// leans toward `up`
    pub fn orientation(&self) -> Quat {
        Quat::face_towards(&-self.forward(), &self.up)
    }

    /// World-to-camera transform
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&self.position.into(), &self.target.into(), &self.up)
    }

    /// Perspective projection (OpenGL clip conventions)
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection × view; times a label's world matrix this is the
    /// `mvp` push constant of the text vertex shader
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }

    /// Snapshot for one frame rendered into a viewport of the given pixel size
    pub fn view(&self, viewport_width: f32, viewport_height: f32) -> CameraView {
        CameraView {
            position: self.position,
            orientation: self.orientation(),
            fov: self.fov,
            viewport_width,
            viewport_height,
        }
    }
}

impl Default for Camera {
    /// Above and behind the origin, 45° fov, 16:9
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Camera state for one frame, as seen by the billboard solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera orientation (local -Z forward)
    pub orientation: Quat,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
}

impl CameraView {
    /// Viewport width over height
    pub fn aspect(&self) -> f32 {
        self.viewport_width / self.viewport_height
    }

    /// Unit view direction in world space
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Express a world-space point in camera view space
    pub fn world_to_view(&self, point: Vec3) -> Vec3 {
        self.orientation.inverse() * (point - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orientation_looks_down_negative_z() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 0.1, 100.0);
        let view = camera.view(800.0, 800.0);

        assert_relative_eq!(view.forward(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(view.orientation * Vec3::y(), Vec3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_orientation_matches_view_matrix() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(4.0, 2.0, -3.0));
        camera.set_target(Vec3::new(1.0, 0.5, 2.0));

        let view = camera.view(1280.0, 720.0);
        let point = Vec3::new(-2.0, 1.0, 0.5);

        let via_matrix = camera.get_view_matrix().transform_point(&point.into());
        assert_relative_eq!(view.world_to_view(point), via_matrix.coords, epsilon = 1e-4);
        assert_relative_eq!(view.forward(), camera.forward(), epsilon = 1e-5);
    }

    #[test]
    fn test_view_projection_centers_target() {
        let mut camera = Camera::perspective(Vec3::new(3.0, 1.0, 6.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
        camera.set_target(Vec3::new(-1.0, 0.5, 0.0));

        let ndc = camera.get_view_projection_matrix().transform_point(&camera.target.into());
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);

        // A point one unit up at the target's depth lands higher on screen
        let above = camera
            .get_view_projection_matrix()
            .transform_point(&(camera.target + Vec3::new(0.0, 1.0, 0.0)).into());
        assert!(above.y > 0.0);
    }

    #[test]
    fn test_view_aspect() {
        let view = Camera::default().view(1000.0, 500.0);
        assert_relative_eq!(view.aspect(), 2.0);
    }
}
