//! Bounding volumes for laid out text

use crate::foundation::math::Vec2;

/// Axis-aligned bounding box for text layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl TextBounds {
    /// Box that contains nothing; any point expands it
    pub fn empty() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    /// Smallest box holding every point. Empty input gives [`TextBounds::empty`].
    ///
    /// A NaN coordinate poisons the matching sides instead of being skipped.
    pub fn from_points(points: &[[f32; 2]]) -> Self {
        points.iter().fold(Self::empty(), |mut bounds, &[x, y]| {
            bounds.min_x = nan_min(bounds.min_x, x);
            bounds.min_y = nan_min(bounds.min_y, y);
            bounds.max_x = nan_max(bounds.max_x, x);
            bounds.max_y = nan_max(bounds.max_y, y);
            bounds
        })
    }

    /// True when no point has been added
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// True when any side is NaN
    pub fn has_nan(&self) -> bool {
        self.min_x.is_nan() || self.min_y.is_nan() || self.max_x.is_nan() || self.max_y.is_nan()
    }

    /// Calculate width of bounding box
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }
    
    /// Calculate height of bounding box
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_y)
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.max_x, self.max_y)
    }

    /// Midpoint of the box
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Grow (or shrink, for negative amounts) every side by `amount`
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    /// Corners in quad order: bottom-left, top-left, top-right, bottom-right
    pub fn quad_corners(&self) -> [[f32; 2]; 4] {
        [
            [self.min_x, self.min_y],
            [self.min_x, self.max_y],
            [self.max_x, self.max_y],
            [self.max_x, self.min_y],
        ]
    }
}

fn nan_min(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() { f32::NAN } else { a.min(b) }
}

fn nan_max(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() { f32::NAN } else { a.max(b) }
}

/// Bounding circle in the text plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center point
    pub center: Vec2,
    /// Radius (half the box diagonal)
    pub radius: f32,
}

impl BoundingSphere {
    /// Zero radius sphere at the origin
    pub fn zero() -> Self {
        Self {
            center: Vec2::zeros(),
            radius: 0.0,
        }
    }

    /// Sphere around the bounding box of `points`
    ///
    /// Empty input gives [`BoundingSphere::zero`]. A NaN radius means the
    /// positions contain NaN and is reported, not hidden.
    pub fn from_points(points: &[[f32; 2]]) -> Self {
        if points.is_empty() {
            return Self::zero();
        }
        Self::from_bounds(&TextBounds::from_points(points))
    }

    /// Sphere centered on a box, radius half its diagonal
    pub fn from_bounds(bounds: &TextBounds) -> Self {
        if bounds.is_empty() {
            return Self::zero();
        }
        let radius = bounds.width().hypot(bounds.height()) / 2.0;
        if radius.is_nan() {
            log::error!(
                "Computed bounding radius is NaN; text positions likely contain NaN values"
            );
        }
        Self {
            center: bounds.center(),
            radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_calculation() {
        let bounds = TextBounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 50.0,
        };
        
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
        assert_eq!(bounds.center(), Vec2::new(50.0, 25.0));
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let bounds = TextBounds::from_points(&[]);
        assert!(bounds.is_empty());

        let sphere = BoundingSphere::from_points(&[]);
        assert_eq!(sphere, BoundingSphere::zero());
    }

    #[test]
    fn test_sphere_is_half_diagonal() {
        let points = [[-3.0, 0.0], [3.0, 8.0], [0.0, 4.0]];
        let sphere = BoundingSphere::from_points(&points);

        assert_relative_eq!(sphere.center, Vec2::new(0.0, 4.0));
        assert_relative_eq!(sphere.radius, 5.0);
    }

    #[test]
    fn test_nan_radius_is_surfaced() {
        let bounds = TextBounds::from_points(&[[0.0, 0.0], [f32::NAN, 2.0], [4.0, 3.0]]);
        assert!(bounds.has_nan());
        assert!(bounds.min_x.is_nan() && bounds.max_x.is_nan());
        assert_eq!((bounds.min_y, bounds.max_y), (0.0, 3.0));

        let sphere = BoundingSphere::from_points(&[[f32::NAN, 0.0], [1.0, f32::NAN]]);
        assert!(sphere.radius.is_nan());

        let poisoned = TextBounds {
            min_x: f32::NAN,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        };
        assert!(BoundingSphere::from_bounds(&poisoned).radius.is_nan());
    }
}
