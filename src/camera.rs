//! Mapping between world (simulation) space and screen space.

use crate::math as m;

/// Smallest scale magnitude a camera is allowed to reach by default.
pub const DEFAULT_MIN_SCALE: f64 = 0.05;

/// Error when a camera mutation would make the transform non-invertible.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CameraError {
    #[error("Scale factor {0} would make the camera transform degenerate")]
    DegenerateScale(f64),
    #[error("Camera transform input was not finite")]
    NonFinite,
}

/// A 2D camera transform: uniform scale, rotation and translation,
/// with an optional flip of the vertical axis.
///
/// A world point `p` is mapped to the screen as
/// ```text
/// screen = flip(scale * rotate(p) + translation) + screen_origin
/// ```
/// that is, a point is first scaled, then rotated, then translated.
/// The flip belongs to the output coordinate system, so it is applied
/// after the whole affine transform. The screen origin is a fixed offset
/// that is part of the viewport configuration rather than the camera pose
/// and is not touched by [`reset`][Self::reset].
///
/// The mutation methods compose onto the world side of the transform.
/// [`translate`][Self::translate] moves by a distance in world units,
/// so it is affected by the current scale and rotation:
/// ```
/// # use physdraw::{camera::CameraTransform, math::Vec2};
/// let mut cam = CameraTransform::new();
/// cam.scale(2.0).unwrap();
/// cam.translate(Vec2::new(10.0, 0.0)).unwrap();
/// assert_eq!(cam.to_screen(Vec2::zero()), Vec2::new(20.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    translation: m::Vec2,
    rotation: f64,
    scale: f64,
    flip_y: bool,
    screen_origin: m::Vec2,
    min_scale: f64,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraTransform {
    /// Create an identity camera.
    pub fn new() -> Self {
        Self {
            translation: m::Vec2::zero(),
            rotation: 0.0,
            scale: 1.0,
            flip_y: false,
            screen_origin: m::Vec2::zero(),
            min_scale: DEFAULT_MIN_SCALE,
        }
    }

    /// Create an identity camera that puts the world origin
    /// in the middle of a viewport of the given size.
    pub fn centered(viewport_width: f64, viewport_height: f64) -> Result<Self, CameraError> {
        let mut cam = Self::new();
        cam.set_screen_origin(m::Vec2::new(viewport_width / 2.0, viewport_height / 2.0))?;
        Ok(cam)
    }

    /// Set the smallest scale magnitude the camera can zoom to.
    ///
    /// Non-positive values are replaced with [`DEFAULT_MIN_SCALE`].
    pub fn with_min_scale(mut self, min_scale: f64) -> Self {
        self.min_scale = if min_scale > 0.0 && min_scale.is_finite() {
            min_scale
        } else {
            DEFAULT_MIN_SCALE
        };
        self.scale = self.scale.max(self.min_scale);
        self
    }

    pub fn with_flip_y(mut self, flip_y: bool) -> Self {
        self.flip_y = flip_y;
        self
    }

    //
    // Mutations
    //

    /// Return to the identity transform. Screen origin and scale limit are kept.
    pub fn reset(&mut self) {
        self.translation = m::Vec2::zero();
        self.rotation = 0.0;
        self.scale = 1.0;
        self.flip_y = false;
    }

    /// Move the camera by an offset given in world units.
    pub fn translate(&mut self, delta: m::Vec2) -> Result<(), CameraError> {
        if !m::is_finite(delta) {
            return Err(CameraError::NonFinite);
        }
        self.translation += m::rotate(delta, self.rotation) * self.scale;
        Ok(())
    }

    /// Rotate the camera by an angle in radians, counterclockwise in world space.
    pub fn rotate(&mut self, angle: f64) -> Result<(), CameraError> {
        if !angle.is_finite() {
            return Err(CameraError::NonFinite);
        }
        self.rotation += angle;
        Ok(())
    }

    /// Multiply the camera's scale by a positive factor.
    ///
    /// The resulting scale is clamped to the camera's minimum.
    pub fn scale(&mut self, factor: f64) -> Result<(), CameraError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CameraError::DegenerateScale(factor));
        }
        self.scale = (self.scale * factor).max(self.min_scale);
        Ok(())
    }

    /// Translate so that the given world point ends up at the screen origin.
    pub fn look_at(&mut self, world_point: m::Vec2) -> Result<(), CameraError> {
        if !m::is_finite(world_point) {
            return Err(CameraError::NonFinite);
        }
        self.translation = -(m::rotate(world_point, self.rotation) * self.scale);
        Ok(())
    }

    pub fn set_flip_y(&mut self, flip_y: bool) {
        self.flip_y = flip_y;
    }

    pub fn set_screen_origin(&mut self, origin: m::Vec2) -> Result<(), CameraError> {
        if !m::is_finite(origin) {
            return Err(CameraError::NonFinite);
        }
        self.screen_origin = origin;
        Ok(())
    }

    //
    // Getters
    //

    #[inline]
    pub fn translation(&self) -> m::Vec2 {
        self.translation
    }

    /// Rotation in radians.
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// How many screen units one world unit covers.
    #[inline]
    pub fn scale_magnitude(&self) -> f64 {
        self.scale.abs()
    }

    #[inline]
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    #[inline]
    pub fn screen_origin(&self) -> m::Vec2 {
        self.screen_origin
    }

    #[inline]
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    //
    // Mapping
    //

    /// Map a point from world space to screen space.
    pub fn to_screen(&self, point: m::Vec2) -> m::Vec2 {
        let p = m::rotate(point * self.scale, self.rotation) + self.translation;
        self.flip(p) + self.screen_origin
    }

    /// Map a point from screen space to world space.
    /// Exact inverse of [`to_screen`][Self::to_screen].
    pub fn to_world(&self, point: m::Vec2) -> m::Vec2 {
        let p = self.flip(point - self.screen_origin) - self.translation;
        m::rotate(p, -self.rotation) / self.scale
    }

    /// Scale a world-space length to screen space.
    #[inline]
    pub fn length_to_screen(&self, length: f64) -> f64 {
        length * self.scale_magnitude()
    }

    /// Scale a screen-space length to world space.
    #[inline]
    pub fn length_to_world(&self, length: f64) -> f64 {
        length / self.scale_magnitude()
    }

    #[inline]
    fn flip(&self, p: m::Vec2) -> m::Vec2 {
        if self.flip_y {
            m::Vec2::new(p.x, -p.y)
        } else {
            p
        }
    }

    /// The forward transform as a homogeneous matrix, for renderers that
    /// want to apply it on the GPU.
    pub fn homogeneous_matrix(&self) -> m::Mat3 {
        let (sin, cos) = self.rotation.sin_cos();
        let flip = if self.flip_y { -1.0 } else { 1.0 };
        let s = self.scale;
        let t = self.translation;
        let o = self.screen_origin;
        m::Mat3::new(
            m::Vec3::new(s * cos, flip * s * sin, 0.0),
            m::Vec3::new(-s * sin, flip * s * cos, 0.0),
            m::Vec3::new(t.x + o.x, flip * t.y + o.y, 1.0),
        )
    }
}
