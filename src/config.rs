//! The full set of tweakable parameters in one serializable record.

use crate::{
    camera::{CameraError, CameraTransform, DEFAULT_MIN_SCALE},
    drag::DragParams,
    graphics::{DebugDrawer, DrawFlags, Theme},
};

/// Configuration for an [`Overlay`][crate::overlay::Overlay].
///
/// Every field has a default, so a config file only needs to list
/// what it changes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Config {
    pub theme: Theme,
    /// Make world y point up on screen.
    pub flip_y: bool,
    /// Smallest camera scale reachable by zooming out.
    pub min_scale: f64,
    pub drag: DragParams,
    pub draw: DrawFlags,
    /// Width of constraint lines in pixels.
    pub constraint_width: f64,
    /// Radius of contact point markers in pixels.
    pub collision_point_radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        let drawer = DebugDrawer::default();
        Self {
            theme: drawer.theme,
            flip_y: false,
            min_scale: DEFAULT_MIN_SCALE,
            drag: DragParams::default(),
            draw: drawer.flags,
            constraint_width: drawer.constraint_width,
            collision_point_radius: drawer.collision_point_radius,
        }
    }
}

impl Config {
    /// Create a drawer with the configured theme and sizes.
    pub fn drawer(&self) -> DebugDrawer {
        DebugDrawer {
            theme: self.theme,
            flags: self.draw,
            constraint_width: self.constraint_width,
            collision_point_radius: self.collision_point_radius,
        }
    }

    /// Create a camera that centers the world origin in a viewport of the given size.
    pub fn camera(
        &self,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<CameraTransform, CameraError> {
        Ok(CameraTransform::centered(viewport_width, viewport_height)?
            .with_min_scale(self.min_scale)
            .with_flip_y(self.flip_y))
    }
}
