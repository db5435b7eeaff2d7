use super::{rgba8, Color};

/// The colors used by the [`DebugDrawer`][super::DebugDrawer].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct Theme {
    /// Outline around filled shapes.
    pub outline: Color,
    /// Shapes of bodies that are awake and moving.
    pub shape: Color,
    /// Shapes of sleeping bodies.
    pub shape_sleeping: Color,
    /// Shapes of static bodies and bodies about to fall asleep.
    pub shape_idle: Color,
    pub constraint: Color,
    pub collision_point: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            outline: rgba8(0xC8, 0xD2, 0xE6, 0xFF),
            shape: rgba8(0xB2, 0x4C, 0x99, 0x80),
            shape_sleeping: rgba8(0x33, 0x33, 0x33, 0x80),
            shape_idle: rgba8(0xA8, 0xA8, 0xA8, 0x80),
            constraint: rgba8(0x00, 0xBF, 0x00, 0xFF),
            collision_point: rgba8(0xFF, 0x19, 0x33, 0xFF),
        }
    }
}
