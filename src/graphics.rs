//! Turning a physics world into backend-agnostic draw commands.

pub mod theme;
pub use theme::Theme;

pub mod debug;
pub use debug::{DebugDrawer, DrawCommand, DrawFlags};

/// Linear RGBA color with components in `0.0..=1.0`.
pub type Color = [f32; 4];

/// Convert 8-bit RGBA to a [`Color`].
pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Color {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}
