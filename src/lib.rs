pub mod math;
pub use math::{uv, Angle, Pose, Vec2};

pub mod camera;
pub use camera::{CameraError, CameraTransform};

pub mod input;
pub use input::{PointerState, TouchId, TouchState};

pub mod physics;
pub use physics::{
    Body, BodyKind, BodyStatus, ConstraintBuilder, ConstraintType, PhysicsWorld, PointQueryHit,
    ShapeGeometry, Space, SpringJoint, WorldError,
};

pub mod graphics;
pub use graphics::{Color, DebugDrawer, DrawCommand, DrawFlags, Theme};

pub mod drag;
pub use drag::{DragParams, DragState, PointerDragController, TouchDragController};

pub mod config;
pub use config::Config;

pub mod overlay;
pub use overlay::Overlay;

// Re-exported winit to guarantee versions match
#[cfg(feature = "winit")]
pub use winit;
