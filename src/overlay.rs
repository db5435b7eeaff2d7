//! Everything needed to draw and poke at a physics world, bundled together.

use crate::{
    camera::{CameraError, CameraTransform},
    config::Config,
    drag::{PointerDragController, TouchDragController},
    graphics::{DebugDrawer, DrawCommand},
    input::{PointerState, TouchState},
    math as m,
    physics::PhysicsWorld,
};

/// Debug overlay for a physics world.
///
/// Each frame, call [`update`][Self::update] before stepping the world
/// and [`draw`][Self::draw] after it. The host owns the overlay
/// and passes the world in explicitly.
pub struct Overlay<W: PhysicsWorld> {
    pub camera: CameraTransform,
    pub drawer: DebugDrawer,
    pointer_drag: PointerDragController<W>,
    touch_drag: TouchDragController<W>,
}

impl<W: PhysicsWorld> Overlay<W> {
    pub fn new(camera: CameraTransform, drawer: DebugDrawer) -> Self {
        Self {
            camera,
            drawer,
            pointer_drag: PointerDragController::default(),
            touch_drag: TouchDragController::default(),
        }
    }

    /// Create an overlay whose camera centers the world origin
    /// in a viewport of the given size.
    pub fn from_config(
        config: &Config,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Self, CameraError> {
        Ok(Self {
            camera: config.camera(viewport_width, viewport_height)?,
            drawer: config.drawer(),
            pointer_drag: PointerDragController::new(config.drag),
            touch_drag: TouchDragController::new(config.drag),
        })
    }

    /// Keep the world origin centered after the viewport changes size.
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) -> Result<(), CameraError> {
        self.camera.set_screen_origin(m::Vec2::new(
            viewport_width / 2.0,
            viewport_height / 2.0,
        ))
    }

    #[inline]
    pub fn pointer_drag(&self) -> &PointerDragController<W> {
        &self.pointer_drag
    }

    #[inline]
    pub fn touch_drag(&self) -> &TouchDragController<W> {
        &self.touch_drag
    }

    /// Handle input for this frame, adding and removing drag springs as needed.
    pub fn update(&mut self, world: &mut W, pointer: &PointerState, touches: &TouchState) {
        self.pointer_drag.update(pointer, &self.camera, world);
        self.touch_drag.update(touches, &self.camera, world);
    }

    /// Let go of everything being dragged,
    /// e.g. before replacing the world with a new one.
    pub fn cancel_drags(&mut self, world: &mut W) {
        self.pointer_drag.cancel(world);
        self.touch_drag.cancel(world);
    }

    pub fn draw(&self, world: &W) -> Vec<DrawCommand> {
        self.drawer.draw(world, &self.camera)
    }
}
