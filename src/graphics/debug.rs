//! Debug visualization of physics worlds.
//!
//! The drawer doesn't rasterize anything itself. It produces a list of
//! [`DrawCommand`]s in screen space that any 2D renderer can consume.

use super::{Color, Theme};
use crate::{
    camera::CameraTransform,
    math as m,
    physics::{BodyKind, BodyStatus, PhysicsWorld, ShapeGeometry, WorldError},
};

/// A single screen-space primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: m::Vec2,
        radius: f64,
        fill: Option<Color>,
        outline: Option<Color>,
    },
    /// A line with round caps, i.e. a capsule.
    Line {
        from: m::Vec2,
        to: m::Vec2,
        width: f64,
        color: Color,
    },
    Polygon {
        points: Vec<m::Vec2>,
        fill: Option<Color>,
        outline: Option<Color>,
    },
}

/// Which parts of the world to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct DrawFlags {
    pub shapes: bool,
    pub constraints: bool,
    pub collision_points: bool,
    /// Stroke filled circles and polygons with the theme's outline color.
    pub outlines: bool,
    /// Draw a line from the center of each circle showing its body's rotation.
    pub circle_orientation: bool,
}

impl Default for DrawFlags {
    fn default() -> Self {
        Self {
            shapes: true,
            constraints: true,
            collision_points: true,
            outlines: false,
            circle_orientation: false,
        }
    }
}

/// Draws the shapes, constraints and contact points of a physics world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugDrawer {
    pub theme: Theme,
    pub flags: DrawFlags,
    /// Width of constraint lines in pixels.
    pub constraint_width: f64,
    /// Radius of contact point markers in pixels.
    pub collision_point_radius: f64,
}

impl Default for DebugDrawer {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            flags: DrawFlags::default(),
            constraint_width: 1.0,
            collision_point_radius: 2.0,
        }
    }
}

impl DebugDrawer {
    pub fn new(theme: Theme, flags: DrawFlags) -> Self {
        Self {
            theme,
            flags,
            ..Default::default()
        }
    }

    /// Produce draw commands for the current state of the world.
    pub fn draw<W: PhysicsWorld>(&self, world: &W, camera: &CameraTransform) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        self.draw_into(world, camera, &mut out);
        out
    }

    /// Append draw commands to an existing buffer.
    ///
    /// Shapes come first in the world's iteration order, then constraints,
    /// then contact points.
    pub fn draw_into<W: PhysicsWorld>(
        &self,
        world: &W,
        camera: &CameraTransform,
        out: &mut Vec<DrawCommand>,
    ) {
        if self.flags.shapes {
            for shape in world.shapes() {
                self.draw_shape(world, shape, camera, out);
            }
        }
        if self.flags.constraints {
            for constraint in world.constraints() {
                let [a, b] = match world.constraint_anchors(constraint) {
                    Some(anchors) => anchors,
                    None => continue,
                };
                if (b - a).mag_sq() <= f64::EPSILON {
                    continue;
                }
                out.push(DrawCommand::Line {
                    from: camera.to_screen(a),
                    to: camera.to_screen(b),
                    width: self.constraint_width,
                    color: self.theme.constraint,
                });
            }
        }
        if self.flags.collision_points {
            out.extend(world.contact_points().map(|p| DrawCommand::Circle {
                center: camera.to_screen(p),
                radius: self.collision_point_radius,
                fill: Some(self.theme.collision_point),
                outline: None,
            }));
        }
    }

    fn draw_shape<W: PhysicsWorld>(
        &self,
        world: &W,
        shape: W::ShapeKey,
        camera: &CameraTransform,
        out: &mut Vec<DrawCommand>,
    ) {
        let geom = match world.shape_geometry(shape) {
            Ok(geom) => geom,
            Err(err @ WorldError::UnrecognizedVariant { .. }) => {
                if cfg!(debug_assertions) {
                    panic!("Can't draw shape {:?}: {}", shape, err);
                }
                log::error!("Skipping shape {:?}: {}", shape, err);
                return;
            }
            // removed during iteration, nothing to draw
            Err(WorldError::NotFound(_)) => return,
        };
        let body = world.shape_body(shape);
        let fill = self.shape_color(body.and_then(|b| world.body_status(b)));
        let outline = self.flags.outlines.then_some(self.theme.outline);

        match geom {
            ShapeGeometry::Circle { center, radius } => {
                let screen_center = camera.to_screen(center);
                out.push(DrawCommand::Circle {
                    center: screen_center,
                    radius: camera.length_to_screen(radius),
                    fill: Some(fill),
                    outline,
                });
                if self.flags.circle_orientation {
                    if let Some(pose) = body.and_then(|b| world.body_pose(b)) {
                        let dir = pose.rotation * m::Vec2::unit_x();
                        out.push(DrawCommand::Line {
                            from: screen_center,
                            to: camera.to_screen(center + dir * radius),
                            width: self.constraint_width,
                            color: self.theme.outline,
                        });
                    }
                }
            }
            ShapeGeometry::Segment { a, b, radius } => {
                out.push(DrawCommand::Line {
                    from: camera.to_screen(a),
                    to: camera.to_screen(b),
                    width: camera.length_to_screen(2.0 * radius),
                    color: fill,
                });
            }
            // rounded corners are not drawn
            ShapeGeometry::Polygon { vertices, .. } => {
                out.push(DrawCommand::Polygon {
                    points: vertices.into_iter().map(|v| camera.to_screen(v)).collect(),
                    fill: Some(fill),
                    outline,
                });
            }
        }
    }

    /// Pick the fill color for a shape based on the state of its body.
    pub fn shape_color(&self, status: Option<BodyStatus>) -> Color {
        match status {
            Some(BodyStatus { sleeping: true, .. }) => self.theme.shape_sleeping,
            Some(BodyStatus {
                kind: BodyKind::Static,
                ..
            })
            | Some(BodyStatus { idle: true, .. }) => self.theme.shape_idle,
            _ => self.theme.shape,
        }
    }
}
