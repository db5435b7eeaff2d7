//! The interface between this crate and a physics engine,
//! plus [`Space`], a small engine-agnostic implementation of it.

use std::fmt::Debug;

use crate::math as m;

pub mod body;
pub use body::{Body, BodyKind, Mass};

pub mod shape;
pub use shape::{Shape, ShapeGeometry};

pub mod query;

pub mod constraint;
pub use constraint::{Constraint, ConstraintBuilder, ConstraintType, SpringJoint};

pub mod space;
pub use space::{BodyKey, ConstraintKey, ShapeKey, Space};

/// Errors reported by a [`PhysicsWorld`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The handle doesn't refer to anything in the world (anymore).
    /// Happens routinely when game logic removes things during a drag.
    #[error("No {0} with the given handle exists")]
    NotFound(EntityKind),
    /// The engine has a shape that can't be expressed as a circle, segment or polygon.
    #[error("Unrecognized shape variant: {kind}")]
    UnrecognizedVariant { kind: &'static str },
}

/// What kind of thing a [`WorldError::NotFound`] was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Body,
    Shape,
    Constraint,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntityKind::Body => "body",
            EntityKind::Shape => "shape",
            EntityKind::Constraint => "constraint",
        })
    }
}

/// Everything the drawer needs to know about a body to pick a color for its shapes,
/// and everything the drag controller needs to know to decide if it can be grabbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyStatus {
    pub kind: BodyKind,
    /// Asleep according to the engine's sleeping system.
    pub sleeping: bool,
    /// Hasn't moved for long enough to be a candidate for sleep.
    pub idle: bool,
}

impl BodyStatus {
    /// Only dynamic bodies can be picked up with the pointer.
    #[inline]
    pub fn is_draggable(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }
}

/// Result of a nearest-shape point query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointQueryHit<S> {
    pub shape: S,
    /// Closest point on the shape's surface.
    pub point: m::Vec2,
    /// Distance to the surface, negative if the query point is inside.
    pub distance: f64,
}

/// The operations this crate needs from a physics engine.
///
/// Keys are handles that must stay valid to look up (and fail the lookup
/// gracefully) after the thing they refer to is removed.
/// Iteration order must be deterministic within a frame.
pub trait PhysicsWorld {
    type BodyKey: Copy + Eq + Debug;
    type ShapeKey: Copy + Eq + Debug;
    type ConstraintKey: Copy + Eq + Debug;

    //
    // snapshot iteration
    //

    fn shapes(&self) -> impl Iterator<Item = Self::ShapeKey> + '_;
    fn constraints(&self) -> impl Iterator<Item = Self::ConstraintKey> + '_;
    /// Points where shapes touched during the last step.
    fn contact_points(&self) -> impl Iterator<Item = m::Vec2> + '_;

    //
    // introspection
    //

    fn shape_body(&self, shape: Self::ShapeKey) -> Option<Self::BodyKey>;
    /// World-space geometry of a shape.
    fn shape_geometry(&self, shape: Self::ShapeKey) -> Result<ShapeGeometry, WorldError>;
    fn body_status(&self, body: Self::BodyKey) -> Option<BodyStatus>;
    fn body_pose(&self, body: Self::BodyKey) -> Option<m::Pose>;
    /// World-space anchor points of a constraint,
    /// or None if the constraint has nothing to draw (e.g. it's purely rotational).
    fn constraint_anchors(&self, constraint: Self::ConstraintKey) -> Option<[m::Vec2; 2]>;

    //
    // queries
    //

    /// Find the shape nearest to `point` within `max_distance`,
    /// considering only shapes whose body passes `filter`.
    fn point_query(
        &self,
        point: m::Vec2,
        max_distance: f64,
        filter: &dyn Fn(Self::BodyKey) -> bool,
    ) -> Option<PointQueryHit<Self::ShapeKey>>;

    //
    // lifecycle
    //

    /// Add a body with no mass, no shapes and no collision response,
    /// moved only by setting its position.
    fn add_kinematic_body(&mut self, position: m::Vec2) -> Self::BodyKey;
    fn set_body_position(&mut self, body: Self::BodyKey, position: m::Vec2)
        -> Result<(), WorldError>;
    fn remove_body(&mut self, body: Self::BodyKey) -> Result<(), WorldError>;

    fn add_spring(
        &mut self,
        spring: SpringJoint<Self::BodyKey>,
    ) -> Result<Self::ConstraintKey, WorldError>;
    fn remove_constraint(&mut self, constraint: Self::ConstraintKey) -> Result<(), WorldError>;
}
