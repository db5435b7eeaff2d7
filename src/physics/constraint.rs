//! Types of physical constraints.

use super::space::BodyKey;
use crate::math as m;

/// A constraint restricts the relative motion of two bodies.
///
/// [`ConstraintBuilder`][self::ConstraintBuilder] is the preferred
/// way to create these, but the fields are public to allow in-place editing
/// for advanced users.
#[derive(Clone, Copy, Debug)]
pub struct Constraint {
    /// The two participating bodies.
    pub bodies: [BodyKey; 2],
    /// Attachment points relative to each body's pose.
    pub offsets: [m::Vec2; 2],
    /// Largest force the solver may use to enforce the constraint.
    pub max_force: f64,
    /// Whether the two bodies still collide with each other.
    pub collide_bodies: bool,
    /// Type of the constraint.
    pub ty: ConstraintType,
}

/// Type-specific variables for constraints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstraintType {
    /// A spring pulling the attachment points towards a rest length.
    DampedSpring {
        rest_length: f64,
        stiffness: f64,
        damping: f64,
    },
    /// Keeps the attachment points at a fixed distance.
    Pin { distance: f64 },
    /// Keeps the attachment points within a range of distances.
    Slide { min: f64, max: f64 },
    /// Forces the attachment points to overlap.
    Pivot,
    /// Limits the relative angle of the bodies. Has no attachment points.
    RotaryLimit { min: f64, max: f64 },
}

impl ConstraintType {
    /// Whether the constraint acts between two points
    /// (as opposed to only on the bodies' rotation).
    pub fn has_anchors(&self) -> bool {
        !matches!(self, ConstraintType::RotaryLimit { .. })
    }
}

/// Description of the spring a drag controller attaches between the pointer
/// body and the grabbed body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringJoint<B> {
    /// The kinematic body following the pointer. Anchored at its origin.
    pub pointer_body: B,
    /// The body being dragged.
    pub target: B,
    /// Attachment point on the target, relative to its pose.
    pub target_anchor: m::Vec2,
    pub rest_length: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub max_force: f64,
    pub collide_bodies: bool,
}

/// A builder that allows ergonomic construction of different constraints.
#[derive(Clone, Copy, Debug)]
pub struct ConstraintBuilder {
    bodies: [BodyKey; 2],
    offsets: [m::Vec2; 2],
    max_force: f64,
    collide_bodies: bool,
}

impl ConstraintBuilder {
    /// Start building a constraint between two bodies.
    pub fn new(owner: BodyKey, target: BodyKey) -> Self {
        Self {
            bodies: [owner, target],
            offsets: [m::Vec2::zero(); 2],
            max_force: f64::INFINITY,
            collide_bodies: true,
        }
    }

    /// Set the origin point of the constraint on the owning body
    /// relative to its pose.
    ///
    /// This has no effect on angular-only constraints.
    pub fn with_origin(mut self, point: m::Vec2) -> Self {
        self.offsets[0] = point;
        self
    }

    /// Set the origin point of the constraint on the target body
    /// relative to its pose.
    ///
    /// This has no effect on angular-only constraints.
    pub fn with_target_origin(mut self, point: m::Vec2) -> Self {
        self.offsets[1] = point;
        self
    }

    /// Limit the force used to enforce the constraint.
    /// A constraint with limited force behaves like a soft attachment.
    pub fn with_max_force(mut self, max_force: f64) -> Self {
        self.max_force = max_force;
        self
    }

    /// Set whether the connected bodies can collide with each other.
    pub fn with_collide_bodies(mut self, collide: bool) -> Self {
        self.collide_bodies = collide;
        self
    }

    pub fn build_damped_spring(self, rest_length: f64, stiffness: f64, damping: f64) -> Constraint {
        self.build(ConstraintType::DampedSpring {
            rest_length,
            stiffness,
            damping,
        })
    }

    pub fn build_pin(self, distance: f64) -> Constraint {
        self.build(ConstraintType::Pin { distance })
    }

    pub fn build_slide(self, min: f64, max: f64) -> Constraint {
        self.build(ConstraintType::Slide { min, max })
    }

    pub fn build_pivot(self) -> Constraint {
        self.build(ConstraintType::Pivot)
    }

    pub fn build_rotary_limit(self, min: f64, max: f64) -> Constraint {
        self.build(ConstraintType::RotaryLimit { min, max })
    }

    fn build(self, ty: ConstraintType) -> Constraint {
        Constraint {
            bodies: self.bodies,
            offsets: self.offsets,
            max_force: self.max_force,
            collide_bodies: self.collide_bodies,
            ty,
        }
    }
}

impl From<SpringJoint<BodyKey>> for Constraint {
    fn from(spring: SpringJoint<BodyKey>) -> Self {
        ConstraintBuilder::new(spring.pointer_body, spring.target)
            .with_target_origin(spring.target_anchor)
            .with_max_force(spring.max_force)
            .with_collide_bodies(spring.collide_bodies)
            .build_damped_spring(spring.rest_length, spring.stiffness, spring.damping)
    }
}
