use crate::math as m;

/// How a body takes part in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Moved by forces and collisions.
    Dynamic,
    /// Moved directly by the program, not by forces.
    Kinematic,
    /// Never moves.
    Static,
}

/// A rigid body stored in a [`Space`][super::Space].
///
/// This only holds what the debug layer reads and writes;
/// velocities and integration belong to whatever engine steps the space.
#[derive(Clone, Copy, Debug)]
pub struct Body {
    pub pose: m::Pose,
    pub kind: BodyKind,
    pub mass: Mass,
    pub moment_of_inertia: Mass,
    pub sleeping: bool,
    pub idle: bool,
}

impl Body {
    /// Dynamic bodies respond to forces and are allowed to rotate.
    pub fn new_dynamic(mass: f64, moment_of_inertia: f64) -> Self {
        Self {
            pose: m::Pose::identity(),
            kind: BodyKind::Dynamic,
            mass: Mass::from(mass),
            moment_of_inertia: Mass::from(moment_of_inertia),
            sleeping: false,
            idle: false,
        }
    }

    /// Kinematic bodies are not affected by forces or collisions.
    pub fn new_kinematic() -> Self {
        Self {
            kind: BodyKind::Kinematic,
            mass: Mass::Infinite,
            moment_of_inertia: Mass::Infinite,
            ..Self::new_dynamic(1.0, 1.0)
        }
    }

    /// Static bodies never move.
    pub fn new_static() -> Self {
        Self {
            kind: BodyKind::Static,
            ..Self::new_kinematic()
        }
    }

    /// Set the position of the body in a builder-like chain.
    pub fn with_position(mut self, position: m::Vec2) -> Self {
        self.pose.translation = position;
        self
    }

    /// Set the rotation of the body in a builder-like chain.
    pub fn with_rotation(mut self, angle: m::Angle) -> Self {
        self.pose.rotation = angle.into();
        self
    }

    pub fn with_sleeping(mut self, sleeping: bool) -> Self {
        self.sleeping = sleeping;
        self
    }

    pub fn with_idle(mut self, idle: bool) -> Self {
        self.idle = idle;
        self
    }

    /// Check whether the body has finite mass or moment of inertia, allowing forces to have an
    /// effect on it.
    #[inline]
    pub fn sees_forces(&self) -> bool {
        !matches!(
            (self.mass, self.moment_of_inertia),
            (Mass::Infinite, Mass::Infinite)
        )
    }
}

/// Mass or moment of inertia of a body, which can be infinite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mass {
    Finite(f64),
    Infinite,
}

impl From<f64> for Mass {
    /// Zero, negative and non-finite values are treated as infinite.
    #[inline]
    fn from(mass: f64) -> Self {
        if mass.is_finite() && mass > 0.0 {
            Mass::Finite(mass)
        } else {
            Mass::Infinite
        }
    }
}
