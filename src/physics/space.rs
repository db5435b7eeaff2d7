//! A handle-table world of bodies, shapes and constraints.
//!
//! `Space` does not step the simulation. It holds the state a solver works on
//! and answers the queries the debug layer asks, so it can back a custom solver
//! or stand in for a real engine in tests and tools.

use thunderdome as td;

use super::{
    query, Body, BodyStatus, Constraint, EntityKind, PhysicsWorld, PointQueryHit, Shape,
    ShapeGeometry, SpringJoint, WorldError,
};
use crate::math as m;

/// Handle to a body in a [`Space`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyKey(td::Index);

/// Handle to a shape in a [`Space`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeKey(td::Index);

/// Handle to a constraint in a [`Space`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintKey(td::Index);

pub struct Space {
    bodies: td::Arena<Body>,
    shapes: td::Arena<Shape>,
    constraints: td::Arena<Constraint>,
    contact_points: Vec<m::Vec2>,
}

impl Space {
    pub fn new() -> Self {
        Self {
            bodies: td::Arena::new(),
            shapes: td::Arena::new(),
            constraints: td::Arena::new(),
            contact_points: Vec::new(),
        }
    }

    //
    // bodies
    //

    pub fn add_body(&mut self, body: Body) -> BodyKey {
        BodyKey(self.bodies.insert(body))
    }

    /// Access a body if it still exists.
    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key.0)
    }

    /// Mutably access a body if it still exists.
    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key.0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    //
    // shapes
    //

    /// Attach a shape to the body named in it.
    pub fn add_shape(&mut self, shape: Shape) -> Result<ShapeKey, WorldError> {
        if !self.bodies.contains(shape.body.0) {
            return Err(WorldError::NotFound(EntityKind::Body));
        }
        Ok(ShapeKey(self.shapes.insert(shape)))
    }

    /// Add a body along with a single shape attached to it.
    pub fn add_body_with_shape(
        &mut self,
        body: Body,
        geometry: ShapeGeometry,
    ) -> (BodyKey, ShapeKey) {
        let body = self.add_body(body);
        let shape = ShapeKey(self.shapes.insert(Shape::new(body, geometry)));
        (body, shape)
    }

    pub fn shape(&self, key: ShapeKey) -> Option<&Shape> {
        self.shapes.get(key.0)
    }

    pub fn remove_shape(&mut self, key: ShapeKey) -> Result<Shape, WorldError> {
        self.shapes
            .remove(key.0)
            .ok_or(WorldError::NotFound(EntityKind::Shape))
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    //
    // constraints
    //

    /// Add a constraint between two existing bodies.
    /// Returns a handle that can be used to remove it later.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintKey, WorldError> {
        if !constraint.bodies.iter().all(|b| self.bodies.contains(b.0)) {
            return Err(WorldError::NotFound(EntityKind::Body));
        }
        Ok(ConstraintKey(self.constraints.insert(constraint)))
    }

    /// Access a constraint if it still exists.
    pub fn constraint(&self, key: ConstraintKey) -> Option<&Constraint> {
        self.constraints.get(key.0)
    }

    /// Mutably access a constraint if it still exists.
    pub fn constraint_mut(&mut self, key: ConstraintKey) -> Option<&mut Constraint> {
        self.constraints.get_mut(key.0)
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    //
    // contacts
    //

    /// Replace the contact points reported for the current step.
    /// A solver calls this after its narrow phase every step.
    pub fn set_contact_points(&mut self, points: impl IntoIterator<Item = m::Vec2>) {
        self.contact_points.clear();
        self.contact_points.extend(points);
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld for Space {
    type BodyKey = BodyKey;
    type ShapeKey = ShapeKey;
    type ConstraintKey = ConstraintKey;

    fn shapes(&self) -> impl Iterator<Item = ShapeKey> + '_ {
        self.shapes.iter().map(|(idx, _)| ShapeKey(idx))
    }

    fn constraints(&self) -> impl Iterator<Item = ConstraintKey> + '_ {
        self.constraints.iter().map(|(idx, _)| ConstraintKey(idx))
    }

    fn contact_points(&self) -> impl Iterator<Item = m::Vec2> + '_ {
        self.contact_points.iter().copied()
    }

    fn shape_body(&self, shape: ShapeKey) -> Option<BodyKey> {
        self.shapes.get(shape.0).map(|s| s.body)
    }

    fn shape_geometry(&self, shape: ShapeKey) -> Result<ShapeGeometry, WorldError> {
        let shape = self
            .shapes
            .get(shape.0)
            .ok_or(WorldError::NotFound(EntityKind::Shape))?;
        let body = self
            .bodies
            .get(shape.body.0)
            .ok_or(WorldError::NotFound(EntityKind::Body))?;
        Ok(shape.geometry.transformed(&body.pose))
    }

    fn body_status(&self, body: BodyKey) -> Option<BodyStatus> {
        self.bodies.get(body.0).map(|b| BodyStatus {
            kind: b.kind,
            sleeping: b.sleeping,
            idle: b.idle,
        })
    }

    fn body_pose(&self, body: BodyKey) -> Option<m::Pose> {
        self.bodies.get(body.0).map(|b| b.pose)
    }

    fn constraint_anchors(&self, constraint: ConstraintKey) -> Option<[m::Vec2; 2]> {
        let c = self.constraints.get(constraint.0)?;
        if !c.ty.has_anchors() {
            return None;
        }
        let pose_0 = self.bodies.get(c.bodies[0].0)?.pose;
        let pose_1 = self.bodies.get(c.bodies[1].0)?.pose;
        Some([pose_0 * c.offsets[0], pose_1 * c.offsets[1]])
    }

    fn point_query(
        &self,
        point: m::Vec2,
        max_distance: f64,
        filter: &dyn Fn(BodyKey) -> bool,
    ) -> Option<PointQueryHit<ShapeKey>> {
        let mut nearest: Option<PointQueryHit<ShapeKey>> = None;
        for (idx, shape) in self.shapes.iter() {
            if !filter(shape.body) {
                continue;
            }
            let body = match self.bodies.get(shape.body.0) {
                Some(b) => b,
                None => continue,
            };
            let geom = shape.geometry.transformed(&body.pose);
            let dist = match query::point_shape_distance(point, &geom) {
                Some(d) => d,
                None => continue,
            };
            if dist.distance > max_distance {
                continue;
            }
            if nearest.map_or(true, |n| dist.distance < n.distance) {
                nearest = Some(PointQueryHit {
                    shape: ShapeKey(idx),
                    point: dist.point,
                    distance: dist.distance,
                });
            }
        }
        nearest
    }

    fn add_kinematic_body(&mut self, position: m::Vec2) -> BodyKey {
        self.add_body(Body::new_kinematic().with_position(position))
    }

    fn set_body_position(&mut self, body: BodyKey, position: m::Vec2) -> Result<(), WorldError> {
        let body = self
            .bodies
            .get_mut(body.0)
            .ok_or(WorldError::NotFound(EntityKind::Body))?;
        body.pose.translation = position;
        Ok(())
    }

    /// Remove a body along with its shapes and every constraint attached to it.
    fn remove_body(&mut self, body: BodyKey) -> Result<(), WorldError> {
        self.bodies
            .remove(body.0)
            .ok_or(WorldError::NotFound(EntityKind::Body))?;

        let dead_shapes: Vec<td::Index> = self
            .shapes
            .iter()
            .filter(|(_, s)| s.body == body)
            .map(|(idx, _)| idx)
            .collect();
        for idx in dead_shapes {
            self.shapes.remove(idx);
        }

        let dead_constraints: Vec<td::Index> = self
            .constraints
            .iter()
            .filter(|(_, c)| c.bodies.contains(&body))
            .map(|(idx, _)| idx)
            .collect();
        for idx in dead_constraints {
            self.constraints.remove(idx);
        }
        Ok(())
    }

    fn add_spring(&mut self, spring: SpringJoint<BodyKey>) -> Result<ConstraintKey, WorldError> {
        let key = self.add_constraint(Constraint::from(spring))?;
        // grabbing something wakes it up
        if let Some(target) = self.bodies.get_mut(spring.target.0) {
            target.sleeping = false;
            target.idle = false;
        }
        Ok(key)
    }

    fn remove_constraint(&mut self, constraint: ConstraintKey) -> Result<(), WorldError> {
        self.constraints
            .remove(constraint.0)
            .map(|_| ())
            .ok_or(WorldError::NotFound(EntityKind::Constraint))
    }
}
