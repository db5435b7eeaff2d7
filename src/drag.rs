//! Grabbing and dragging bodies with a pointer.
//!
//! While dragging, a kinematic "pointer body" follows the cursor and a spring
//! between it and the grabbed body does the pulling. The physics engine's solver
//! applies the force; the controller only moves the pointer body.

use std::collections::BTreeMap;

use crate::{
    camera::CameraTransform,
    input::{PointerState, TouchId, TouchState},
    math as m,
    physics::{PhysicsWorld, SpringJoint},
};

/// Fixed parameters of the drag spring and hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct DragParams {
    pub stiffness: f64,
    pub damping: f64,
    pub max_force: f64,
    /// How far from a shape, in screen pixels, a press still grabs it.
    pub hit_radius_px: f64,
}

impl Default for DragParams {
    fn default() -> Self {
        Self {
            stiffness: 4000.0,
            damping: 100.0,
            max_force: 50000.0,
            hit_radius_px: 5.0,
        }
    }
}

/// Everything belonging to an ongoing drag.
///
/// The grabbed body and shape are only handles; they may disappear from
/// the world at any time. The pointer body and constraint are owned by the drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession<B, S, C> {
    pub shape: S,
    pub body: B,
    /// Where the body was grabbed, relative to its pose.
    pub grab_point: m::Vec2,
    pub pointer_body: B,
    pub constraint: C,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState<B, S, C> {
    Idle,
    Dragging(DragSession<B, S, C>),
}

/// The drag session type for a given world.
pub type SessionOf<W> = DragSession<
    <W as PhysicsWorld>::BodyKey,
    <W as PhysicsWorld>::ShapeKey,
    <W as PhysicsWorld>::ConstraintKey,
>;
type StateOf<W> = DragState<
    <W as PhysicsWorld>::BodyKey,
    <W as PhysicsWorld>::ShapeKey,
    <W as PhysicsWorld>::ConstraintKey,
>;

/// Lets a single pointer grab and drag dynamic bodies.
pub struct PointerDragController<W: PhysicsWorld> {
    pub params: DragParams,
    state: StateOf<W>,
}

impl<W: PhysicsWorld> std::fmt::Debug for PointerDragController<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerDragController")
            .field("params", &self.params)
            .field("state", &self.state)
            .finish()
    }
}

impl<W: PhysicsWorld> Default for PointerDragController<W> {
    fn default() -> Self {
        Self::new(DragParams::default())
    }
}

impl<W: PhysicsWorld> PointerDragController<W> {
    pub fn new(params: DragParams) -> Self {
        Self {
            params,
            state: DragState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> &StateOf<W> {
        &self.state
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&SessionOf<W>> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn grabbed_body(&self) -> Option<W::BodyKey> {
        self.session().map(|s| s.body)
    }

    /// Advance the state machine by one frame.
    ///
    /// Call this before stepping the physics world so that
    /// constraint changes take effect on the same frame.
    pub fn update(&mut self, pointer: &PointerState, camera: &CameraTransform, world: &mut W) {
        let target = camera.to_world(pointer.position());
        self.state = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle if pointer.just_pressed() => self.grab(target, camera, world),
            DragState::Idle => DragState::Idle,
            DragState::Dragging(session) if !pointer.is_pressed() => {
                log::debug!("Released body {:?}", session.body);
                end_session::<W>(session, world);
                DragState::Idle
            }
            DragState::Dragging(session) if !grab_still_exists::<W>(&session, world) => {
                log::debug!("Grabbed body {:?} or its shape left the world", session.body);
                end_session::<W>(session, world);
                DragState::Idle
            }
            DragState::Dragging(session) => {
                match world.set_body_position(session.pointer_body, target) {
                    Ok(()) => DragState::Dragging(session),
                    Err(err) => {
                        log::debug!("Lost the pointer body: {}", err);
                        end_session::<W>(session, world);
                        DragState::Idle
                    }
                }
            }
        };
    }

    /// Drop whatever is being dragged, regardless of the pointer.
    pub fn cancel(&mut self, world: &mut W) {
        if let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Idle) {
            end_session::<W>(session, world);
        }
    }

    fn grab(&self, target: m::Vec2, camera: &CameraTransform, world: &mut W) -> StateOf<W> {
        let max_distance = camera.length_to_world(self.params.hit_radius_px);
        let hit = {
            let world: &W = world;
            world.point_query(target, max_distance, &|body| {
                world.body_status(body).map_or(false, |s| s.is_draggable())
            })
        };
        let Some(hit) = hit else {
            return DragState::Idle;
        };
        let (body, pose) = match world
            .shape_body(hit.shape)
            .and_then(|b| world.body_pose(b).map(|p| (b, p)))
        {
            Some(found) => found,
            None => return DragState::Idle,
        };

        // a press just outside the shape grabs the nearest point on its surface
        let grab_world = if hit.distance > 0.0 { hit.point } else { target };
        let grab_point = pose.inversed() * grab_world;

        let pointer_body = world.add_kinematic_body(target);
        let spring = SpringJoint {
            pointer_body,
            target: body,
            target_anchor: grab_point,
            rest_length: 0.0,
            stiffness: self.params.stiffness,
            damping: self.params.damping,
            max_force: self.params.max_force,
            collide_bodies: false,
        };
        match world.add_spring(spring) {
            Ok(constraint) => {
                log::debug!("Grabbed body {:?} at {:?}", body, grab_point);
                DragState::Dragging(DragSession {
                    shape: hit.shape,
                    body,
                    grab_point,
                    pointer_body,
                    constraint,
                })
            }
            Err(err) => {
                log::warn!("Failed to attach drag spring: {}", err);
                if let Err(err) = world.remove_body(pointer_body) {
                    log::debug!("Pointer body already gone: {}", err);
                }
                DragState::Idle
            }
        }
    }
}

/// Both the grabbed body and the shape it was grabbed by must still be there,
/// with the shape attached to that body.
fn grab_still_exists<W: PhysicsWorld>(session: &SessionOf<W>, world: &W) -> bool {
    world.body_status(session.body).is_some()
        && world.shape_body(session.shape) == Some(session.body)
}

/// Remove what a drag added to the world.
/// Things that are already gone are not an error.
fn end_session<W: PhysicsWorld>(session: SessionOf<W>, world: &mut W) {
    if let Err(err) = world.remove_constraint(session.constraint) {
        log::debug!("Drag constraint already gone: {}", err);
    }
    if let Err(err) = world.remove_body(session.pointer_body) {
        log::debug!("Pointer body already gone: {}", err);
    }
}

/// Runs an independent [`PointerDragController`] for every touch on the screen.
pub struct TouchDragController<W: PhysicsWorld> {
    pub params: DragParams,
    controllers: BTreeMap<TouchId, PointerDragController<W>>,
}

impl<W: PhysicsWorld> Default for TouchDragController<W> {
    fn default() -> Self {
        Self::new(DragParams::default())
    }
}

impl<W: PhysicsWorld> TouchDragController<W> {
    pub fn new(params: DragParams) -> Self {
        Self {
            params,
            controllers: BTreeMap::new(),
        }
    }

    /// Iterate over ongoing drags, in ascending touch id order.
    pub fn sessions(&self) -> impl Iterator<Item = (TouchId, &SessionOf<W>)> + '_ {
        self.controllers
            .iter()
            .filter_map(|(id, c)| c.session().map(|s| (*id, s)))
    }

    pub fn is_dragging(&self) -> bool {
        self.controllers.values().any(|c| c.is_dragging())
    }

    pub fn update(&mut self, touches: &TouchState, camera: &CameraTransform, world: &mut W) {
        let params = self.params;
        for (id, touch) in touches.iter() {
            self.controllers
                .entry(id)
                .or_insert_with(|| PointerDragController::new(params))
                .update(touch, camera, world);
        }
        // touches can vanish without a release frame, e.g. when the host clears them
        self.controllers.retain(|id, ctrl| match touches.get(*id) {
            Some(touch) => touch.is_pressed() || ctrl.is_dragging(),
            None => {
                ctrl.cancel(world);
                false
            }
        });
    }

    /// Drop every ongoing drag.
    pub fn cancel(&mut self, world: &mut W) {
        for ctrl in self.controllers.values_mut() {
            ctrl.cancel(world);
        }
        self.controllers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Body, BodyKey, ConstraintType, ShapeGeometry, ShapeKey, Space};

    fn pointer(x: f64, y: f64, was_pressed: bool, pressed: bool) -> PointerState {
        PointerState::from_levels(m::Vec2::new(x, y), was_pressed, pressed)
    }

    /// A dynamic ball at the origin and a static floor below it.
    fn scene() -> (Space, BodyKey, ShapeKey) {
        let mut space = Space::new();
        let (ball, ball_shape) = space.add_body_with_shape(
            Body::new_dynamic(1.0, 1.0),
            ShapeGeometry::circle(10.0),
        );
        space.add_body_with_shape(
            Body::new_static(),
            ShapeGeometry::segment(
                m::Vec2::new(-100.0, -50.0),
                m::Vec2::new(100.0, -50.0),
                5.0,
            ),
        );
        (space, ball, ball_shape)
    }

    #[test]
    fn press_grabs_and_release_lets_go() {
        let (mut space, ball, ball_shape) = scene();
        let camera = CameraTransform::new();
        let mut ctrl = PointerDragController::default();

        ctrl.update(&pointer(3.0, 4.0, false, true), &camera, &mut space);
        let session = *ctrl.session().expect("should be dragging");
        assert_eq!(session.body, ball);
        assert_eq!(session.shape, ball_shape);
        assert_eq!(session.grab_point, m::Vec2::new(3.0, 4.0));
        assert_eq!(space.constraint_count(), 1);
        assert_eq!(space.body_count(), 3);

        let spring = space.constraint(session.constraint).unwrap();
        assert_eq!(spring.bodies, [session.pointer_body, ball]);
        assert!(!spring.collide_bodies);
        assert_eq!(spring.max_force, ctrl.params.max_force);
        assert_eq!(
            spring.ty,
            ConstraintType::DampedSpring {
                rest_length: 0.0,
                stiffness: ctrl.params.stiffness,
                damping: ctrl.params.damping,
            }
        );
        assert!(space.body(session.pointer_body).map(|b| !b.sees_forces()).unwrap());

        // holding still doesn't create anything new
        ctrl.update(&pointer(3.0, 4.0, true, true), &camera, &mut space);
        assert_eq!(space.constraint_count(), 1);

        ctrl.update(&pointer(3.0, 4.0, true, false), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
        assert_eq!(space.body_count(), 2);
    }

    #[test]
    fn press_on_nothing_stays_idle() {
        let (mut space, _, _) = scene();
        let camera = CameraTransform::new();
        let mut ctrl = PointerDragController::default();
        ctrl.update(&pointer(50.0, 50.0, false, true), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
        assert_eq!(space.body_count(), 2);
    }

    #[test]
    fn static_bodies_are_never_grabbed() {
        let (mut space, _, _) = scene();
        let camera = CameraTransform::new();
        let mut ctrl = PointerDragController::default();
        // right on the floor
        ctrl.update(&pointer(0.0, -50.0, false, true), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
    }

    #[test]
    fn holding_without_edge_does_not_grab() {
        let (mut space, _, _) = scene();
        let camera = CameraTransform::new();
        let mut ctrl = PointerDragController::default();
        ctrl.update(&pointer(0.0, 0.0, true, true), &camera, &mut space);
        assert!(!ctrl.is_dragging());
    }

    #[test]
    fn pointer_body_follows_the_pointer() {
        let (mut space, _, _) = scene();
        let mut camera = CameraTransform::centered(200.0, 200.0).unwrap().with_flip_y(true);
        camera.scale(2.0).unwrap();
        let mut ctrl = PointerDragController::default();

        // screen (100, 100) is the world origin
        ctrl.update(&pointer(100.0, 100.0, false, true), &camera, &mut space);
        let pointer_body = ctrl.session().unwrap().pointer_body;

        ctrl.update(&pointer(140.0, 80.0, true, true), &camera, &mut space);
        let pos = space.body(pointer_body).unwrap().pose.translation;
        assert!((pos - m::Vec2::new(20.0, 10.0)).mag() < 1e-9);
        assert_eq!(pos, camera.to_world(m::Vec2::new(140.0, 80.0)));
    }

    #[test]
    fn hit_radius_is_in_pixels() {
        let (mut space, _, _) = scene();
        let mut ctrl = PointerDragController::new(DragParams {
            hit_radius_px: 5.0,
            ..Default::default()
        });
        // 4 world units outside the ball
        let press = m::Vec2::new(14.0, 0.0);

        let mut zoomed_in = CameraTransform::new();
        zoomed_in.scale(2.0).unwrap();
        let p = zoomed_in.to_screen(press);
        ctrl.update(&pointer(p.x, p.y, false, true), &zoomed_in, &mut space);
        assert!(!ctrl.is_dragging());

        let mut zoomed_out = CameraTransform::new();
        zoomed_out.scale(0.5).unwrap();
        let p = zoomed_out.to_screen(press);
        ctrl.update(&pointer(p.x, p.y, false, true), &zoomed_out, &mut space);
        let session = *ctrl.session().expect("should grab within 10 world units");
        // grabbed at the nearest point on the surface
        assert!((session.grab_point - m::Vec2::new(10.0, 0.0)).mag() < 1e-9);
    }

    #[test]
    fn nearest_overlapping_shape_wins() {
        let mut space = Space::new();
        space.add_body_with_shape(Body::new_dynamic(1.0, 1.0), ShapeGeometry::circle(10.0));
        let (near, _) = space.add_body_with_shape(
            Body::new_dynamic(1.0, 1.0).with_position(m::Vec2::new(8.0, 0.0)),
            ShapeGeometry::circle(10.0),
        );
        let mut ctrl = PointerDragController::default();
        ctrl.update(
            &pointer(7.0, 0.0, false, true),
            &CameraTransform::new(),
            &mut space,
        );
        assert_eq!(ctrl.grabbed_body(), Some(near));
    }

    #[test]
    fn grab_point_is_in_body_frame() {
        let mut space = Space::new();
        let (body, _) = space.add_body_with_shape(
            Body::new_dynamic(1.0, 1.0)
                .with_position(m::Vec2::new(10.0, 0.0))
                .with_rotation(m::Angle::Deg(90.0)),
            ShapeGeometry::rect(4.0, 4.0),
        );
        let mut ctrl = PointerDragController::default();
        ctrl.update(
            &pointer(11.0, 1.5, false, true),
            &CameraTransform::new(),
            &mut space,
        );
        let session = *ctrl.session().unwrap();
        let pose = space.body(body).unwrap().pose;
        assert!((pose * session.grab_point - m::Vec2::new(11.0, 1.5)).mag() < 1e-9);
        assert!((session.grab_point.mag() - 1.5_f64.hypot(1.0)).abs() < 1e-9);

        let spring = space.constraint(session.constraint).unwrap();
        assert_eq!(spring.offsets[1], session.grab_point);
    }

    #[test]
    fn body_removed_mid_drag() {
        let (mut space, ball, _) = scene();
        let camera = CameraTransform::new();
        let mut ctrl = PointerDragController::default();
        ctrl.update(&pointer(0.0, 0.0, false, true), &camera, &mut space);
        assert!(ctrl.is_dragging());

        // game logic deletes the ball, which also takes the spring with it
        space.remove_body(ball).unwrap();
        ctrl.update(&pointer(5.0, 0.0, true, true), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
        assert_eq!(space.body_count(), 1);

        // the release that follows is a no-op
        ctrl.update(&pointer(5.0, 0.0, true, false), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.body_count(), 1);
    }

    #[test]
    fn shape_removed_mid_drag() {
        let (mut space, ball, ball_shape) = scene();
        let camera = CameraTransform::new();
        let mut ctrl = PointerDragController::default();
        ctrl.update(&pointer(0.0, 0.0, false, true), &camera, &mut space);
        assert!(ctrl.is_dragging());

        // the body stays but loses the shape it was grabbed by
        space.remove_shape(ball_shape).unwrap();
        ctrl.update(&pointer(5.0, 0.0, true, true), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
        assert_eq!(space.body_count(), 2);
        assert!(space.body(ball).is_some());
    }

    #[test]
    fn release_right_after_removal() {
        let (mut space, ball, _) = scene();
        let camera = CameraTransform::new();
        let mut ctrl = PointerDragController::default();
        ctrl.update(&pointer(0.0, 0.0, false, true), &camera, &mut space);
        space.remove_body(ball).unwrap();
        ctrl.update(&pointer(0.0, 0.0, true, false), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
        assert_eq!(space.body_count(), 1);
    }

    #[test]
    fn cancel_cleans_up() {
        let (mut space, _, _) = scene();
        let mut ctrl = PointerDragController::default();
        ctrl.update(
            &pointer(0.0, 0.0, false, true),
            &CameraTransform::new(),
            &mut space,
        );
        ctrl.cancel(&mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
        assert_eq!(space.body_count(), 2);
    }

    #[test]
    fn touches_drag_independently() {
        let mut space = Space::new();
        let (left, _) = space.add_body_with_shape(
            Body::new_dynamic(1.0, 1.0).with_position(m::Vec2::new(-50.0, 0.0)),
            ShapeGeometry::circle(10.0),
        );
        let (right, _) = space.add_body_with_shape(
            Body::new_dynamic(1.0, 1.0).with_position(m::Vec2::new(50.0, 0.0)),
            ShapeGeometry::circle(10.0),
        );
        let camera = CameraTransform::new();
        let mut touches = TouchState::new();
        let mut ctrl = TouchDragController::default();

        touches.track_touch_down(7, m::Vec2::new(-50.0, 0.0));
        touches.track_touch_down(2, m::Vec2::new(50.0, 0.0));
        ctrl.update(&touches, &camera, &mut space);
        touches.tick();
        let grabbed: Vec<(TouchId, BodyKey)> =
            ctrl.sessions().map(|(id, s)| (id, s.body)).collect();
        assert_eq!(grabbed, vec![(2, right), (7, left)]);
        assert_eq!(space.constraint_count(), 2);

        touches.track_touch_up(2, m::Vec2::new(50.0, 0.0));
        ctrl.update(&touches, &camera, &mut space);
        touches.tick();
        assert_eq!(space.constraint_count(), 1);
        let grabbed: Vec<BodyKey> = ctrl.sessions().map(|(_, s)| s.body).collect();
        assert_eq!(grabbed, vec![left]);

        // the host dropping all touches at once still cleans up
        ctrl.update(&TouchState::new(), &camera, &mut space);
        assert!(!ctrl.is_dragging());
        assert_eq!(space.constraint_count(), 0);
        assert_eq!(space.body_count(), 2);
    }
}
