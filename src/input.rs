//! Pointer input state with press and release edge detection.
//!
//! The host feeds raw input into these once per frame (either directly or through
//! [`track_window_event`][PointerState::track_window_event] with the `winit` feature),
//! lets the drag controllers read them, and calls `tick` at the end of the frame.

use std::collections::BTreeMap;

use crate::math as m;

/// State of a single pointer: its screen position and whether it is pressed
/// now and was pressed on the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    position: m::Vec2,
    pressed: bool,
    was_pressed: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state directly from polled levels, for hosts that
    /// keep track of the previous frame themselves.
    pub fn from_levels(position: m::Vec2, was_pressed: bool, pressed: bool) -> Self {
        Self {
            position,
            pressed,
            was_pressed,
        }
    }

    /// Position in screen pixels.
    #[inline]
    pub fn position(&self) -> m::Vec2 {
        self.position
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// True on the frame the pointer went down.
    #[inline]
    pub fn just_pressed(&self) -> bool {
        self.pressed && !self.was_pressed
    }

    /// True on the frame the pointer went up.
    #[inline]
    pub fn just_released(&self) -> bool {
        !self.pressed && self.was_pressed
    }

    pub fn set_position(&mut self, position: m::Vec2) {
        self.position = position;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Do end-of-frame maintenance. Call this after everything has read the state.
    pub fn tick(&mut self) {
        self.was_pressed = self.pressed;
    }
}

/// Identifier of a touch, as given by the windowing system.
pub type TouchId = u64;

/// Tracks every touch currently on the screen as its own [`PointerState`].
///
/// A touch that ends stays around in released state until the next `tick`
/// so that its release edge can be seen.
#[derive(Clone, Debug, Default)]
pub struct TouchState {
    touches: BTreeMap<TouchId, PointerState>,
}

impl TouchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A touch started or moved.
    pub fn track_touch_down(&mut self, id: TouchId, position: m::Vec2) {
        let touch = self.touches.entry(id).or_default();
        touch.set_position(position);
        touch.set_pressed(true);
    }

    /// A touch ended or was cancelled.
    pub fn track_touch_up(&mut self, id: TouchId, position: m::Vec2) {
        if let Some(touch) = self.touches.get_mut(&id) {
            touch.set_position(position);
            touch.set_pressed(false);
        }
    }

    pub fn get(&self, id: TouchId) -> Option<&PointerState> {
        self.touches.get(&id)
    }

    /// Iterate over touches in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TouchId, &PointerState)> + '_ {
        self.touches.iter().map(|(id, t)| (*id, t))
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// Do end-of-frame maintenance, dropping touches that have ended.
    pub fn tick(&mut self) {
        self.touches.retain(|_, t| t.is_pressed());
        for touch in self.touches.values_mut() {
            touch.tick();
        }
    }
}

#[cfg(feature = "winit")]
mod winit_tracking {
    use super::*;
    use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

    impl PointerState {
        /// Track the left mouse button and cursor position from a window event.
        pub fn track_window_event(&mut self, event: &WindowEvent) {
            match event {
                WindowEvent::CursorMoved { position, .. } => {
                    self.set_position(m::Vec2::new(position.x, position.y));
                }
                WindowEvent::MouseInput {
                    button: MouseButton::Left,
                    state,
                    ..
                } => self.set_pressed(*state == ElementState::Pressed),
                // losing the cursor mid-drag counts as letting go
                WindowEvent::CursorLeft { .. } => self.set_pressed(false),
                _ => (),
            }
        }
    }

    impl TouchState {
        /// Track touch events from a window event.
        pub fn track_window_event(&mut self, event: &WindowEvent) {
            if let WindowEvent::Touch(Touch {
                id, phase, location, ..
            }) = event
            {
                let position = m::Vec2::new(location.x, location.y);
                match phase {
                    TouchPhase::Started | TouchPhase::Moved => {
                        self.track_touch_down(*id, position)
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.track_touch_up(*id, position)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_last_one_frame() {
        let mut p = PointerState::new();
        assert!(!p.just_pressed() && !p.just_released());

        p.set_pressed(true);
        assert!(p.just_pressed());
        p.tick();
        assert!(p.is_pressed() && !p.just_pressed());

        p.set_pressed(false);
        assert!(p.just_released());
        p.tick();
        assert!(!p.just_released());
    }

    #[test]
    fn from_levels_edges() {
        let pos = m::Vec2::new(1.0, 2.0);
        assert!(PointerState::from_levels(pos, false, true).just_pressed());
        assert!(PointerState::from_levels(pos, true, false).just_released());
        assert!(!PointerState::from_levels(pos, true, true).just_pressed());
    }

    #[test]
    fn ended_touch_survives_one_tick() {
        let mut touches = TouchState::new();
        touches.track_touch_down(3, m::Vec2::new(1.0, 1.0));
        touches.track_touch_down(1, m::Vec2::new(2.0, 2.0));
        let ids: Vec<TouchId> = touches.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3]);
        touches.tick();

        touches.track_touch_up(3, m::Vec2::new(5.0, 5.0));
        let ended = touches.get(3).unwrap();
        assert!(ended.just_released());
        assert_eq!(ended.position(), m::Vec2::new(5.0, 5.0));

        touches.tick();
        assert!(touches.get(3).is_none());
        assert!(touches.get(1).is_some());

        // ending an unknown touch is ignored
        touches.track_touch_up(99, m::Vec2::zero());
        assert!(touches.get(99).is_none());
    }
}
