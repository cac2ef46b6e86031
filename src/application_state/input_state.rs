//! # Input State
//!
//! Snapshot types handed from the input manager to the engine once per loop iteration.

use std::collections::HashMap;
use winit::{event::MouseButton, keyboard::KeyCode};

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// Input gathered since the previous snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProcessedInputState {
    pub keyboard_states: HashMap<KeyCode, RawInputState>,
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,
    /// Cursor movement in physical pixels, `None` if the cursor did not move
    pub cursor_delta: Option<(f64, f64)>,
    /// Signed count of wheel events; positive when the wheel was pushed away
    pub wheel_notches: i32,
}

impl ProcessedInputState {
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states.get(&button).copied().unwrap_or_default()
    }

    /// Whether nothing happened since the previous snapshot.
    pub fn is_idle(&self) -> bool {
        self.cursor_delta.is_none()
            && self.wheel_notches == 0
            && self.keyboard_states.values().all(|s| *s == RawInputState::NotPressed)
            && self
                .mouse_button_states
                .values()
                .all(|s| *s == RawInputState::NotPressed)
    }
}

/// Tracks the state of mouse inputs including buttons, wheel and cursor movement.
#[derive(Debug, Clone, Default)]
pub struct MouseInput {
    pub mouse_button_inputs_old: HashMap<MouseButton, bool>,
    pub mouse_button_inputs_new: HashMap<MouseButton, bool>,
    /// Last known cursor position in physical pixels
    pub cursor_position: Option<(f64, f64)>,
    /// Cursor movement accumulated since the last snapshot
    pub cursor_delta: Option<(f64, f64)>,
    pub wheel_notches: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_from_raw_states() {
        assert_eq!(RawInputState::from_raw_states(false, true), RawInputState::Pressed);
        assert_eq!(RawInputState::from_raw_states(true, true), RawInputState::Held);
        assert_eq!(RawInputState::from_raw_states(true, false), RawInputState::Released);
        assert_eq!(RawInputState::from_raw_states(false, false), RawInputState::NotPressed);
        assert!(RawInputState::Held.is_active());
        assert!(!RawInputState::Held.is_just_pressed());
        assert!(!RawInputState::Released.is_active());
    }

    #[test]
    fn test_untracked_inputs_read_as_not_pressed() {
        let state = ProcessedInputState::default();
        assert_eq!(state.get_key_state(KeyCode::KeyQ), RawInputState::NotPressed);
        assert_eq!(
            state.get_mouse_button_state(MouseButton::Back),
            RawInputState::NotPressed
        );
        assert!(state.is_idle());
    }
}
