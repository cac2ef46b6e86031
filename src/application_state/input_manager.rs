//! # Input Manager
//!
//! Collects window events between loop iterations and turns them into a
//! [`ProcessedInputState`] snapshot:
//! - pressed/held/released transitions for tracked keys and mouse buttons
//! - cursor movement summed from `CursorMoved` positions
//! - wheel events counted by direction

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 2] = [KeyCode::KeyR, KeyCode::Escape];

const MOUSE_BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Manages the state of all input devices and processes input events.
#[derive(Debug, Clone)]
pub struct InputManager {
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Every tracked key and button starts released.
    pub fn new() -> Self {
        let keyboard_inputs_new: HashMap<KeyCode, bool> =
            KEY_CODES.iter().map(|key| (*key, false)).collect();
        let mouse_button_inputs_new: HashMap<MouseButton, bool> =
            MOUSE_BUTTONS.iter().map(|button| (*button, false)).collect();

        Self {
            keyboard_inputs_old: keyboard_inputs_new.clone(),
            keyboard_inputs_new,
            mouse_inputs: MouseInput {
                mouse_button_inputs_old: mouse_button_inputs_new.clone(),
                mouse_button_inputs_new,
                ..Default::default()
            },
        }
    }

    /// Updates the old state with the current state to prepare for the next frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => {
                if let Some(key_state) = self.keyboard_inputs_new.get_mut(key) {
                    *key_state = *state == ElementState::Pressed;
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y as f64,
                    MouseScrollDelta::PixelDelta(position) => position.y,
                };
                self.intake_wheel(y);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(button) {
                    *button_state = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.intake_cursor_position((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_inputs.cursor_position = None;
            }
            _ => {}
        }
    }

    /// Records a cursor position; movement is measured from the previous one.
    pub fn intake_cursor_position(&mut self, position: (f64, f64)) {
        if let Some((last_x, last_y)) = self.mouse_inputs.cursor_position {
            let (dx, dy) = self.mouse_inputs.cursor_delta.unwrap_or((0.0, 0.0));
            self.mouse_inputs.cursor_delta = Some((dx + position.0 - last_x, dy + position.1 - last_y));
        }
        self.mouse_inputs.cursor_position = Some(position);
    }

    /// Counts one wheel event in the direction of `delta_y`.
    pub fn intake_wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.mouse_inputs.wheel_notches += 1;
        } else if delta_y < 0.0 {
            self.mouse_inputs.wheel_notches -= 1;
        }
    }

    /// Creates a processed input state from the current raw boolean states.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            cursor_delta: self.mouse_inputs.cursor_delta,
            wheel_notches: self.mouse_inputs.wheel_notches,
        }
    }

    /// Returns the processed input state and resets internal state.
    ///
    /// `None` when nothing happened since the last call.
    pub fn get_and_reset_processed_input(&mut self) -> Option<ProcessedInputState> {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        (!processed_input.is_idle()).then_some(processed_input)
    }

    /// Rolls transitions over and drops accumulated motion.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();
        self.mouse_inputs.cursor_delta = None;
        self.mouse_inputs.wheel_notches = 0;
    }

    /// Releases everything, used when the window loses focus.
    pub fn release_all(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|s| *s = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|s| *s = false);
        self.reset_inputs();
    }
}
