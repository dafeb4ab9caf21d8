use glam::Vec2;
use std::collections::HashSet;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};
use crate::camera::InputSample;

/// How the mouse reports movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseMode {
    /// Cursor moves freely, no deltas are collected
    #[default]
    Absolute,
    /// Cursor is captured and raw motion accumulates as a delta
    Relative,
}

/// Adapter that bridges Winit events to the Controller trait
///
/// Events are folded into a held-key snapshot; the game loop reads one
/// [`InputSample`] per frame and then calls [`WinitController::end_frame`].
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Physical keys currently held
    pressed_keys: HashSet<KeyCode>,
    /// Left mouse button held
    look_held: bool,
    /// Logical buttons derived from the held keys
    pressed_vec: Vec<Button>,
    mouse_mode: MouseMode,
    /// Raw mouse motion since the last end_frame
    mouse_delta: Vec2,
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(keycode),
                        ElementState::Released => self.release_key(keycode),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_mouse_button(*button, *state);
            }
            WindowEvent::Focused(false) => self.clear(),
            _ => {}
        }
    }

    /// Raw device motion only counts while the mouse is captured
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.add_mouse_delta(delta.0 as f32, delta.1 as f32);
        }
    }

    pub fn press_key(&mut self, keycode: KeyCode) {
        if Self::keycode_to_button(keycode).is_some() && self.pressed_keys.insert(keycode) {
            self.refresh_buttons();
        }
    }

    pub fn release_key(&mut self, keycode: KeyCode) {
        if self.pressed_keys.remove(&keycode) {
            self.refresh_buttons();
        }
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.look_held = state.is_pressed();
            self.refresh_buttons();
        }
    }

    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        if self.mouse_mode == MouseMode::Relative {
            self.mouse_delta += Vec2::new(dx, dy);
        }
    }

    /// Snapshot for this frame. Look mode is whatever mode the previous
    /// end_frame settled on.
    pub fn sample(&self) -> InputSample {
        let look_mode_active = self.mouse_mode == MouseMode::Relative;
        let mouse_delta = if look_mode_active {
            self.mouse_delta
        } else {
            Vec2::ZERO
        };

        InputSample::from_controller(self, mouse_delta, look_mode_active)
    }

    /// Reset per-frame state and pick the mouse mode for the next frame.
    /// Returns the new mode when it changed so the caller can grab or
    /// release the cursor.
    pub fn end_frame(&mut self) -> Option<MouseMode> {
        self.mouse_delta = Vec2::ZERO;

        let wanted = if self.look_held {
            MouseMode::Relative
        } else {
            MouseMode::Absolute
        };

        if wanted == self.mouse_mode {
            None
        } else {
            self.mouse_mode = wanted;
            Some(wanted)
        }
    }

    pub fn mouse_mode(&self) -> MouseMode {
        self.mouse_mode
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Drop every held key, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
        self.look_held = false;
        self.mouse_delta = Vec2::ZERO;
        self.pressed_vec.clear();
    }

    fn refresh_buttons(&mut self) {
        let mut buttons: Vec<Button> = self
            .pressed_keys
            .iter()
            .filter_map(|&key| Self::keycode_to_button(key))
            .collect();
        if self.look_held {
            buttons.push(Button::Look);
        }
        buttons.sort_by_key(|b| Button::ALL.iter().position(|a| a == b));
        buttons.dedup();
        self.pressed_vec = buttons;
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Button::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Button::Back),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Button::StrafeLeft),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Button::StrafeRight),
            KeyCode::Space | KeyCode::PageUp => Some(Button::Up),
            KeyCode::KeyX | KeyCode::PageDown => Some(Button::Down),
            KeyCode::Home => Some(Button::Reset),
            KeyCode::Escape => Some(Button::Quit),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_vec.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    // KeyEvent can't be built outside winit, so tests drive the
    // press/release helpers that process_event forwards to.

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(controller.get_down_keys().is_empty());
        assert_eq!(controller.mouse_mode(), MouseMode::Absolute);
        assert_eq!(controller.mouse_delta(), Vec2::ZERO);
        assert_eq!(controller.sample(), InputSample::default());
    }

    #[test]
    fn test_aliases_share_a_button() {
        let mut controller = WinitController::new();
        controller.press_key(KeyCode::KeyW);
        controller.press_key(KeyCode::ArrowUp);
        assert_eq!(controller.get_down_keys(), &[Button::Forward]);

        // Releasing one alias keeps the button held
        controller.release_key(KeyCode::KeyW);
        assert!(controller.is_down(Button::Forward));

        controller.release_key(KeyCode::ArrowUp);
        assert!(!controller.is_down(Button::Forward));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        let mut controller = WinitController::new();
        controller.press_key(KeyCode::KeyQ);
        assert!(controller.get_down_keys().is_empty());
    }

    #[test]
    fn test_sample_movement_axes() {
        let mut controller = WinitController::new();
        controller.press_key(KeyCode::KeyW);
        controller.press_key(KeyCode::KeyA);
        controller.press_key(KeyCode::PageDown);

        assert_eq!(controller.sample().movement, Vec3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut controller = WinitController::new();
        controller.press_key(KeyCode::KeyW);
        controller.press_key(KeyCode::KeyS);
        controller.press_key(KeyCode::KeyA);
        controller.press_key(KeyCode::KeyD);

        assert_eq!(controller.sample().movement, Vec3::ZERO);
    }

    #[test]
    fn test_delta_ignored_in_absolute_mode() {
        let mut controller = WinitController::new();
        controller.add_mouse_delta(50.0, 10.0);

        assert_eq!(controller.mouse_delta(), Vec2::ZERO);
        assert!(!controller.sample().look_mode_active);
    }

    #[test]
    fn test_look_mode_follows_left_button() {
        let mut controller = WinitController::new();
        controller.set_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_down(Button::Look));

        // Mode switches at the end of the frame the button went down
        assert!(!controller.sample().look_mode_active);
        assert_eq!(controller.end_frame(), Some(MouseMode::Relative));
        assert_eq!(controller.end_frame(), None);

        controller.add_mouse_delta(3.0, -4.0);
        controller.add_mouse_delta(1.0, 1.0);
        let sample = controller.sample();
        assert!(sample.look_mode_active);
        assert_eq!(sample.mouse_delta, Vec2::new(4.0, -3.0));

        controller.set_mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(controller.end_frame(), Some(MouseMode::Absolute));
        assert_eq!(controller.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_right_button_does_not_look() {
        let mut controller = WinitController::new();
        controller.set_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert_eq!(controller.end_frame(), None);
        assert!(!controller.is_down(Button::Look));
    }

    #[test]
    fn test_device_motion_accumulates() {
        let mut controller = WinitController::new();
        controller.set_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.end_frame();

        controller.process_device_event(&DeviceEvent::MouseMotion { delta: (2.0, 5.0) });
        assert_eq!(controller.mouse_delta(), Vec2::new(2.0, 5.0));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut controller = WinitController::new();
        controller.press_key(KeyCode::Home);
        controller.set_mouse_button(MouseButton::Left, ElementState::Pressed);

        controller.clear();
        assert!(controller.get_down_keys().is_empty());
        assert_eq!(controller.end_frame(), None);
    }
}
