/// Logical input button. Several physical keys may drive the same button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
    Reset,
    Quit,
    Look,
}

impl Button {
    pub const ALL: [Button; 9] = [
        Button::Forward,
        Button::Back,
        Button::StrafeLeft,
        Button::StrafeRight,
        Button::Up,
        Button::Down,
        Button::Reset,
        Button::Quit,
        Button::Look,
    ];
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}
