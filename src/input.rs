//! Input state shared between the window and the camera.
//!
//! The window translates platform events into [`Key`] presses and releases;
//! the camera only reads the resulting flags once per frame.

/// Keys the renderer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// W: move forward.
    Forward,
    /// S: move backward.
    Back,
    /// A: move left.
    Left,
    /// D: move right.
    Right,
    /// Left arrow: turn left.
    TurnLeft,
    /// Right arrow: turn right.
    TurnRight,
    /// Up arrow: look up.
    LookUp,
    /// Down arrow: look down.
    LookDown,
}

/// Held direction flags plus the top-level running flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub running: bool,
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub look_up: bool,
    pub look_down: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            running: true,
            forward: false,
            back: false,
            left: false,
            right: false,
            turn_left: false,
            turn_right: false,
            look_up: false,
            look_down: false,
        }
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press (`pressed = true`) or release.
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        let flag = match key {
            Key::Forward => &mut self.forward,
            Key::Back => &mut self.back,
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::TurnLeft => &mut self.turn_left,
            Key::TurnRight => &mut self.turn_right,
            Key::LookUp => &mut self.look_up,
            Key::LookDown => &mut self.look_down,
        };
        *flag = pressed;
    }

    /// Drops every held direction. Called when the window loses focus, since
    /// the matching key-up events will never arrive.
    pub fn release_all(&mut self) {
        *self = Self {
            running: self.running,
            ..Self::default()
        };
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Whether any direction flag is held.
    pub fn any_held(&self) -> bool {
        self.forward
            || self.back
            || self.left
            || self.right
            || self.turn_left
            || self.turn_right
            || self.look_up
            || self.look_down
    }
}
