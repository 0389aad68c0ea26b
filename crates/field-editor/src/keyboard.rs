//! Keyboard input for the active field

/// Arrow-key nudge, in pixels
pub const NUDGE_STEP: f64 = 4.0;

/// Arrow-key nudge with Shift held, in pixels
pub const NUDGE_STEP_LARGE: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    Delete,
    Backspace,
    Other,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` name
    pub fn parse(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Escape" => Key::Escape,
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key, shift: bool) -> Self {
        Self { key, shift }
    }

    pub fn step(&self) -> f64 {
        if self.shift {
            NUDGE_STEP_LARGE
        } else {
            NUDGE_STEP
        }
    }

    /// Pixel offset `(dx, dy)` for arrow keys, `None` for anything else
    pub fn nudge(&self) -> Option<(f64, f64)> {
        let step = self.step();
        match self.key {
            Key::ArrowLeft => Some((-step, 0.0)),
            Key::ArrowRight => Some((step, 0.0)),
            Key::ArrowUp => Some((0.0, -step)),
            Key::ArrowDown => Some((0.0, step)),
            _ => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self.key, Key::Delete | Key::Backspace)
    }
}
