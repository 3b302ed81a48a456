use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Held state of the three game controls. Overwritten on every press or
/// release; there is no queueing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    pub fn is_idle(&self) -> bool {
        !self.left && !self.right && !self.jump
    }
}

/// A logical game control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
    Jump,
}

impl Control {
    /// Map a DOM-style key code (`KeyboardEvent.code`) to a control.
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Self::Left),
            "ArrowRight" | "KeyD" => Some(Self::Right),
            "ArrowUp" | "KeyW" | "Space" => Some(Self::Jump),
            _ => None,
        }
    }
}

/// Where a press or release came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlSource {
    Keyboard,
    Touch,
    Pointer,
}

/// Tracks held controls per source and reduces them to one [`InputState`].
#[derive(Debug, Clone, Default)]
pub struct ControlTracker {
    held: HashMap<ControlSource, HashSet<Control>>,
}

impl ControlTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control, source: ControlSource) {
        self.held.entry(source).or_default().insert(control);
    }

    pub fn release(&mut self, control: Control, source: ControlSource) {
        if let Some(set) = self.held.get_mut(&source) {
            set.remove(&control);
        }
    }

    /// Drop everything held by one source (pointer leaving a button, focus loss).
    pub fn release_all(&mut self, source: ControlSource) {
        self.held.remove(&source);
    }

    fn is_held(&self, control: Control) -> bool {
        self.held.values().any(|set| set.contains(&control))
    }

    /// Union of every source's held controls.
    pub fn state(&self) -> InputState {
        InputState {
            left: self.is_held(Control::Left),
            right: self.is_held(Control::Right),
            jump: self.is_held(Control::Jump),
        }
    }
}
