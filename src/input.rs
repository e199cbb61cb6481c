use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pose::{Axis, PoseMode};

/// Keys the viewer can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::ArrowUp => write!(f, "ArrowUp"),
            Key::ArrowDown => write!(f, "ArrowDown"),
            Key::ArrowLeft => write!(f, "ArrowLeft"),
            Key::ArrowRight => write!(f, "ArrowRight"),
            Key::Enter => write!(f, "Enter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyError(pub String);

impl std::error::Error for UnknownKeyError {}

impl fmt::Display for UnknownKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown key: {}", self.0)
    }
}

impl FromStr for Key {
    type Err = UnknownKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Ok(Key::ArrowUp),
            "down" | "arrowdown" => Ok(Key::ArrowDown),
            "left" | "arrowleft" => Ok(Key::ArrowLeft),
            "right" | "arrowright" => Ok(Key::ArrowRight),
            "enter" | "return" => Ok(Key::Enter),
            _ => Err(UnknownKeyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Abstract meaning of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSymbol {
    Increase,
    Decrease,
    Confirm,
}

/// A key bound to the symbol it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: Key,
    pub symbol: InputSymbol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings(pub Vec<KeyBinding>);

impl KeyBindings {
    /// The symbol bound to `key`. If a key is bound more than once, the first
    /// binding wins.
    pub fn symbol(&self, key: Key) -> Option<InputSymbol> {
        self.0
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.symbol)
    }
}

/// What a key press makes the viewer do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    AdjustPose {
        mode: PoseMode,
        axis: Axis,
        delta: f32,
    },
    Wrap,
    Ignore,
}

/// The pose component directional input is bound to and its step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseBinding {
    pub mode: PoseMode,
    pub axis: Axis,
    pub step: f32,
}

/// Maps an input symbol to an action.
pub fn action_for_symbol(symbol: InputSymbol, pose_binding: &PoseBinding) -> Action {
    match symbol {
        InputSymbol::Increase => Action::AdjustPose {
            mode: pose_binding.mode,
            axis: pose_binding.axis,
            delta: pose_binding.step,
        },
        InputSymbol::Decrease => Action::AdjustPose {
            mode: pose_binding.mode,
            axis: pose_binding.axis,
            delta: -pose_binding.step,
        },
        InputSymbol::Confirm => Action::Wrap,
    }
}

/// Translates raw key events into actions.
///
/// Only key presses count, releases and unbound keys are ignored.
#[derive(Debug, Clone)]
pub struct InputManager {
    bindings: KeyBindings,
    pose_binding: PoseBinding,
}

impl InputManager {
    pub fn new(bindings: KeyBindings, pose_binding: PoseBinding) -> Self {
        InputManager {
            bindings,
            pose_binding,
        }
    }

    pub fn process_key(&self, key: Key, state: KeyState) -> Action {
        match state {
            KeyState::Released => Action::Ignore,
            KeyState::Pressed => match self.bindings.symbol(key) {
                Some(symbol) => action_for_symbol(symbol, &self.pose_binding),
                None => Action::Ignore,
            },
        }
    }
}
