//! Raw input to logical actions

use crate::settings::KeyBindings;
use crate::sim::{Action, InputEvent};

/// On-screen touch/click regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    LeftTrigger,
    RightTrigger,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::LeftTrigger, Zone::RightTrigger];

    pub fn action(self) -> Action {
        match self {
            Zone::LeftTrigger => Action::LeftPaddle,
            Zone::RightTrigger => Action::RightPaddle,
        }
    }

    /// CSS selector of the page element for this zone
    pub fn selector(self) -> &'static str {
        match self {
            Zone::LeftTrigger => ".left-trigger",
            Zone::RightTrigger => ".right-trigger",
        }
    }
}

/// Action bound to a `KeyboardEvent.key` value
pub fn key_action(bindings: &KeyBindings, key: &str) -> Option<Action> {
    if key == bindings.left_paddle {
        Some(Action::LeftPaddle)
    } else if key == bindings.right_paddle {
        Some(Action::RightPaddle)
    } else if key == bindings.shooter {
        Some(Action::Shooter)
    } else {
        None
    }
}

/// Key press/release as a table input; unmapped keys give `None`
pub fn key_event(bindings: &KeyBindings, key: &str, pressed: bool) -> Option<InputEvent> {
    key_action(bindings, key).map(|action| InputEvent { action, pressed })
}

pub fn zone_event(zone: Zone, pressed: bool) -> InputEvent {
    InputEvent {
        action: zone.action(),
        pressed,
    }
}
