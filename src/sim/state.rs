//! Shared table types: body tags, input and game events

use serde::{Deserialize, Serialize};

use super::world::BodyHandle;

/// Paddle side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// Collision label identifying a body's role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Ball,
    Bumper,
    /// Drain strip: touching it ends the ball
    Reset,
    Paddle(Side),
    /// Invisible paddle anchor
    Stopper,
    Wall,
    Boundary,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Ball => "pinball",
            Tag::Bumper => "bumper",
            Tag::Reset => "reset",
            Tag::Paddle(Side::Left) => "paddle-left",
            Tag::Paddle(Side::Right) => "paddle-right",
            Tag::Stopper => "stopper",
            Tag::Wall => "wall",
            Tag::Boundary => "boundary",
        }
    }
}

/// Logical input actions, already mapped from keys/pointer zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    LeftPaddle,
    RightPaddle,
    Shooter,
}

/// A press or release of a logical action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub action: Action,
    pub pressed: bool,
}

impl InputEvent {
    pub fn down(action: Action) -> Self {
        Self {
            action,
            pressed: true,
        }
    }

    pub fn up(action: Action) -> Self {
        Self {
            action,
            pressed: false,
        }
    }
}

/// Notifications for the UI, drained after each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { current: u32, high: u32 },
    BallReset,
    BallLaunched { velocity_y: f32 },
    BumperLit(BodyHandle),
    BumperDimmed(BodyHandle),
}
