//! Table simulation
//!
//! Everything that runs per tick lives here:
//! - `world`, `geometry`, `collision`: the built-in rigid-body engine
//! - `paddle`, `launcher`, `regulator`, `dispatch`, `timers`: the control layer
//! - `layout`: table construction
//! - `tick`: the [`Table`] orchestrator

pub mod collision;
pub mod dispatch;
pub mod geometry;
pub mod launcher;
pub mod layout;
pub mod paddle;
pub mod regulator;
pub mod state;
pub mod tick;
pub mod timers;
pub mod world;

pub use collision::CollisionResult;
pub use dispatch::{Reaction, dispatch};
pub use geometry::Shape;
pub use launcher::Launcher;
pub use layout::TableBodies;
pub use paddle::{Paddle, Polarity, Stopper, attraction};
pub use regulator::regulate;
pub use state::{Action, GameEvent, InputEvent, Side, Tag};
pub use tick::Table;
pub use timers::Scheduler;
pub use world::{Body, BodyDesc, BodyHandle, BodyKind, CollisionStart, Physics, World};
