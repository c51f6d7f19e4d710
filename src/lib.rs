//! Flipper Table - a 2D pinball table simulation
//!
//! Core modules:
//! - `sim`: Table simulation (engine, paddles, launcher, collision dispatch, game loop)
//! - `platform`: Native/browser storage and input mapping
//! - `highscores`: Current score and persisted high score
//! - `settings`: Recognized configuration options

pub mod error;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{StorageError, TableError, TableResult};
pub use highscores::{HighScoreStore, MemoryStore, ScoreBoard};
pub use settings::{InputMode, Settings};

/// Table configuration constants
///
/// Units are pixels and simulation ticks: velocities are px/tick and
/// accelerations px/tick², with y pointing down the playfield.
pub mod consts {
    /// Simulation tick rate
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds (for frame accumulators)
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum ticks per frame, and maximum engine substeps per tick
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default table dimensions
    pub const TABLE_WIDTH: f32 = 500.0;
    pub const TABLE_HEIGHT: f32 = 992.0;

    /// Default gravity magnitude, scaled by `GRAVITY_SCALE` into px/tick²
    pub const GRAVITY: f32 = 0.6;
    /// Converts per-ms² forces into per-tick² accelerations (1000/60 ms tick)
    pub const FORCE_SCALE: f32 = (1000.0 / 60.0) * (1000.0 / 60.0);
    /// 0.001 px/ms² per unit of gravity
    pub const GRAVITY_SCALE: f32 = 0.001 * FORCE_SCALE;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 14.0;
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_RESTITUTION: f32 = 0.0;
    /// Fraction of tangential velocity lost on contact
    pub const BALL_FRICTION: f32 = 0.02;
    /// Launch position, at the bottom of the shooter lane
    pub const BALL_START_X: f32 = 465.0;
    pub const BALL_START_Y: f32 = 957.0;
    /// Default per-axis velocity cap
    pub const MAX_VELOCITY: f32 = 38.0;

    /// Shooter lane: ball right of this x while falling gets pushed back up
    pub const LANE_BOUNDARY_X: f32 = 450.0;
    pub const LANE_GUARD_VELOCITY_Y: f32 = -10.0;

    /// Launcher defaults
    pub const LAUNCHER_STEPS: u32 = 12;
    pub const LAUNCH_BASE_VELOCITY: f32 = -28.0;
    pub const LAUNCH_STEP_GAIN: f32 = 0.333;

    /// Bumpers
    pub const BUMPER_RADIUS: f32 = 25.0;
    pub const BUMPER_RESTITUTION: f32 = 1.5;
    pub const BUMPER_AWARD: u32 = 10;
    /// ~100 ms
    pub const BUMPER_FLASH_TICKS: u64 = 6;

    /// Paddles - capsules hinged at a pivot, driven by stopper attraction
    pub const PADDLE_LENGTH: f32 = 66.0;
    pub const PADDLE_RADIUS: f32 = 7.0;
    /// Swing half-range around horizontal (radians)
    pub const PADDLE_SWING: f32 = 0.5;
    pub const PADDLE_INERTIA: f32 = 5000.0;
    pub const PADDLE_PULL: f32 = 0.002;
    pub const PADDLE_PIVOT_LEFT_X: f32 = 142.0;
    pub const PADDLE_PIVOT_RIGHT_X: f32 = 308.0;
    /// Pivot height above the table bottom
    pub const PADDLE_PIVOT_RISE: f32 = 140.0;
    /// ~250 ms
    pub const DEMO_PADDLE_HOLD_TICKS: u64 = 15;

    /// Stoppers (invisible paddle anchors)
    pub const STOPPER_RADIUS: f32 = 20.0;

    /// Static geometry
    pub const BOUNDARY_THICKNESS: f32 = 20.0;
    pub const RESET_X: f32 = 225.0;
    pub const RESET_WIDTH: f32 = 50.0;
    /// Reset drain height above the table bottom
    pub const RESET_RISE: f32 = 19.0;
}

/// Render fill colors (0xRRGGBB)
pub mod colors {
    pub const BACKGROUND: u32 = 0x212529;
    pub const OUTER: u32 = 0x495057;
    pub const INNER: u32 = 0x15aabf;
    pub const BUMPER: u32 = 0xfab005;
    pub const BUMPER_LIT: u32 = 0xfff3bf;
    pub const PADDLE: u32 = 0xe64980;
    pub const PINBALL: u32 = 0xdee2e6;
    pub const RESET: u32 = 0xffffff;
}
