//! Per-tick ball velocity regulation
//!
//! Elastic bumpers add energy on every hit, so the ball's velocity is
//! clamped per axis before each step. Once the ball is in play it must not
//! fall back into the shooter lane: a falling ball right of the lane
//! boundary is sent back up.

use glam::Vec2;

use super::world::{BodyHandle, Physics};
use crate::consts::{LANE_BOUNDARY_X, LANE_GUARD_VELOCITY_Y};

/// Regulated velocity for a ball at `position`
pub fn regulate(position: Vec2, velocity: Vec2, waiting_for_shooter: bool, max_velocity: f32) -> Vec2 {
    if !waiting_for_shooter && position.x > LANE_BOUNDARY_X && velocity.y > 0.0 {
        // Never faster than the cap, however low it is set
        return Vec2::new(0.0, LANE_GUARD_VELOCITY_Y.max(-max_velocity));
    }
    velocity.clamp(Vec2::splat(-max_velocity), Vec2::splat(max_velocity))
}

/// Rewrite the ball's velocity in place
pub fn apply(physics: &mut impl Physics, ball: BodyHandle, waiting_for_shooter: bool, max_velocity: f32) {
    let (Some(position), Some(velocity)) = (physics.position(ball), physics.velocity(ball)) else {
        return;
    };
    let regulated = regulate(position, velocity, waiting_for_shooter, max_velocity);
    if regulated != velocity {
        physics.set_velocity(ball, regulated);
    }
}
