//! Charge/release ball launcher
//!
//! Holding the shooter makes the charge level bounce between 0 and
//! `steps - 1`, one step per tick. Releasing fires the ball straight up the
//! lane with a velocity that grows with the charge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::{BodyHandle, Physics};
use crate::consts::{LAUNCH_BASE_VELOCITY, LAUNCH_STEP_GAIN};

/// Launcher state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    steps: u32,
    force: u32,
    /// +1 while charging up, -1 while falling back
    direction: i32,
    charging: bool,
}

impl Launcher {
    /// `steps` below 2 is raised to 2
    pub fn new(steps: u32) -> Self {
        let mut launcher = Self {
            steps: steps.max(2),
            force: 0,
            direction: 1,
            charging: false,
        };
        launcher.reset();
        launcher
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn force(&self) -> u32 {
        self.force
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    fn max_force(&self) -> u32 {
        self.steps - 1
    }

    /// Back to the middle of the range, charging upward
    pub fn reset(&mut self) {
        self.force = self.steps / 2;
        // Two-step launchers start on the top bound
        self.direction = if self.force >= self.max_force() { -1 } else { 1 };
        self.charging = false;
    }

    /// Begin charging; ignored unless the ball is waiting in the lane
    pub fn start_pulling(&mut self, waiting_for_shooter: bool) -> bool {
        if !waiting_for_shooter || self.charging {
            return false;
        }
        self.charging = true;
        true
    }

    /// Advance the charge one step, bouncing off either bound
    pub fn pull(&mut self) {
        let next = self.force as i64 + self.direction as i64;
        self.force = next.clamp(0, self.max_force() as i64) as u32;
        if self.force == 0 || self.force == self.max_force() {
            self.direction = -self.direction;
        }
    }

    /// Pin the charge level (demo mode draws it at random)
    pub fn set_force(&mut self, force: u32) {
        self.force = force.min(self.max_force());
    }

    /// Vertical launch velocity for the current charge, px/tick (negative is up)
    pub fn launch_velocity(&self) -> f32 {
        let centered = (self.force % self.steps) as f32 - (self.steps / 2) as f32;
        LAUNCH_BASE_VELOCITY - LAUNCH_STEP_GAIN * centered
    }

    /// Fire the ball; a no-op returning `None` unless it is waiting in the lane
    pub fn launch(
        &mut self,
        physics: &mut impl Physics,
        ball: BodyHandle,
        waiting_for_shooter: bool,
    ) -> Option<f32> {
        if !waiting_for_shooter {
            return None;
        }
        self.charging = false;
        let vy = self.launch_velocity();
        physics.set_velocity(ball, Vec2::new(0.0, vy));
        physics.set_angular_velocity(ball, 0.0);
        log::info!("Ball launched: force={} vy={:.2}", self.force, vy);
        Some(vy)
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new(crate::consts::LAUNCHER_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Bounds;
    use crate::sim::geometry::Shape;
    use crate::sim::state::Tag;
    use crate::sim::world::{BodyDesc, World};
    use proptest::prelude::*;

    fn ball_world() -> (World, BodyHandle) {
        let mut world = World::new(Bounds::default(), Vec2::ZERO);
        let ball = world.add_body(BodyDesc::dynamic(
            Tag::Ball,
            Shape::Circle { radius: BALL_RADIUS },
            Vec2::new(BALL_START_X, BALL_START_Y),
        ));
        (world, ball)
    }

    #[test]
    fn test_starts_mid_range_charging_up() {
        let launcher = Launcher::new(12);
        assert_eq!(launcher.force(), 6);
        assert_eq!(launcher.direction(), 1);
        assert!(!launcher.is_charging());
        // Neutral charge fires at the base velocity
        assert!((launcher.launch_velocity() - LAUNCH_BASE_VELOCITY).abs() < 1e-6);
    }

    #[test]
    fn test_charge_sequence_bounces() {
        let mut launcher = Launcher::new(12);
        let mut seen = Vec::new();
        for _ in 0..12 {
            launcher.pull();
            seen.push(launcher.force());
        }
        assert_eq!(seen, vec![7, 8, 9, 10, 11, 10, 9, 8, 7, 6, 5, 4]);
    }

    #[test]
    fn test_charge_from_low_force_reverses_at_top() {
        let mut launcher = Launcher::new(12);
        launcher.set_force(5);
        launcher.pull();
        assert_eq!(launcher.force(), 6);
        for _ in 0..5 {
            launcher.pull();
        }
        assert_eq!(launcher.force(), 11);
        assert_eq!(launcher.direction(), -1);
        launcher.pull();
        assert_eq!(launcher.force(), 10);
    }

    #[test]
    fn test_launch_velocity_formula() {
        let mut launcher = Launcher::new(12);
        launcher.set_force(11);
        assert!((launcher.launch_velocity() - (-28.0 - 0.333 * 5.0)).abs() < 1e-5);
        launcher.set_force(0);
        assert!((launcher.launch_velocity() - (-28.0 + 0.333 * 6.0)).abs() < 1e-5);
        launcher.set_force(400);
        assert_eq!(launcher.force(), 11);
    }

    #[test]
    fn test_launch_requires_waiting_ball() {
        let (mut world, ball) = ball_world();
        world.set_velocity(ball, Vec2::new(3.0, 4.0));
        let mut launcher = Launcher::default();

        assert_eq!(launcher.launch(&mut world, ball, false), None);
        assert_eq!(world.velocity(ball), Some(Vec2::new(3.0, 4.0)));

        assert!(launcher.start_pulling(true));
        let vy = launcher.launch(&mut world, ball, true).unwrap();
        assert_eq!(world.velocity(ball), Some(Vec2::new(0.0, vy)));
        assert_eq!(world.body(ball).unwrap().angular_velocity, 0.0);
        assert!(!launcher.is_charging());
    }

    #[test]
    fn test_start_pulling_ignored_after_launch() {
        let mut launcher = Launcher::default();
        assert!(!launcher.start_pulling(false));
        assert!(!launcher.is_charging());
    }

    proptest! {
        #[test]
        fn prop_charge_stays_in_range_and_flips_at_bounds(steps in 2u32..64, pulls in 0usize..400) {
            let mut launcher = Launcher::new(steps);
            let max = steps - 1;
            for _ in 0..pulls {
                let before = launcher.direction();
                launcher.pull();
                let force = launcher.force();
                prop_assert!(force <= max);
                let at_bound = force == 0 || force == max;
                prop_assert_eq!(launcher.direction() != before, at_bound);
            }
        }
    }
}
