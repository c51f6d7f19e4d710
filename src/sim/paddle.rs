//! Paddles and their stoppers
//!
//! A paddle is a hinged capsule with no motor. Its only state is `is_up`.
//! Each tick, the two stoppers bound to it are evaluated: the one whose
//! polarity matches `is_up` pulls the paddle's companion point (the
//! midpoint of the capsule) toward itself, the other stays inert. The
//! hinge limits play the part of the stopper bodies that physically stop
//! the swing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Side;
use super::world::{BodyHandle, Physics};
use crate::consts::PADDLE_SWING;

/// Player-controlled paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    side: Side,
    body: BodyHandle,
    is_up: bool,
}

impl Paddle {
    pub fn new(side: Side, body: BodyHandle) -> Self {
        Self {
            side,
            body,
            is_up: false,
        }
    }

    pub fn up(&mut self) {
        self.is_up = true;
    }

    pub fn down(&mut self) {
        self.is_up = false;
    }

    pub fn is_up(&self) -> bool {
        self.is_up
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }
}

/// Rest and swung capsule angles for a side (y points down the table)
pub fn swing_angles(side: Side) -> (f32, f32) {
    use std::f32::consts::PI;
    match side {
        Side::Left => (PADDLE_SWING, -PADDLE_SWING),
        Side::Right => (PI - PADDLE_SWING, PI + PADDLE_SWING),
    }
}

/// Which paddle state a stopper holds the paddle in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Up,
    Down,
}

impl Polarity {
    #[inline]
    pub fn matches(self, is_up: bool) -> bool {
        match self {
            Polarity::Up => is_up,
            Polarity::Down => !is_up,
        }
    }
}

/// Invisible anchor bound to one paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stopper {
    pub side: Side,
    pub polarity: Polarity,
    pub position: Vec2,
    pub body: BodyHandle,
}

impl Stopper {
    /// Force this stopper exerts on `paddle`, if any
    pub fn force_on(&self, paddle: &Paddle, companion: Vec2, pull: f32) -> Option<Vec2> {
        if paddle.side() != self.side {
            return None;
        }
        attraction(self.position, self.polarity, paddle.is_up(), companion, pull)
    }
}

/// Pull toward `anchor` proportional to displacement, only while the
/// polarity matches the paddle state
pub fn attraction(
    anchor: Vec2,
    polarity: Polarity,
    paddle_up: bool,
    companion: Vec2,
    pull: f32,
) -> Option<Vec2> {
    if !polarity.matches(paddle_up) {
        return None;
    }
    Some((anchor - companion) * pull)
}

/// Evaluate all stoppers and feed their forces into the engine
pub fn apply_attractors(
    physics: &mut impl Physics,
    paddles: &[Paddle],
    stoppers: &[Stopper],
    pull: f32,
) {
    for paddle in paddles {
        let Some(companion) = physics.body(paddle.body()).map(|b| b.companion_point()) else {
            continue;
        };
        for stopper in stoppers {
            if let Some(force) = stopper.force_on(paddle, companion, pull) {
                physics.apply_force(paddle.body(), companion, force);
            }
        }
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

    const PIVOT: Vec2 = Vec2::new(142.0, 852.0);
    const UP_STOP: Vec2 = Vec2::new(160.0, 783.0);
    const DOWN_STOP: Vec2 = Vec2::new(140.0, 935.0);

    fn left_rig() -> (World, Paddle, Vec<Stopper>) {
        let mut world = World::new(Bounds::default(), Vec2::ZERO);
        let (rest, swung) = swing_angles(Side::Left);
        let body = world.add_body(BodyDesc::hinged(
            Tag::Paddle(Side::Left),
            Shape::Capsule {
                length: PADDLE_LENGTH,
                radius: PADDLE_RADIUS,
            },
            PIVOT,
            rest,
            (rest, swung),
            PADDLE_INERTIA,
        ));
        let stoppers = vec![
            Stopper {
                side: Side::Left,
                polarity: Polarity::Up,
                position: UP_STOP,
                body: BodyHandle(99),
            },
            Stopper {
                side: Side::Left,
                polarity: Polarity::Down,
                position: DOWN_STOP,
                body: BodyHandle(98),
            },
        ];
        (world, Paddle::new(Side::Left, body), stoppers)
    }

    #[test]
    fn test_up_down_idempotent_last_write_wins() {
        let mut paddle = Paddle::new(Side::Right, BodyHandle(0));
        paddle.up();
        paddle.up();
        assert!(paddle.is_up());
        paddle.up();
        paddle.down();
        assert!(!paddle.is_up());
        paddle.down();
        assert!(!paddle.is_up());
    }

    #[test]
    fn test_force_only_when_polarity_matches() {
        let companion = Vec2::new(170.0, 860.0);
        for is_up in [false, true] {
            let up = attraction(UP_STOP, Polarity::Up, is_up, companion, PADDLE_PULL);
            let down = attraction(DOWN_STOP, Polarity::Down, is_up, companion, PADDLE_PULL);
            assert_eq!(up.is_some(), is_up);
            assert_eq!(down.is_some(), !is_up);
        }
        let force = attraction(UP_STOP, Polarity::Up, true, companion, 0.5).unwrap();
        assert_eq!(force, (UP_STOP - companion) * 0.5);
    }

    #[test]
    fn test_stopper_ignores_other_side() {
        let (_, _, stoppers) = left_rig();
        let right = Paddle::new(Side::Right, BodyHandle(1));
        assert!(stoppers[1].force_on(&right, Vec2::ZERO, PADDLE_PULL).is_none());
    }

    #[test]
    fn test_paddle_swings_up_and_falls_back() {
        let (mut world, mut paddle, stoppers) = left_rig();
        let (rest, swung) = swing_angles(Side::Left);

        paddle.up();
        for _ in 0..20 {
            apply_attractors(&mut world, std::slice::from_ref(&paddle), &stoppers, PADDLE_PULL);
            world.step();
        }
        let angle = world.body(paddle.body()).unwrap().angle;
        assert!((angle - swung).abs() < 1e-4, "paddle not swung: {angle}");

        paddle.down();
        for _ in 0..20 {
            apply_attractors(&mut world, std::slice::from_ref(&paddle), &stoppers, PADDLE_PULL);
            world.step();
        }
        let angle = world.body(paddle.body()).unwrap().angle;
        assert!((angle - rest).abs() < 1e-4, "paddle not at rest: {angle}");
    }

    #[test]
    fn test_swing_is_eased_not_snapped() {
        let (mut world, mut paddle, stoppers) = left_rig();
        let (rest, swung) = swing_angles(Side::Left);
        paddle.up();
        apply_attractors(&mut world, std::slice::from_ref(&paddle), &stoppers, PADDLE_PULL);
        world.step();
        let angle = world.body(paddle.body()).unwrap().angle;
        assert!(angle < rest && angle > swung, "one tick should land mid-swing: {angle}");
    }
}
