//! Collision dispatch
//!
//! Maps each newly begun ball contact to the reactions it triggers, keyed
//! on the other body's tag. Pure: the table applies the reactions.

use serde::{Deserialize, Serialize};

use super::state::{Side, Tag};
use super::world::{BodyHandle, CollisionStart, Physics};

/// What a contact asks the table to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    /// Ball back to the lane, score to zero
    ResetBall,
    /// Award points and flash this bumper
    PingBumper(BodyHandle),
    /// Demo mode: flip this paddle briefly
    PressPaddle(Side),
    /// Demo mode: fire the ball again after a reset
    AutoLaunch,
}

/// Push the reactions for a ball touching `other` (tagged `tag`)
pub fn react(tag: Tag, other: BodyHandle, demo_mode: bool, out: &mut Vec<Reaction>) {
    match tag {
        Tag::Reset => {
            out.push(Reaction::ResetBall);
            if demo_mode {
                out.push(Reaction::AutoLaunch);
            }
        }
        Tag::Bumper => out.push(Reaction::PingBumper(other)),
        Tag::Paddle(side) if demo_mode => out.push(Reaction::PressPaddle(side)),
        _ => {}
    }
}

/// Reactions for one tick's contact starts, in event order
///
/// Pairs not involving the ball are skipped.
pub fn dispatch(
    physics: &impl Physics,
    ball: BodyHandle,
    starts: &[CollisionStart],
    demo_mode: bool,
) -> Vec<Reaction> {
    let mut out = Vec::new();
    for start in starts {
        let Some(other) = start.other(ball) else {
            continue;
        };
        let Some(tag) = physics.tag(other) else {
            continue;
        };
        log::debug!("Ball hit {} ({:?})", tag.as_str(), other);
        react(tag, other, demo_mode, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Bounds;
    use crate::sim::geometry::Shape;
    use crate::sim::world::{BodyDesc, World};
    use glam::Vec2;

    fn reacts(tag: Tag, demo: bool) -> Vec<Reaction> {
        let mut out = Vec::new();
        react(tag, BodyHandle(7), demo, &mut out);
        out
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(reacts(Tag::Reset, false), vec![Reaction::ResetBall]);
        assert_eq!(
            reacts(Tag::Reset, true),
            vec![Reaction::ResetBall, Reaction::AutoLaunch]
        );
        assert_eq!(reacts(Tag::Bumper, false), vec![Reaction::PingBumper(BodyHandle(7))]);
        assert_eq!(reacts(Tag::Bumper, true), vec![Reaction::PingBumper(BodyHandle(7))]);
        assert!(reacts(Tag::Paddle(Side::Left), false).is_empty());
        assert_eq!(
            reacts(Tag::Paddle(Side::Right), true),
            vec![Reaction::PressPaddle(Side::Right)]
        );
        for tag in [Tag::Wall, Tag::Boundary, Tag::Stopper, Tag::Ball] {
            assert!(reacts(tag, true).is_empty());
        }
    }

    #[test]
    fn test_each_pair_dispatched_independently() {
        let mut world = World::new(Bounds::default(), Vec2::ZERO);
        let circle = Shape::Circle { radius: 25.0 };
        let b1 = world.add_body(BodyDesc::fixed(Tag::Bumper, circle.clone(), Vec2::new(100.0, 100.0)));
        let b2 = world.add_body(BodyDesc::fixed(Tag::Bumper, circle.clone(), Vec2::new(200.0, 100.0)));
        let wall = world.add_body(BodyDesc::fixed(Tag::Wall, circle, Vec2::new(300.0, 100.0)));
        let ball = world.add_body(BodyDesc::dynamic(
            Tag::Ball,
            Shape::Circle { radius: 14.0 },
            Vec2::new(150.0, 100.0),
        ));

        let starts = [
            CollisionStart { a: b1, b: ball },
            CollisionStart { a: b2, b: ball },
            CollisionStart { a: wall, b: ball },
            // Not involving the ball
            CollisionStart { a: b1, b: b2 },
        ];
        let out = dispatch(&world, ball, &starts, false);
        assert_eq!(out, vec![Reaction::PingBumper(b1), Reaction::PingBumper(b2)]);
    }
}
