//! Table layout
//!
//! Builds the playfield into a physics world: boundaries, the dome, lane
//! walls, bumpers, aprons and the drain, then paddles with their stoppers,
//! then the ball. Outlines are `x y x y ...` paths.

use glam::Vec2;

use super::geometry::{Shape, parse_path};
use super::paddle::{Paddle, Polarity, Stopper, swing_angles};
use super::state::{Side, Tag};
use super::world::{BodyDesc, BodyHandle, Physics};
use crate::colors;
use crate::consts::*;
use crate::error::TableResult;
use crate::settings::Settings;

/// Outline paths, in path-local coordinates
pub mod paths {
    pub const DOME: &str = "0 0 0 250 19 250 20 231.9 25.7 196.1 36.9 161.7 53.3 129.5 74.6 100.2 \
        100.2 74.6 129.5 53.3 161.7 36.9 196.1 25.7 231.9 20 268.1 20 303.9 25.7 338.3 36.9 \
        370.5 53.3 399.8 74.6 425.4 100.2 446.7 129.5 463.1 161.7 474.3 196.1 480 231.9 \
        480 250 500 250 500 0 0 0";
    pub const DROP_LEFT: &str = "0 0 20 0 70 100 20 150 0 150 0 0";
    pub const DROP_RIGHT: &str = "50 0 68 0 68 150 50 150 0 100 50 0";
    pub const APRON_TOP_LEFT: &str = "0 0 180 0 0 120 0 0";
    pub const APRON_LEFT: &str = "0 0 180 120 0 120 0 0";
    pub const APRON_RIGHT: &str = "180 0 180 120 0 120 180 0";
}

/// Where a path body goes
#[derive(Debug, Clone, Copy)]
enum Anchor {
    /// Path coordinates are table coordinates
    AsDrawn,
    /// Area centroid sits here
    Centroid(f32, f32),
}

const PATH_PIECES: &[(&str, &str, Anchor)] = &[
    ("dome", paths::DOME, Anchor::AsDrawn),
    ("apron-top-left", paths::APRON_TOP_LEFT, Anchor::Centroid(30.0, 30.0)),
    ("drop-left-upper", paths::DROP_LEFT, Anchor::Centroid(25.0, 360.0)),
    ("drop-right-upper", paths::DROP_RIGHT, Anchor::Centroid(425.0, 360.0)),
    ("drop-left-lower", paths::DROP_LEFT, Anchor::Centroid(25.0, 520.0)),
    ("drop-right-lower", paths::DROP_RIGHT, Anchor::Centroid(425.0, 520.0)),
    ("apron-left", paths::APRON_LEFT, Anchor::Centroid(79.0, 932.0)),
    ("apron-right", paths::APRON_RIGHT, Anchor::Centroid(371.0, 932.0)),
];

/// (x, y, width, height, angle, fill)
const WALLS: &[(f32, f32, f32, f32, f32, u32)] = &[
    // Rollover posts
    (120.0, 140.0, 20.0, 40.0, 0.0, colors::INNER),
    (190.0, 140.0, 20.0, 40.0, 0.0, colors::INNER),
    (260.0, 140.0, 20.0, 40.0, 0.0, colors::INNER),
    (330.0, 140.0, 20.0, 40.0, 0.0, colors::INNER),
    // Shooter lane
    (440.0, 620.0, 20.0, 722.0, 0.0, colors::OUTER),
    // Inner and outer lanes
    (120.0, 702.0, 20.0, 120.0, 0.0, colors::INNER),
    (330.0, 702.0, 20.0, 120.0, 0.0, colors::INNER),
    (60.0, 721.0, 20.0, 160.0, 0.0, colors::INNER),
    (390.0, 721.0, 20.0, 160.0, 0.0, colors::INNER),
    // Slants feeding the paddles
    (93.0, 816.0, 20.0, 98.0, -0.96, colors::INNER),
    (357.0, 816.0, 20.0, 98.0, 0.96, colors::INNER),
];

const BUMPERS: &[(f32, f32)] = &[
    (105.0, 250.0),
    (225.0, 250.0),
    (345.0, 250.0),
    (165.0, 340.0),
    (285.0, 340.0),
];

/// Handles to everything the table drives after setup
#[derive(Debug, Clone)]
pub struct TableBodies {
    pub ball: BodyHandle,
    pub paddles: [Paddle; 2],
    pub stoppers: Vec<Stopper>,
    pub bumpers: Vec<BodyHandle>,
    pub reset: BodyHandle,
}

impl TableBodies {
    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.paddles[0],
            Side::Right => &self.paddles[1],
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.paddles[0],
            Side::Right => &mut self.paddles[1],
        }
    }
}

/// Add a static outline from an `x y x y ...` path
pub fn add_path(
    physics: &mut impl Physics,
    label: &str,
    path: &str,
    centroid_at: Option<Vec2>,
) -> TableResult<BodyHandle> {
    let points = parse_path(label, path)?;
    let (centroid, shape) = Shape::polygon(label, &points)?;
    let position = centroid_at.unwrap_or(centroid);
    Ok(physics.add_body(BodyDesc::fixed(Tag::Wall, shape, position).with_fill(colors::OUTER)))
}

/// Build the whole table
pub fn build(physics: &mut impl Physics, settings: &Settings) -> TableResult<TableBodies> {
    let reset = build_static(physics, settings)?;
    let stopper_group = physics.next_group(true);
    let (paddles, stoppers) = build_paddles(physics, settings, stopper_group);
    let bumpers = build_bumpers(physics);
    let ball = physics.add_body(
        BodyDesc::dynamic(
            Tag::Ball,
            Shape::Circle {
                radius: BALL_RADIUS,
            },
            Vec2::new(BALL_START_X, BALL_START_Y),
        )
        .with_mass(BALL_MASS)
        .with_restitution(BALL_RESTITUTION)
        .with_group(stopper_group)
        .with_fill(colors::PINBALL),
    );

    log::info!(
        "Table built: {}x{}, {} bumpers, {} stoppers",
        settings.bounds.width,
        settings.bounds.height,
        bumpers.len(),
        stoppers.len()
    );
    Ok(TableBodies {
        ball,
        paddles,
        stoppers,
        bumpers,
        reset,
    })
}

/// Boundaries, outlines, walls and the drain; returns the drain
fn build_static(physics: &mut impl Physics, settings: &Settings) -> TableResult<BodyHandle> {
    let w = settings.bounds.width;
    let h = settings.bounds.height;
    let t = BOUNDARY_THICKNESS;
    let boundaries = [
        (Vec2::new(w / 2.0, 0.0), w + 2.0 * t, t),
        (Vec2::new(w / 2.0, h), w + 2.0 * t, t),
        (Vec2::new(0.0, h / 2.0), t, h + 2.0 * t),
        (Vec2::new(w, h / 2.0), t, h + 2.0 * t),
    ];
    for (center, bw, bh) in boundaries {
        physics.add_body(
            BodyDesc::fixed(Tag::Boundary, Shape::rectangle(bw, bh, 0.0), center)
                .with_fill(colors::PADDLE),
        );
    }

    for (label, path, anchor) in PATH_PIECES {
        let centroid_at = match *anchor {
            Anchor::AsDrawn => None,
            Anchor::Centroid(x, y) => Some(Vec2::new(x, y)),
        };
        add_path(physics, label, path, centroid_at)?;
    }

    for &(x, y, width, height, angle, fill) in WALLS {
        physics.add_body(
            BodyDesc::fixed(Tag::Wall, Shape::rectangle(width, height, angle), Vec2::new(x, y))
                .with_fill(fill),
        );
    }

    let reset = physics.add_body(
        BodyDesc::fixed(
            Tag::Reset,
            Shape::rectangle(RESET_WIDTH, 2.0, 0.0),
            Vec2::new(RESET_X, h - RESET_RISE),
        )
        .with_fill(colors::RESET),
    );
    Ok(reset)
}

fn build_bumpers(physics: &mut impl Physics) -> Vec<BodyHandle> {
    BUMPERS
        .iter()
        .map(|&(x, y)| {
            physics.add_body(
                BodyDesc::fixed(
                    Tag::Bumper,
                    Shape::Circle {
                        radius: BUMPER_RADIUS,
                    },
                    Vec2::new(x, y),
                )
                .with_restitution(BUMPER_RESTITUTION)
                .with_fill(colors::BUMPER),
            )
        })
        .collect()
}

fn build_paddles(
    physics: &mut impl Physics,
    settings: &Settings,
    stopper_group: i32,
) -> ([Paddle; 2], Vec<Stopper>) {
    let h = settings.bounds.height;

    // Ball passes through these; they only anchor the attraction
    let stopper_places = [
        (Side::Left, Polarity::Up, Vec2::new(160.0, h - 209.0)),
        (Side::Left, Polarity::Down, Vec2::new(140.0, h - 57.0)),
        (Side::Right, Polarity::Up, Vec2::new(290.0, h - 209.0)),
        (Side::Right, Polarity::Down, Vec2::new(310.0, h - 57.0)),
    ];
    let stoppers = stopper_places
        .iter()
        .map(|&(side, polarity, position)| {
            let body = physics.add_body(
                BodyDesc::fixed(
                    Tag::Stopper,
                    Shape::Circle {
                        radius: STOPPER_RADIUS,
                    },
                    position,
                )
                .with_group(stopper_group)
                .hidden(),
            );
            Stopper {
                side,
                polarity,
                position,
                body,
            }
        })
        .collect();

    let paddle_group = physics.next_group(true);
    let mut make = |side: Side, pivot_x: f32| {
        let (rest, swung) = swing_angles(side);
        let body = physics.add_body(
            BodyDesc::hinged(
                Tag::Paddle(side),
                Shape::Capsule {
                    length: PADDLE_LENGTH,
                    radius: PADDLE_RADIUS,
                },
                Vec2::new(pivot_x, h - PADDLE_PIVOT_RISE),
                rest,
                (rest, swung),
                PADDLE_INERTIA,
            )
            .with_group(paddle_group)
            .with_fill(colors::PADDLE),
        );
        Paddle::new(side, body)
    };
    let left = make(Side::Left, PADDLE_PIVOT_LEFT_X);
    let right = make(Side::Right, PADDLE_PIVOT_RIGHT_X);
    ([left, right], stoppers)
}
