//! Fixed timestep table loop
//!
//! [`Table`] owns the world and every controller. Input events mutate
//! paddle and launcher state between ticks; [`Table::tick`] advances the
//! simulation one step and turns contacts into game reactions.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::dispatch::{Reaction, dispatch};
use super::launcher::Launcher;
use super::layout::{self, TableBodies};
use super::paddle::{Paddle, apply_attractors};
use super::regulator;
use super::state::{Action, GameEvent, InputEvent, Side};
use super::timers::Scheduler;
use super::world::{BodyHandle, Physics, World};
use crate::colors;
use crate::consts::*;
use crate::error::TableResult;
use crate::highscores::{HighScoreStore, ScoreBoard, ScoreUpdate};
use crate::settings::Settings;

/// Deferred table actions, keyed by the object they touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timed {
    DimBumper(BodyHandle),
    ReleasePaddle(Side),
}

/// A running pinball table
pub struct Table {
    settings: Settings,
    world: World,
    bodies: TableBodies,
    launcher: Launcher,
    score: ScoreBoard,
    store: Box<dyn HighScoreStore>,
    timers: Scheduler<Timed>,
    rng: Pcg32,
    waiting_for_shooter: bool,
    /// Bumped on every ball reset
    generation: u64,
    time_ticks: u64,
    events: Vec<GameEvent>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("score", &self.score)
            .field("waiting_for_shooter", &self.waiting_for_shooter)
            .field("generation", &self.generation)
            .field("time_ticks", &self.time_ticks)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Build the table: static geometry, paddles and stoppers, then the ball
    pub fn new(settings: Settings, store: Box<dyn HighScoreStore>) -> TableResult<Self> {
        settings.validate()?;

        let gravity = Vec2::new(0.0, settings.gravity * GRAVITY_SCALE);
        let mut world = World::new(settings.bounds, gravity);
        let bodies = layout::build(&mut world, &settings)?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let score = ScoreBoard::load(store.as_ref());

        let mut table = Self {
            launcher: Launcher::new(settings.launcher_steps),
            settings,
            world,
            bodies,
            score,
            store,
            timers: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            waiting_for_shooter: true,
            generation: 0,
            time_ticks: 0,
            events: Vec::new(),
        };
        table.reset_ball();
        if table.settings.demo_mode {
            log::info!("Demo mode on");
            table.demo_launch();
        }
        Ok(table)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn bodies(&self) -> &TableBodies {
        &self.bodies
    }

    pub fn score(&self) -> ScoreBoard {
        self.score
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        self.bodies.paddle(side)
    }

    pub fn waiting_for_shooter(&self) -> bool {
        self.waiting_for_shooter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn ball_position(&self) -> Vec2 {
        self.world.position(self.bodies.ball).unwrap_or(Vec2::ZERO)
    }

    pub fn ball_velocity(&self) -> Vec2 {
        self.world.velocity(self.bodies.ball).unwrap_or(Vec2::ZERO)
    }

    pub fn is_lit(&self, bumper: BodyHandle) -> bool {
        self.world
            .body(bumper)
            .is_some_and(|b| b.fill == colors::BUMPER_LIT)
    }

    /// Take the UI notifications queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a press or release
    pub fn handle_input(&mut self, input: InputEvent) {
        match (input.action, input.pressed) {
            (Action::LeftPaddle, true) => self.bodies.paddle_mut(Side::Left).up(),
            (Action::LeftPaddle, false) => self.bodies.paddle_mut(Side::Left).down(),
            (Action::RightPaddle, true) => self.bodies.paddle_mut(Side::Right).up(),
            (Action::RightPaddle, false) => self.bodies.paddle_mut(Side::Right).down(),
            (Action::Shooter, true) => {
                if !self.launcher.start_pulling(self.waiting_for_shooter) {
                    log::debug!("Shooter press ignored");
                }
            }
            (Action::Shooter, false) => {
                if !self.launch() {
                    log::debug!("Shooter release ignored, ball in play");
                }
            }
        }
    }

    /// Fire the ball if it is waiting; false if it was already in play
    pub fn launch(&mut self) -> bool {
        match self
            .launcher
            .launch(&mut self.world, self.bodies.ball, self.waiting_for_shooter)
        {
            Some(velocity_y) => {
                self.waiting_for_shooter = false;
                self.events.push(GameEvent::BallLaunched { velocity_y });
                true
            }
            None => false,
        }
    }

    /// Demo launch at a random charge level
    fn demo_launch(&mut self) {
        let force = self.rng.random_range(0..self.launcher.steps());
        self.launcher.set_force(force);
        self.launch();
    }

    /// Ball back to the lane: score zeroed, launcher re-armed, stale
    /// paddle releases dropped
    pub fn reset_ball(&mut self) {
        self.generation += 1;
        self.waiting_for_shooter = true;
        self.launcher.reset();

        let ball = self.bodies.ball;
        self.world.set_position(ball, Vec2::new(BALL_START_X, BALL_START_Y));
        self.world.set_velocity(ball, Vec2::ZERO);
        self.world.set_angular_velocity(ball, 0.0);

        for side in Side::BOTH {
            if self.timers.cancel(&Timed::ReleasePaddle(side)) {
                self.bodies.paddle_mut(side).down();
            }
        }

        let update = self.score.reset();
        self.record_score(update);
        self.events.push(GameEvent::BallReset);
        log::debug!("Ball reset (generation {})", self.generation);
    }

    /// Advance one fixed step
    pub fn tick(&mut self) {
        self.time_ticks += 1;
        let ball = self.bodies.ball;

        if self.launcher.is_charging() {
            self.launcher.pull();
        }

        regulator::apply(
            &mut self.world,
            ball,
            self.waiting_for_shooter,
            self.settings.max_velocity,
        );
        apply_attractors(
            &mut self.world,
            &self.bodies.paddles,
            &self.bodies.stoppers,
            self.settings.paddle_pull,
        );

        let starts = self.world.step();
        for reaction in dispatch(&self.world, ball, &starts, self.settings.demo_mode) {
            self.react(reaction);
        }

        self.run_timers();

        if self.ball_escaped() {
            log::warn!("Ball left the table at {:?}, resetting", self.ball_position());
            self.reset_ball();
            if self.settings.demo_mode {
                self.demo_launch();
            }
        }
    }

    fn react(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::ResetBall => self.reset_ball(),
            Reaction::PingBumper(bumper) => {
                let update = self.score.award(BUMPER_AWARD);
                self.record_score(update);
                self.world.set_fill(bumper, colors::BUMPER_LIT);
                self.events.push(GameEvent::BumperLit(bumper));
                self.timers.schedule(
                    self.time_ticks + BUMPER_FLASH_TICKS,
                    Timed::DimBumper(bumper),
                    self.generation,
                );
            }
            Reaction::PressPaddle(side) => {
                self.bodies.paddle_mut(side).up();
                self.timers.schedule(
                    self.time_ticks + DEMO_PADDLE_HOLD_TICKS,
                    Timed::ReleasePaddle(side),
                    self.generation,
                );
            }
            Reaction::AutoLaunch => self.demo_launch(),
        }
    }

    fn run_timers(&mut self) {
        for due in self.timers.drain_due(self.time_ticks) {
            match due.key {
                // Dims always land so a bumper is never left lit
                Timed::DimBumper(bumper) => {
                    self.world.set_fill(bumper, colors::BUMPER);
                    self.events.push(GameEvent::BumperDimmed(bumper));
                }
                Timed::ReleasePaddle(side) => {
                    if due.generation == self.generation {
                        self.bodies.paddle_mut(side).down();
                    } else {
                        log::debug!("Dropping stale {:?} paddle release", side);
                    }
                }
            }
        }
    }

    fn record_score(&mut self, update: ScoreUpdate) {
        self.events.push(GameEvent::ScoreChanged {
            current: update.current,
            high: update.high,
        });
        if update.new_high {
            match self.store.save(update.high) {
                Ok(()) => log::info!("New high score {}", update.high),
                Err(e) => log::warn!("Could not save high score {}: {}", update.high, e),
            }
        }
    }

    fn ball_escaped(&self) -> bool {
        let pos = self.ball_position();
        let bounds = self.world.bounds();
        let margin = BALL_RADIUS * 4.0;
        !pos.is_finite()
            || pos.x < -margin
            || pos.y < -margin
            || pos.x > bounds.width + margin
            || pos.y > bounds.height + margin
    }
}
