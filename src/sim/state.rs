//! Round state and core simulation types
//!
//! Everything a save file must restore lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::countdown::Countdown;
use super::geom::{Circle, Field, Rect};
use super::tick::generate_bricks;
use crate::error::EngineError;
use crate::settings::Settings;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Counting down before play (re)starts; paddle input disabled
    Countdown,
    /// Active gameplay
    Running,
    /// Suspended by the player
    Paused,
    /// No lives left
    GameOver,
}

/// Paddle move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Stop,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub rect: Rect,
    /// Fixed width, used for clamping against the field edges
    pub width: f32,
    /// Signed horizontal speed (pixels per tick, 0 when idle)
    pub speed: f32,
    /// Magnitude used by move commands
    pub move_speed: f32,
    pub colour: String,
}

impl Paddle {
    /// Paddle at an explicit position; rejects zero or negative widths
    pub fn new(rect: Rect, move_speed: f32, colour: String) -> Result<Self, EngineError> {
        let paddle = Self {
            rect,
            width: rect.width(),
            speed: 0.0,
            move_speed,
            colour,
        };
        paddle.check()?;
        Ok(paddle)
    }

    /// Reject paddles with no usable width
    pub fn check(&self) -> Result<(), EngineError> {
        let consistent = (self.rect.width() - self.width).abs() <= 1e-3;
        if !self.rect.is_well_formed() || !self.width.is_finite() || self.width <= 0.0 || !consistent
        {
            return Err(EngineError::DegeneratePaddle { width: self.width });
        }
        Ok(())
    }

    /// Paddle centred horizontally, `paddle_canvas_gap` above the field bottom.
    /// `settings` must already be validated.
    pub fn centered(settings: &Settings, field: &Field) -> Self {
        let width = settings.paddle_width;
        let bottom = field.height - settings.paddle_canvas_gap;
        let left = field.width / 2.0 - width / 2.0;
        Self {
            rect: Rect::new(left, bottom - settings.paddle_height, left + width, bottom),
            width,
            speed: 0.0,
            move_speed: settings.paddle_speed,
            colour: settings.paddle_colour.clone(),
        }
    }

    /// Set the speed used by the next [`Paddle::advance`]
    pub fn set_velocity(&mut self, direction: MoveDirection) {
        self.speed = match direction {
            MoveDirection::Left => -self.move_speed,
            MoveDirection::Right => self.move_speed,
            MoveDirection::Stop => 0.0,
        };
    }

    /// Move by the current speed, clamped to the field
    pub fn advance(&mut self, field: &Field) {
        self.rect.translate(Vec2::new(self.speed, 0.0));

        if self.rect.left < 0.0 {
            self.rect.left = 0.0;
            self.rect.right = self.width;
        } else if self.rect.right > field.width {
            self.rect.right = field.width;
            self.rect.left = field.width - self.width;
        }
    }
}

/// A destructible brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    /// Reward on destruction
    pub score: u32,
    /// Display only
    pub colour: String,
}

impl Brick {
    pub fn new(rect: Rect, score: u32, colour: impl Into<String>) -> Self {
        Self {
            rect,
            score,
            colour: colour.into(),
        }
    }
}

/// The ball; collision behaviour lives in `sim::collision`
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub body: Circle,
    /// Pixels per tick
    pub vel: Vec2,
    /// Magnitude of `vel` after any rebound
    pub speed: f32,
    /// Paddle-top hits left before the next speed-up
    pub bounces_until_speed_up: u32,
    /// Reset value for `bounces_until_speed_up`
    pub original_bounces_until_speed_up: u32,
    pub speed_up_amount: f32,
    pub colour: String,
}

impl Ball {
    /// Fresh ball for `level`: centred horizontally `ball_paddle_gap` above the
    /// paddle, falling straight down at the level's speed.
    pub fn spawn(settings: &Settings, field: &Field, paddle: &Paddle, level: u32) -> Self {
        let speed = settings.ball_speed_for_level(level);
        let bounces = settings.bounces_for_level(level);
        Self {
            body: Circle::new(
                Vec2::new(field.width / 2.0, paddle.rect.top - settings.ball_paddle_gap),
                settings.ball_radius,
            ),
            vel: Vec2::new(0.0, speed),
            speed,
            bounces_until_speed_up: bounces,
            original_bounces_until_speed_up: bounces,
            speed_up_amount: settings.speed_up_amount_for_level(level),
            colour: settings.ball_colour.clone(),
        }
    }

    /// Bounding box used by every collision rule
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.body.bounds()
    }

    /// Reject balls that cannot move or have no extent
    pub fn check(&self) -> Result<(), EngineError> {
        let radius = self.body.radius;
        let degenerate = !radius.is_finite()
            || radius <= 0.0
            || !self.speed.is_finite()
            || self.speed <= 0.0
            || !self.vel.is_finite()
            || !self.body.center.is_finite();
        if degenerate {
            return Err(EngineError::DegenerateBall {
                radius,
                speed: self.speed,
            });
        }
        Ok(())
    }

    /// Change speed, keeping the direction of travel
    pub fn set_speed_keep_direction(&mut self, speed: f32) {
        let angle = self.vel.y.atan2(self.vel.x);
        self.speed = speed;
        self.vel = Vec2::new(speed * angle.cos(), speed * angle.sin());
    }
}

/// Notifications produced by the round controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Bricks removed this tick; `score` already includes the level multiplier
    BricksDestroyed { count: usize, score: u64 },
    LifeLost { lives_remaining: u32 },
    /// Every brick cleared; `level` is the level now starting
    LevelCleared { level: u32 },
    Paused,
    Resumed,
    /// Countdown moved on to the displayed number
    CountdownStep(u32),
    CountdownFinished,
    /// Emitted exactly once per round
    GameOver { final_score: u64 },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub lives: u32,
    pub score: u64,
    pub level: u32,
    pub phase: RoundPhase,
    /// Number to display while counting down
    pub countdown: Option<u32>,
    pub ball: &'a Ball,
    pub paddle: &'a Paddle,
    pub bricks: &'a [Brick],
}

/// One round, from the first serve to game over
#[derive(Debug, Clone)]
pub struct Round {
    pub settings: Settings,
    pub field: Field,
    pub lives: u32,
    pub score: u64,
    pub level: u32,
    pub phase: RoundPhase,
    pub countdown: Countdown,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Live bricks, addressed by index
    pub bricks: Vec<Brick>,
    /// Simulated ticks (countdown and running)
    pub time_ticks: u64,
    /// Seed the rebound RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

/// Session values restored from a save or chosen for a fresh round
#[derive(Debug, Clone)]
pub struct RoundParts {
    pub lives: u32,
    pub score: u64,
    pub level: u32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
}

impl Round {
    /// Start a new round; rejects settings the engine cannot run
    pub fn new(settings: Settings, seed: u64) -> Result<Self, EngineError> {
        settings.validate()?;

        let field = settings.field();
        let level = settings.starting_level;
        let paddle = Paddle::centered(&settings, &field);
        let ball = Ball::spawn(&settings, &field, &paddle, level);
        let bricks = generate_bricks(&settings, &field);

        log::info!(
            "New round (seed {seed}): level {level}, {} bricks",
            bricks.len()
        );

        let parts = RoundParts {
            lives: settings.starting_lives,
            score: 0,
            level,
            paddle,
            ball,
            bricks,
        };
        Ok(Self::assemble(settings, seed, parts))
    }

    /// Rebuild a round from saved parts; validates everything before use
    pub fn restore(settings: Settings, seed: u64, parts: RoundParts) -> Result<Self, EngineError> {
        settings.validate()?;
        parts.ball.check()?;
        parts.paddle.check()?;
        if parts.lives == 0 {
            return Err(EngineError::InvalidSnapshot(
                "saved round has no lives left".to_string(),
            ));
        }
        if parts.level == 0 {
            return Err(EngineError::InvalidSnapshot("level 0".to_string()));
        }
        Ok(Self::assemble(settings, seed, parts))
    }

    fn assemble(settings: Settings, seed: u64, parts: RoundParts) -> Self {
        let mut countdown = Countdown::new(settings.countdown_steps, settings.countdown_step_ticks);
        countdown.start();

        Self {
            field: settings.field(),
            lives: parts.lives,
            score: parts.score,
            level: parts.level,
            phase: RoundPhase::Countdown,
            countdown,
            paddle: parts.paddle,
            ball: parts.ball,
            bricks: parts.bricks,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            settings,
        }
    }

    /// Queue an event for the caller
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    /// View of the current frame for rendering
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            lives: self.lives,
            score: self.score,
            level: self.level,
            phase: self.phase,
            countdown: self.countdown.display(),
            ball: &self.ball,
            paddle: &self.paddle,
            bricks: &self.bricks,
        }
    }

    /// Put a fresh paddle and ball in place for the current level
    pub(crate) fn respawn(&mut self) {
        self.paddle = Paddle::centered(&self.settings, &self.field);
        self.ball = Ball::spawn(&self.settings, &self.field, &self.paddle, self.level);
    }
}
