//! On-disk layout of a saved round
//!
//! Every field is required; a save missing any key is rejected as a whole.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::settings::Settings;
use crate::sim::{Ball, Brick, Circle, Paddle, Rect, Round, RoundParts};

/// Versioned save file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub game: GameSnapshot,
    pub paddle: PaddleSnapshot,
    pub ball: BallSnapshot,
    pub bricks: Vec<BrickSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub lives: u32,
    pub score: u64,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleSnapshot {
    pub left_x: f32,
    pub top_y: f32,
    pub right_x: f32,
    pub bottom_y: f32,
    pub width: f32,
    pub height: f32,
    pub colour: String,
    pub canvas_gap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub x_velocity: f32,
    pub y_velocity: f32,
    pub speed: f32,
    pub bounces_until_speed_up: u32,
    pub speed_up_amount: f32,
    pub radius: f32,
    pub left_x: f32,
    pub top_y: f32,
    pub right_x: f32,
    pub bottom_y: f32,
    pub colour: String,
    pub paddle_gap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickSnapshot {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub score: u32,
    pub colour: String,
}

/// Position tolerance when cross-checking redundant fields
const EPSILON: f32 = 1e-3;

fn invalid(reason: impl Into<String>) -> EngineError {
    EngineError::InvalidSnapshot(reason.into())
}

/// Rect from saved edges without the constructor's debug check
fn rect_from_edges(left: f32, top: f32, right: f32, bottom: f32, what: &str) -> Result<Rect, EngineError> {
    let rect = Rect {
        left,
        top,
        right,
        bottom,
    };
    if !rect.is_well_formed() {
        return Err(invalid(format!("{what} has malformed bounds")));
    }
    Ok(rect)
}

impl SaveEnvelope {
    /// Capture the persistent parts of a round
    pub fn from_round(round: &Round, version: u32) -> Self {
        let settings = &round.settings;
        let paddle = &round.paddle;
        let ball = &round.ball;
        let ball_bounds = ball.bounds();

        Self {
            version,
            game: GameSnapshot {
                lives: round.lives,
                score: round.score,
                level: round.level,
            },
            paddle: PaddleSnapshot {
                left_x: paddle.rect.left,
                top_y: paddle.rect.top,
                right_x: paddle.rect.right,
                bottom_y: paddle.rect.bottom,
                width: paddle.width,
                height: paddle.rect.height(),
                colour: paddle.colour.clone(),
                canvas_gap: settings.paddle_canvas_gap,
            },
            ball: BallSnapshot {
                x_velocity: ball.vel.x,
                y_velocity: ball.vel.y,
                speed: ball.speed,
                bounces_until_speed_up: ball.bounces_until_speed_up,
                speed_up_amount: ball.speed_up_amount,
                radius: ball.body.radius,
                left_x: ball_bounds.left,
                top_y: ball_bounds.top,
                right_x: ball_bounds.right,
                bottom_y: ball_bounds.bottom,
                colour: ball.colour.clone(),
                paddle_gap: settings.ball_paddle_gap,
            },
            bricks: round
                .bricks
                .iter()
                .map(|brick| BrickSnapshot {
                    x: brick.rect.left,
                    y: brick.rect.top,
                    width: brick.rect.width(),
                    height: brick.rect.height(),
                    score: brick.score,
                    colour: brick.colour.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild round parts, checking every value before it is used
    pub fn into_parts(self, settings: &Settings) -> Result<RoundParts, EngineError> {
        let level = self.game.level;
        if level == 0 {
            return Err(invalid("level 0"));
        }

        let paddle = self.paddle.into_paddle(settings)?;
        let ball = self.ball.into_ball(settings, level)?;
        let bricks = self
            .bricks
            .into_iter()
            .enumerate()
            .map(|(i, brick)| brick.into_brick(i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RoundParts {
            lives: self.game.lives,
            score: self.game.score,
            level,
            paddle,
            ball,
            bricks,
        })
    }
}

impl PaddleSnapshot {
    fn into_paddle(self, settings: &Settings) -> Result<Paddle, EngineError> {
        let rect = rect_from_edges(self.left_x, self.top_y, self.right_x, self.bottom_y, "paddle")?;
        if (rect.height() - self.height).abs() > EPSILON {
            return Err(invalid("paddle height does not match its bounds"));
        }
        let paddle = Paddle {
            rect,
            width: self.width,
            speed: 0.0,
            move_speed: settings.paddle_speed,
            colour: self.colour,
        };
        paddle.check()?;
        Ok(paddle)
    }
}

impl BallSnapshot {
    fn into_ball(self, settings: &Settings, level: u32) -> Result<Ball, EngineError> {
        let bounds = rect_from_edges(self.left_x, self.top_y, self.right_x, self.bottom_y, "ball")?;
        let diameter = 2.0 * self.radius;
        if (bounds.width() - diameter).abs() > EPSILON || (bounds.height() - diameter).abs() > EPSILON {
            return Err(invalid("ball bounds do not match its radius"));
        }
        if !self.speed_up_amount.is_finite() || self.speed_up_amount < 0.0 {
            return Err(invalid("negative speed-up amount"));
        }

        let original = settings.bounces_for_level(level);
        if self.bounces_until_speed_up == 0 || self.bounces_until_speed_up > original {
            return Err(invalid(format!(
                "bounce counter {} outside 1..={original} for level {level}",
                self.bounces_until_speed_up
            )));
        }

        let ball = Ball {
            body: Circle::new(bounds.center(), self.radius),
            vel: Vec2::new(self.x_velocity, self.y_velocity),
            speed: self.speed,
            bounces_until_speed_up: self.bounces_until_speed_up,
            original_bounces_until_speed_up: original,
            speed_up_amount: self.speed_up_amount,
            colour: self.colour,
        };
        ball.check()?;
        // Speed must be the magnitude of the velocity
        if (ball.vel.length() - ball.speed).abs() > EPSILON * ball.speed.max(1.0) {
            return Err(invalid("ball velocity does not match its speed"));
        }
        Ok(ball)
    }
}

impl BrickSnapshot {
    fn into_brick(self, index: usize) -> Result<Brick, EngineError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(invalid(format!("brick {index} has no area")));
        }
        if self.score == 0 {
            return Err(invalid(format!("brick {index} is worth nothing")));
        }
        let rect = rect_from_edges(
            self.x,
            self.y,
            self.x + self.width,
            self.y + self.height,
            "brick",
        )?;
        Ok(Brick::new(rect, self.score, self.colour))
    }
}
