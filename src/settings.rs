//! Game tuning and preferences
//!
//! Persisted separately from game saves. Missing fields fall back to the
//! defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::EngineError;
use crate::platform::storage;
use crate::sim::Field;

/// Tuning for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the bottom of the field and the bottom of the paddle
    pub paddle_canvas_gap: f32,
    /// Pixels per tick while moving
    pub paddle_speed: f32,
    pub paddle_colour: String,

    // === Ball ===
    pub ball_radius: f32,
    /// Gap between the paddle top and the centre of a new ball
    pub ball_paddle_gap: f32,
    /// Level 1 ball speed, also the target of the speed reset command
    pub ball_speed: f32,
    pub bounces_until_speed_up: u32,
    pub speed_up_amount: f32,
    /// Per-level multiplier for ball speed and speed-up amount
    pub level_speed_scale: f32,
    pub ball_colour: String,

    // === Bricks ===
    pub brick_height: f32,
    pub bricks_per_row: u32,
    pub row_gap_from_top: u32,
    /// Score of the bottom row; each row above is worth one more multiple
    pub brick_score: u32,
    /// One row per colour, top row first
    pub brick_colours: Vec<String>,

    // === Session ===
    pub starting_lives: u32,
    pub starting_level: u32,
    pub countdown_steps: u32,
    pub countdown_step_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_canvas_gap: PADDLE_CANVAS_GAP,
            paddle_speed: PADDLE_SPEED,
            paddle_colour: PADDLE_COLOUR.to_string(),

            ball_radius: BALL_RADIUS,
            ball_paddle_gap: BALL_PADDLE_GAP,
            ball_speed: BALL_SPEED,
            bounces_until_speed_up: BOUNCES_UNTIL_SPEED_UP,
            speed_up_amount: SPEED_UP_AMOUNT,
            level_speed_scale: LEVEL_SPEED_SCALE,
            ball_colour: BALL_COLOUR.to_string(),

            brick_height: BRICK_HEIGHT,
            bricks_per_row: BRICKS_PER_ROW,
            row_gap_from_top: ROW_GAP_FROM_TOP,
            brick_score: BRICK_SCORE,
            brick_colours: BRICK_COLOURS.iter().map(|c| c.to_string()).collect(),

            starting_lives: STARTING_LIVES,
            starting_level: STARTING_LEVEL,
            countdown_steps: COUNTDOWN_STEPS,
            countdown_step_ticks: COUNTDOWN_STEP_TICKS,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "brickout_settings";

    pub fn field(&self) -> Field {
        Field::new(self.field_width, self.field_height)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), EngineError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.field_width) || !positive(self.field_height) {
            return Err(EngineError::InvalidSettings("field must have a positive size"));
        }
        if !positive(self.paddle_width) {
            return Err(EngineError::DegeneratePaddle {
                width: self.paddle_width,
            });
        }
        if self.paddle_width > self.field_width {
            return Err(EngineError::InvalidSettings("paddle is wider than the field"));
        }
        if !positive(self.paddle_height) || !positive(self.paddle_speed) {
            return Err(EngineError::InvalidSettings(
                "paddle height and speed must be positive",
            ));
        }
        if !positive(self.ball_radius) || !positive(self.ball_speed) {
            return Err(EngineError::DegenerateBall {
                radius: self.ball_radius,
                speed: self.ball_speed,
            });
        }
        if 2.0 * self.ball_radius > self.field_width {
            return Err(EngineError::InvalidSettings("ball is wider than the field"));
        }
        if self.bounces_until_speed_up == 0 {
            return Err(EngineError::InvalidSettings(
                "bounces_until_speed_up must be at least 1",
            ));
        }
        if !self.speed_up_amount.is_finite() || self.speed_up_amount < 0.0 {
            return Err(EngineError::InvalidSettings(
                "speed_up_amount must not be negative",
            ));
        }
        if !positive(self.level_speed_scale) {
            return Err(EngineError::InvalidSettings("level_speed_scale must be positive"));
        }
        if self.bricks_per_row == 0 || self.brick_colours.is_empty() {
            return Err(EngineError::InvalidSettings("brick field would be empty"));
        }
        if !positive(self.brick_height) || self.brick_score == 0 {
            return Err(EngineError::InvalidSettings(
                "bricks need a positive height and score",
            ));
        }
        if self.starting_lives == 0 || self.starting_level == 0 {
            return Err(EngineError::InvalidSettings(
                "a round starts with at least one life on level 1 or later",
            ));
        }
        if self.countdown_steps == 0 || self.countdown_step_ticks == 0 {
            return Err(EngineError::InvalidSettings("countdown must last at least one tick"));
        }
        Ok(())
    }

    /// Growth factor applied on `level` (1 on the first level)
    fn level_factor(&self, level: u32) -> f32 {
        self.level_speed_scale.powi(level.saturating_sub(1) as i32)
    }

    /// Initial ball speed on `level`
    pub fn ball_speed_for_level(&self, level: u32) -> f32 {
        self.ball_speed * self.level_factor(level)
    }

    /// Speed added on each speed-up during `level`
    pub fn speed_up_amount_for_level(&self, level: u32) -> f32 {
        self.speed_up_amount * self.level_factor(level)
    }

    /// Paddle bounces between speed-ups on `level`; shrinks as levels rise, never below 1
    pub fn bounces_for_level(&self, level: u32) -> u32 {
        (self.bounces_until_speed_up + 1)
            .saturating_sub(level)
            .max(1)
    }

    /// Load settings from storage, falling back to defaults on any problem
    pub fn load() -> Self {
        match storage::load(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => {
                        log::info!("Loaded settings");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
                },
                Err(err) => log::warn!("Ignoring unreadable settings: {err}"),
            },
            Ok(None) => {}
            Err(err) => log::warn!("Could not read settings: {err}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save(&self) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self)?;
        storage::save(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
