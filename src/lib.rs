//! Brickout - a paddle-and-ball brick breaker
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (paddle, ball, bricks, round controller)
//! - `persistence`: Save/load of an in-progress round
//! - `platform`: Native/browser differences (logging, storage, clock)
//! - `settings`: Data-driven game tuning
//! - `highscores`: Top-10 leaderboard

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::EngineError;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation cadence (ticks per second)
    pub const TICK_HZ: u32 = 60;

    /// Field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 150.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Gap between the bottom of the field and the bottom of the paddle
    pub const PADDLE_CANVAS_GAP: f32 = 40.0;
    /// Pixels per tick while a move key is held
    pub const PADDLE_SPEED: f32 = 15.0;
    pub const PADDLE_COLOUR: &str = "#FFFFFF";

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Gap between the paddle top and the centre of a freshly spawned ball
    pub const BALL_PADDLE_GAP: f32 = 200.0;
    pub const BALL_SPEED: f32 = 8.0;
    pub const BOUNCES_UNTIL_SPEED_UP: u32 = 3;
    pub const SPEED_UP_AMOUNT: f32 = 1.0;
    /// Per-level multiplier applied to ball speed and speed-up amount
    pub const LEVEL_SPEED_SCALE: f32 = 1.2;
    pub const BALL_COLOUR: &str = "#FFFFFF";

    /// Brick layout defaults
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICKS_PER_ROW: u32 = 10;
    /// Empty rows (in brick heights) above the first brick row
    pub const ROW_GAP_FROM_TOP: u32 = 4;
    pub const BRICK_SCORE: u32 = 10;
    pub const BRICK_COLOURS: [&str; 4] = ["#FF0000", "#FFA500", "#FFFF00", "#008000"];

    /// Session defaults
    pub const STARTING_LIVES: u32 = 3;
    pub const STARTING_LEVEL: u32 = 1;

    /// Countdown before play resumes: 3 steps, half a second each
    pub const COUNTDOWN_STEPS: u32 = 3;
    pub const COUNTDOWN_STEP_TICKS: u32 = TICK_HZ / 2;

    /// Rebound angles are clamped to this range (degrees)
    pub const MIN_REBOUND_ANGLE: f32 = 20.0;
    pub const MAX_REBOUND_ANGLE: f32 = 160.0;
    /// Draw cap for the near-vertical rebound offset
    pub const MAX_REJECTION_SAMPLES: u32 = 64;
}
