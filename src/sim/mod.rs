//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bricks by index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod countdown;
pub mod geom;
pub mod state;
pub mod tick;

pub use collision::{BallStep, BrickHit, Edge, PaddleContact, rebound_angle, rebound_offset};
pub use countdown::{Countdown, CountdownStatus};
pub use geom::{Circle, Field, Rect};
pub use state::{
    Ball, Brick, Frame, GameEvent, MoveDirection, Paddle, Round, RoundParts, RoundPhase,
};
pub use tick::{Command, apply_command, autopilot_command, generate_bricks, tick};
