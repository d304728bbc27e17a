//! Engine error type

use std::error::Error;
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum EngineError {
    /// Paddle with a zero, negative or non-finite width
    DegeneratePaddle { width: f32 },
    /// Ball that cannot move or has no extent
    DegenerateBall { radius: f32, speed: f32 },
    /// Settings rejected by validation
    InvalidSettings(&'static str),
    /// Save data that parsed but describes an impossible round
    InvalidSnapshot(String),
    /// Save data written by a different format version
    UnsupportedSaveVersion { found: u32, expected: u32 },
    Json(serde_json::Error),
    Io(std::io::Error),
    /// Platform storage refused the operation
    Storage(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::DegeneratePaddle { width } => {
                write!(f, "degenerate paddle (width {width})")
            }
            EngineError::DegenerateBall { radius, speed } => {
                write!(f, "degenerate ball (radius {radius}, speed {speed})")
            }
            EngineError::InvalidSettings(reason) => write!(f, "invalid settings: {reason}"),
            EngineError::InvalidSnapshot(reason) => write!(f, "invalid save data: {reason}"),
            EngineError::UnsupportedSaveVersion { found, expected } => {
                write!(f, "unsupported save version {found} (expected {expected})")
            }
            EngineError::Json(err) => Display::fmt(err, f),
            EngineError::Io(err) => Display::fmt(err, f),
            EngineError::Storage(reason) => write!(f, "storage error: {reason}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineError::Json(source) => Some(source),
            EngineError::Io(source) => Some(source),
            EngineError::DegeneratePaddle { .. }
            | EngineError::DegenerateBall { .. }
            | EngineError::InvalidSettings(_)
            | EngineError::InvalidSnapshot(_)
            | EngineError::UnsupportedSaveVersion { .. }
            | EngineError::Storage(_) => None,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Json(err)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err)
    }
}
