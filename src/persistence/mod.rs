//! Save/load of an in-progress round
//!
//! Features:
//! - Versioned JSON envelope
//! - All-or-nothing restore: any missing or invalid field rejects the save
//! - Fallback to a fresh round when a save cannot be used

pub mod snapshot;

pub use snapshot::{BallSnapshot, BrickSnapshot, GameSnapshot, PaddleSnapshot, SaveEnvelope};

use serde::Deserialize;

use crate::error::EngineError;
use crate::platform::storage;
use crate::settings::Settings;
use crate::sim::Round;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Storage key for the saved round
pub const SAVE_KEY: &str = "brickout_save";

/// Serialize a round
pub fn to_json(round: &Round) -> Result<String, EngineError> {
    let envelope = SaveEnvelope::from_round(round, SAVE_VERSION);
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parse and validate a save. The restored round starts with a countdown
/// and draws rebounds from `seed`.
pub fn from_json(json: &str, settings: Settings, seed: u64) -> Result<Round, EngineError> {
    #[derive(Deserialize)]
    struct VersionProbe {
        version: u32,
    }

    let probe: VersionProbe = serde_json::from_str(json)?;
    if probe.version != SAVE_VERSION {
        return Err(EngineError::UnsupportedSaveVersion {
            found: probe.version,
            expected: SAVE_VERSION,
        });
    }

    let envelope: SaveEnvelope = serde_json::from_str(json)?;
    let parts = envelope.into_parts(&settings)?;
    Round::restore(settings, seed, parts)
}

/// Save a round under `key`
pub fn save_to(key: &str, round: &Round) -> Result<(), EngineError> {
    storage::save(key, &to_json(round)?)?;
    log::info!(
        "Game saved (level {}, score {}, {} bricks)",
        round.level,
        round.score,
        round.bricks.len()
    );
    Ok(())
}

/// Load the round saved under `key`, `None` if there is none
pub fn load_from(key: &str, settings: Settings, seed: u64) -> Result<Option<Round>, EngineError> {
    let Some(json) = storage::load(key)? else {
        return Ok(None);
    };
    let round = from_json(&json, settings, seed)?;
    log::info!("Loaded saved game at level {}", round.level);
    Ok(Some(round))
}

/// Load the round under `key`, or start a fresh one if it is missing or unusable
pub fn load_or_new_from(key: &str, settings: Settings, seed: u64) -> Result<Round, EngineError> {
    match load_from(key, settings.clone(), seed) {
        Ok(Some(round)) => return Ok(round),
        Ok(None) => log::info!("No saved game found"),
        Err(err) => log::warn!("Discarding saved game: {err}"),
    }
    Round::new(settings, seed)
}

pub fn save(round: &Round) -> Result<(), EngineError> {
    save_to(SAVE_KEY, round)
}

pub fn load(settings: Settings, seed: u64) -> Result<Option<Round>, EngineError> {
    load_from(SAVE_KEY, settings, seed)
}

pub fn load_or_new(settings: Settings, seed: u64) -> Result<Round, EngineError> {
    load_or_new_from(SAVE_KEY, settings, seed)
}

/// Delete the saved round
pub fn clear() -> Result<(), EngineError> {
    storage::remove(SAVE_KEY)?;
    log::info!("Saved game cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RoundPhase, tick};
    use glam::Vec2;

    fn played_round() -> Round {
        let mut round = Round::new(Settings::default(), 77).unwrap();
        for _ in 0..400 {
            let command = crate::sim::autopilot_command(&round);
            crate::sim::apply_command(&mut round, command);
            tick(&mut round);
        }
        round
    }

    #[test]
    fn test_json_roundtrip() {
        let round = played_round();
        let json = to_json(&round).unwrap();
        let restored = from_json(&json, Settings::default(), 5).unwrap();

        assert_eq!(restored.lives, round.lives);
        assert_eq!(restored.score, round.score);
        assert_eq!(restored.level, round.level);
        assert_eq!(restored.paddle.rect, round.paddle.rect);
        assert_eq!(restored.ball.vel, round.ball.vel);
        assert!((restored.ball.body.center - round.ball.body.center).length() < 1e-3);
        assert_eq!(restored.bricks, round.bricks);
        assert_eq!(restored.phase, RoundPhase::Countdown);
        assert_eq!(restored.seed, 5);
    }

    #[test]
    fn test_missing_field_rejected() {
        let round = Round::new(Settings::default(), 1).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&to_json(&round).unwrap()).unwrap();
        value["ball"]
            .as_object_mut()
            .unwrap()
            .remove("speed");
        let json = value.to_string();
        assert!(matches!(
            from_json(&json, Settings::default(), 1),
            Err(EngineError::Json(_))
        ));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let round = Round::new(Settings::default(), 1).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&to_json(&round).unwrap()).unwrap();
        value["version"] = serde_json::json!(99);
        assert!(matches!(
            from_json(&value.to_string(), Settings::default(), 1),
            Err(EngineError::UnsupportedSaveVersion { found: 99, expected: 1 })
        ));
    }

    #[test]
    fn test_garbage_falls_back_to_new_round() {
        let key = "persistence_test_garbage";
        storage::save(key, "not json at all").unwrap();
        let round = load_or_new_from(key, Settings::default(), 9).unwrap();
        assert_eq!(round.level, 1);
        assert_eq!(round.score, 0);
        assert_eq!(round.bricks.len(), 40);
        storage::remove(key).unwrap();
    }

    #[test]
    fn test_motionless_ball_save_falls_back() {
        let round = Round::new(Settings::default(), 1).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&to_json(&round).unwrap()).unwrap();
        value["ball"]["x_velocity"] = serde_json::json!(0.0);
        value["ball"]["y_velocity"] = serde_json::json!(0.0);
        value["game"]["score"] = serde_json::json!(900);
        let json = value.to_string();
        assert!(from_json(&json, Settings::default(), 1).is_err());

        let key = "persistence_test_motionless";
        storage::save(key, &json).unwrap();
        let round = load_or_new_from(key, Settings::default(), 1).unwrap();
        assert_eq!(round.score, 0);
        assert_eq!(round.ball.vel, Vec2::new(0.0, 8.0));
        storage::remove(key).unwrap();
    }

    #[test]
    fn test_save_and_load_by_key() {
        let key = "persistence_test_roundtrip";
        let mut round = Round::new(Settings::default(), 1).unwrap();
        round.score = 1234;
        round.lives = 2;
        round.bricks.truncate(7);
        save_to(key, &round).unwrap();

        let loaded = load_from(key, Settings::default(), 1).unwrap().unwrap();
        assert_eq!(loaded.score, 1234);
        assert_eq!(loaded.lives, 2);
        assert_eq!(loaded.bricks.len(), 7);

        storage::remove(key).unwrap();
        assert!(load_from(key, Settings::default(), 1).unwrap().is_none());
    }
}
