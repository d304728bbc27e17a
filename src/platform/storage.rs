//! Key/value storage for saves, settings and high scores
//!
//! Native builds keep one JSON file per key under `$BRICKOUT_DATA_DIR`
//! (default `assets/`). Web builds use LocalStorage.

use crate::error::EngineError;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use crate::error::EngineError;

    /// Environment variable overriding the data directory
    pub const DATA_DIR_VAR: &str = "BRICKOUT_DATA_DIR";

    pub fn data_dir() -> PathBuf {
        std::env::var_os(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir)
    }

    #[cfg(not(test))]
    fn default_data_dir() -> PathBuf {
        PathBuf::from("assets")
    }

    // Unit tests keep their files out of the checkout
    #[cfg(test)]
    fn default_data_dir() -> PathBuf {
        std::env::temp_dir().join(format!("brickout-test-{}", std::process::id()))
    }

    fn path_for(key: &str) -> PathBuf {
        data_dir().join(format!("{key}.json"))
    }

    pub fn load(key: &str) -> Result<Option<String>, EngineError> {
        match fs::read_to_string(path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(key: &str, value: &str) -> Result<(), EngineError> {
        let path = path_for(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        // Write beside the target, then swap it in
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn remove(key: &str) -> Result<(), EngineError> {
        match fs::remove_file(path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use crate::error::EngineError;

    fn local_storage() -> Result<web_sys::Storage, EngineError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| EngineError::Storage("LocalStorage unavailable".to_string()))
    }

    pub fn load(key: &str) -> Result<Option<String>, EngineError> {
        local_storage()?
            .get_item(key)
            .map_err(|err| EngineError::Storage(format!("get {key}: {err:?}")))
    }

    pub fn save(key: &str, value: &str) -> Result<(), EngineError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|err| EngineError::Storage(format!("set {key}: {err:?}")))
    }

    pub fn remove(key: &str) -> Result<(), EngineError> {
        local_storage()?
            .remove_item(key)
            .map_err(|err| EngineError::Storage(format!("remove {key}: {err:?}")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
use native as backend;
#[cfg(not(target_arch = "wasm32"))]
pub use native::{DATA_DIR_VAR, data_dir};
#[cfg(target_arch = "wasm32")]
use web as backend;

/// Read the value stored under `key`, `None` if nothing is stored
pub fn load(key: &str) -> Result<Option<String>, EngineError> {
    backend::load(key)
}

/// Store `value` under `key`, replacing any previous value
pub fn save(key: &str, value: &str) -> Result<(), EngineError> {
    backend::save(key, value)
}

/// Delete `key`; missing keys are not an error
pub fn remove(key: &str) -> Result<(), EngineError> {
    backend::remove(key)
}
