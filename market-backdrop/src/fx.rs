//! Persisted visual-effects switch

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BackdropError;

pub const ENV_FX_STATE: &str = "BACKDROP_FX_STATE";
const DEFAULT_FILE: &str = "market-backdrop-fx.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FxState {
    #[default]
    On,
    Off,
}

impl FxState {
    pub fn toggled(self) -> Self {
        match self {
            FxState::On => FxState::Off,
            FxState::Off => FxState::On,
        }
    }

    pub fn is_on(self) -> bool {
        self == FxState::On
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FxState::On => "on",
            FxState::Off => "off",
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct FxFile {
    fx: FxState,
}

/// JSON file holding the FX switch between runs
#[derive(Debug, Clone)]
pub struct FxStore {
    path: PathBuf,
}

impl FxStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `BACKDROP_FX_STATE`, or a file in the temp dir
    pub fn from_env() -> Self {
        match std::env::var(ENV_FX_STATE) {
            Ok(path) => Self::new(path),
            Err(_) => Self::new(std::env::temp_dir().join(DEFAULT_FILE)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored state; missing or unreadable files mean `On`
    pub fn load(&self) -> FxState {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no fx state, defaulting on");
                return FxState::On;
            }
        };
        match serde_json::from_str::<FxFile>(&raw) {
            Ok(file) => file.fx,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt fx state, defaulting on");
                FxState::On
            }
        }
    }

    pub fn save(&self, state: FxState) -> Result<(), BackdropError> {
        let file = File::create(&self.path).map_err(|e| self.error(e))?;
        serde_json::to_writer(file, &FxFile { fx: state }).map_err(|e| self.error(e.into()))
    }

    fn error(&self, source: std::io::Error) -> BackdropError {
        BackdropError::FxState {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Flip and persist, returning the new state
    pub fn toggle(&self) -> Result<FxState, BackdropError> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_on() {
        let dir = tempfile::tempdir().unwrap();
        let store = FxStore::new(dir.path().join("fx.json"));
        assert_eq!(store.load(), FxState::On);
    }

    #[test]
    fn test_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = FxStore::new(dir.path().join("fx.json"));
        assert_eq!(store.toggle().unwrap(), FxState::Off);
        assert_eq!(FxStore::new(store.path()).load(), FxState::Off);
        assert_eq!(store.toggle().unwrap(), FxState::On);
        assert_eq!(store.load(), FxState::On);
    }

    #[test]
    fn test_corrupt_file_reads_on() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fx.json");
        std::fs::write(&path, "{ \"fx\": \"sideways\" }").unwrap();
        assert_eq!(FxStore::new(&path).load(), FxState::On);
    }

    #[test]
    fn test_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = FxStore::new(dir.path().join("missing-dir").join("fx.json"));
        let err = store.save(FxState::Off).unwrap_err();
        assert!(matches!(err, BackdropError::FxState { .. }));
        assert!(!err.is_config());
        assert!(err.to_string().starts_with("fx state file"));
    }

    #[test]
    fn test_save_writes_lowercase_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FxStore::new(dir.path().join("fx.json"));
        store.save(FxState::Off).unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), r#"{"fx":"off"}"#);
    }
}
