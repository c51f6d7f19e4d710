//! High-score storage backends

use crate::error::StorageError;
use crate::highscores::HighScoreStore;

/// LocalStorage key, shared with earlier browser builds of the table
pub const HIGH_SCORE_KEY: &str = "highScore";

#[cfg(not(target_arch = "wasm32"))]
pub use native::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Record {
        high_score: u32,
    }

    /// High score kept in a small JSON file
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl HighScoreStore for JsonFileStore {
        fn load(&self) -> Result<u32, StorageError> {
            let json = match std::fs::read_to_string(&self.path) {
                Ok(json) => json,
                // First run
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
                Err(e) => return Err(e.into()),
            };
            let record: Record =
                serde_json::from_str(&json).map_err(|e| StorageError::Corrupt(e.to_string()))?;
            Ok(record.high_score)
        }

        fn save(&mut self, high_score: u32) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&Record { high_score })
                .map_err(|e| StorageError::Corrupt(e.to_string()))?;
            std::fs::write(&self.path, json)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::*;

    /// High score in the browser's LocalStorage
    #[derive(Debug, Clone, Default)]
    pub struct LocalStore;

    impl LocalStore {
        fn storage() -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
                .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
        }
    }

    impl HighScoreStore for LocalStore {
        fn load(&self) -> Result<u32, StorageError> {
            let value = Self::storage()?
                .get_item(HIGH_SCORE_KEY)
                .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?;
            match value {
                None => Ok(0),
                Some(text) => text
                    .trim()
                    .parse()
                    .map_err(|_| StorageError::Corrupt(text.clone())),
            }
        }

        fn save(&mut self, high_score: u32) -> Result<(), StorageError> {
            Self::storage()?
                .set_item(HIGH_SCORE_KEY, &high_score.to_string())
                .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
        }
    }
}
