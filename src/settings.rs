//! Game settings and preferences
//!
//! Stored as JSON next to the score log. Missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highscores::{DEFAULT_LEADERBOARD_SIZE, sanitize_player_name};
use crate::persistence::PersistenceError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name stored with each score record
    pub player_name: String,
    /// Fixed RNG seed; `None` derives one from the wall clock per run
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Scores ===
    /// Append-only score log
    pub score_file: PathBuf,
    /// Entries shown on the game-over leaderboard
    pub leaderboard_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            score_file: PathBuf::from("scores.txt"),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl Settings {
    /// Player name as it will be stored
    pub fn display_name(&self) -> String {
        sanitize_player_name(&self.player_name)
    }

    /// Clamp volumes into range
    pub fn normalized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Read settings from `path`
    pub fn read_from(path: &Path) -> Result<Self, PersistenceError> {
        let json = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|e| PersistenceError::json(path, e))?;
        Ok(settings.normalized())
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_from(path: &Path) -> Self {
        match Self::read_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(PersistenceError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| PersistenceError::json(path, e))?;
        fs::write(path, json).map_err(|e| PersistenceError::io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}
