//! Game settings and preferences
//!
//! Stored as JSON next to the game. Arena size is only read when a session
//! starts; changing it means starting a new one.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_FPS;
use crate::sim::boundary::Arena;
use crate::sim::kinds::FluffColor;

/// Maximum number of fluffballs (one per player)
pub const MAX_PLAYERS: u8 = 4;

/// Errors from loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Impossible => "Impossible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "impossible" => Some(Difficulty::Impossible),
            _ => None,
        }
    }

    /// Numeric level, 1 (Easy) to 4 (Impossible)
    pub fn level(&self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Impossible => 4,
        }
    }

    /// Car wheels placed per session
    pub fn hazard_count(&self) -> usize {
        self.level() * 6 - 1
    }

    /// Cats placed per session
    pub fn companion_count(&self) -> usize {
        match self {
            Difficulty::Impossible => 25,
            _ => self.level() * 3,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Number of fluffballs, 1 to 4
    pub players: u8,
    /// Fur colour per player; `None` picks one at random
    pub colors: [Option<FluffColor>; 4],

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Simulation frames per second
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            players: 1,
            colors: [Some(FluffColor::Blue), None, None, None],
            arena_width: 1430.0,
            arena_height: 800.0,
            fps: DEFAULT_FPS,
        }
    }
}

impl Settings {
    /// Player count clamped to what the arena supports
    pub fn player_count(&self) -> usize {
        self.players.clamp(1, MAX_PLAYERS) as usize
    }

    /// Arena bounds for a new session
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width.max(1.0), self.arena_height.max(1.0))
    }

    /// Seconds per simulation frame
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
