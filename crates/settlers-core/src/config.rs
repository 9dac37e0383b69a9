//! Game configuration.
//!
//! Every field has a default, so `{}` is a valid config for a four-player
//! game on a random board.

use crate::error::ConfigError;
use crate::game::Allowance;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Most seats a board supports
pub const MAX_PLAYERS: usize = 4;
/// Fewest seats a game needs
pub const MIN_PLAYERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Display names in seat order
    pub players: Vec<String>,
    pub allowance: Allowance,
    /// Board layout seed; a fresh random layout when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: (1..=MAX_PLAYERS).map(|n| format!("Player {n}")).collect(),
            allowance: Allowance::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players.len()) {
            return Err(ConfigError::PlayerCount(self.players.len()));
        }
        Ok(())
    }
}
