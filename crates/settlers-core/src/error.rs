//! Rejections and configuration failures.
//!
//! Every rule step either succeeds or returns an [`ActionError`]; its
//! `Display` text is the rejection string handed back to the requesting
//! player.

use crate::events::ActionType;
use crate::game::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of node (or participant) an id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Corner,
    Edge,
    Tile,
    Player,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Corner => "corner",
            NodeKind::Edge => "edge",
            NodeKind::Tile => "tile",
            NodeKind::Player => "player",
        };
        f.write_str(name)
    }
}

/// Reasons an action request is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ActionError {
    #[error("Not current player")]
    NotCurrentPlayer,

    #[error("User does not have allowance for this request")]
    InvalidAllowance,

    #[error("User does not have required resources")]
    InsufficientResources,

    #[error("Not a valid building spot")]
    InvalidBuildSpot,

    #[error("Not a valid move: {0}")]
    InvalidMove(String),

    #[error("No handler for {action} during the {phase} phase")]
    UnknownAction { action: ActionType, phase: Phase },

    #[error("No {kind} with id {id}")]
    NotFound { kind: NodeKind, id: usize },
}

impl ActionError {
    pub(crate) fn invalid_move(reason: impl Into<String>) -> Self {
        ActionError::InvalidMove(reason.into())
    }

    pub(crate) fn not_found(kind: NodeKind, id: usize) -> Self {
        ActionError::NotFound { kind, id }
    }
}

/// Errors raised while loading or validating a [`GameConfig`](crate::config::GameConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("a game needs 2-4 players, got {0}")]
    PlayerCount(usize),
}
