//! Game snapshot and turn bookkeeping.
//!
//! A [`Game`] is read by the rule steps and written only by
//! [`Game::apply`] when a committed event set is replayed.

use crate::board::{BoardGraph, CornerFilter, EdgeFilter};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::player::{costs, Player, PlayerId, ResourceHand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Free initial placement of settlements and roads
    Setup,
    /// Dice-driven play with costed builds
    Playing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => f.write_str("setup"),
            Phase::Playing => f.write_str("playing"),
        }
    }
}

/// Piece kinds a player can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildKind {
    Road,
    Settlement,
    City,
}

impl BuildKind {
    pub fn cost(&self) -> ResourceHand {
        match self {
            BuildKind::Road => costs::road(),
            BuildKind::Settlement => costs::settlement(),
            BuildKind::City => costs::city(),
        }
    }
}

/// Per-player caps on pieces on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub roads: u32,
    pub settlements: u32,
    pub cities: u32,
}

impl Allowance {
    pub fn cap(&self, kind: BuildKind) -> u32 {
        match kind {
            BuildKind::Road => self.roads,
            BuildKind::Settlement => self.settlements,
            BuildKind::City => self.cities,
        }
    }
}

impl Default for Allowance {
    fn default() -> Self {
        Self {
            roads: 15,
            settlements: 5,
            cities: 4,
        }
    }
}

/// Snapshot carried by `start-turn` and `end-turn` events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnData {
    pub turn: u32,
    pub phase: Phase,
    pub current_player: PlayerId,
}

/// Who plays which turn.
///
/// Seats place in order for the first round of setup and in reverse for the
/// second, then play round-robin from the first seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSchedule {
    seats: Vec<PlayerId>,
}

impl TurnSchedule {
    pub fn new(seats: Vec<PlayerId>) -> Self {
        Self { seats }
    }

    /// Number of setup turns (two per seat)
    pub fn setup_turns(&self) -> u32 {
        2 * self.seats.len() as u32
    }

    pub fn data_for_turn(&self, turn: u32) -> TurnData {
        let n = self.seats.len() as u32;
        let (phase, seat) = if n == 0 || turn == 0 {
            (Phase::Setup, 0)
        } else if turn <= n {
            (Phase::Setup, turn - 1)
        } else if turn <= 2 * n {
            (Phase::Setup, 2 * n - turn)
        } else {
            (Phase::Playing, (turn - 2 * n - 1) % n)
        };

        TurnData {
            turn,
            phase,
            current_player: self.seats.get(seat as usize).copied().unwrap_or_default(),
        }
    }
}

/// The complete game snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Turn number; 0 until the first `start-turn` is applied
    pub turn: u32,
    pub phase: Phase,
    pub current_player: PlayerId,
    /// Seats in turn order
    pub players: Vec<Player>,
    pub board: BoardGraph,
    pub allowance: Allowance,
    /// Last dice roll replayed
    pub last_roll: Option<(u8, u8)>,
    schedule: TurnSchedule,
}

impl Game {
    pub fn new(players: Vec<Player>, board: BoardGraph, allowance: Allowance) -> Self {
        let schedule = TurnSchedule::new(players.iter().map(|p| p.id).collect());
        let opening = schedule.data_for_turn(0);

        Self {
            turn: opening.turn,
            phase: opening.phase,
            current_player: opening.current_player,
            players,
            board,
            allowance,
            last_roll: None,
            schedule,
        }
    }

    /// Seat the configured players around a standard board
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let players = config
            .players
            .iter()
            .enumerate()
            .map(|(seat, name)| Player::new(seat as PlayerId, name.clone()))
            .collect();
        let board = match config.seed {
            Some(seed) => BoardGraph::standard_with_rng(&mut StdRng::seed_from_u64(seed)),
            None => BoardGraph::standard(),
        };

        Ok(Self::new(players, board, config.allowance))
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Turn snapshot for any turn number
    pub fn data_for_turn(&self, turn: u32) -> TurnData {
        self.schedule.data_for_turn(turn)
    }

    /// Pieces of `kind` that `player` has on the board.
    ///
    /// Upgrading to a city frees the settlement piece, so settlements count
    /// standing settlements only.
    pub fn owned_count(&self, player: PlayerId, kind: BuildKind) -> usize {
        match kind {
            BuildKind::Road => self.board.query_edges(&EdgeFilter::owned_by(player)).len(),
            BuildKind::Settlement => self
                .board
                .query_corners(&CornerFilter::owned_by(player).settlement(true))
                .len(),
            BuildKind::City => self
                .board
                .query_corners(&CornerFilter::owned_by(player).city(true))
                .len(),
        }
    }
}
