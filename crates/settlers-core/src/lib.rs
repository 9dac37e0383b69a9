//! Settlers - action dispatch core for a settlement-building board game
//!
//! This crate validates player actions and turns them into events:
//! - Board graph of corners, edges and tiles with adjacency queries
//! - Resource hands, build costs and allowances
//! - A route table mapping each action and game phase to a chain of rule steps
//! - Fail-fast chain execution with all-or-nothing event commit
//! - Dice rolls and resource distribution
//!
//! # Flow
//!
//! A [`Controller`] takes the current [`Game`] snapshot and an
//! [`ActionRequest`], selects the matching chain from its [`ActionRegistry`]
//! and returns either the commit set of [`Event`]s or an [`ActionError`].
//! The caller applies the commit set with [`Game::apply_all`] before handing
//! in the next request.
//!
//! # Modules
//!
//! - [`layout`]: Axial hex coordinates and the standard board layout
//! - [`board`]: The corner/edge/tile graph
//! - [`player`]: Players and resource hands
//! - [`game`]: Game snapshot, phases and turn schedule
//! - [`rules`]: Individual rule steps
//! - [`registry`]: Route table and dispatch

pub mod board;
pub mod config;
pub mod context;
pub mod controller;
pub mod dice;
pub mod error;
pub mod events;
pub mod executor;
pub mod game;
pub mod layout;
pub mod player;
pub mod registry;
mod replay;
pub mod rules;

// Re-export commonly used types
pub use board::{BoardGraph, Corner, CornerBuilding, CornerId, Edge, EdgeId, Resource, Tile, TileId, TileKind};
pub use config::GameConfig;
pub use context::RequestContext;
pub use controller::Controller;
pub use dice::{DiceSource, RandomDice, ScriptedDice};
pub use error::{ActionError, ConfigError, NodeKind};
pub use events::{ActionRequest, ActionType, BuildPayload, DiceRoll, Distribution, Event};
pub use executor::Chain;
pub use game::{Allowance, BuildKind, Game, Phase, TurnData, TurnSchedule};
pub use player::{Player, PlayerId, ResourceHand};
pub use registry::{ActionRegistry, PhaseGuard, Route};
pub use rules::Step;
