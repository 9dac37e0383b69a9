//! Applying committed events to a game.
//!
//! Rule steps only describe changes; this is where a commit set turns into a
//! new snapshot.

use crate::board::{CornerId, EdgeId};
use crate::error::{ActionError, NodeKind};
use crate::events::{BuildPayload, Event};
use crate::game::{BuildKind, Game, Phase};

impl Game {
    /// Apply a single committed event
    pub fn apply(&mut self, event: &Event) -> Result<(), ActionError> {
        match event {
            Event::BuildRoad(build) => self.place(build, BuildKind::Road),
            Event::BuildSettlement(build) => self.place(build, BuildKind::Settlement),
            Event::BuildCity(build) => self.place(build, BuildKind::City),
            Event::DistributeResources(credit) => {
                for (&id, hand) in credit {
                    self.player_mut(id)
                        .ok_or(ActionError::not_found(NodeKind::Player, usize::from(id)))?
                        .resources
                        .add_hand(hand);
                }
                Ok(())
            }
            Event::StartTurn(data) => {
                if data.turn <= self.turn {
                    return Err(ActionError::invalid_move(format!(
                        "turn {} does not follow turn {}",
                        data.turn, self.turn
                    )));
                }
                self.turn = data.turn;
                self.phase = data.phase;
                self.current_player = data.current_player;
                Ok(())
            }
            Event::DiceRoll(roll) => {
                self.last_roll = Some((roll.die1, roll.die2));
                Ok(())
            }
            Event::EndTurn(_) | Event::TradeOffer(_) => Ok(()),
        }
    }

    /// Apply a commit set in order, all or nothing
    pub fn apply_all(&mut self, events: &[Event]) -> Result<(), ActionError> {
        let mut next = self.clone();
        for event in events {
            next.apply(event)?;
        }
        *self = next;
        Ok(())
    }

    /// Place a piece, charging its cost outside of setup
    fn place(&mut self, build: &BuildPayload, kind: BuildKind) -> Result<(), ActionError> {
        let id = build.player_id;
        let cost = kind.cost();
        let charge = self.phase == Phase::Playing;

        if charge {
            let player = self
                .player(id)
                .ok_or(ActionError::not_found(NodeKind::Player, usize::from(id)))?;
            if !player.resources.can_afford(&cost) {
                return Err(ActionError::InsufficientResources);
            }
        }

        match kind {
            BuildKind::Road => self.board.place_road(EdgeId(build.build_id), id)?,
            BuildKind::Settlement => self.board.place_settlement(CornerId(build.build_id), id)?,
            BuildKind::City => self.board.upgrade_to_city(CornerId(build.build_id), id)?,
        }

        match self.player_mut(id) {
            Some(player) if charge => player.resources.subtract(&cost),
            _ => Ok(()),
        }
    }
}
