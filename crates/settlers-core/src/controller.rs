//! Entry points for a running game.
//!
//! The [`Controller`] owns the route table and the dice. It never holds the
//! game: callers pass the current snapshot in, get a commit set back, and
//! apply it (see [`Game::apply_all`]) before the next request.

use crate::dice::{DiceSource, RandomDice};
use crate::error::ActionError;
use crate::events::{ActionRequest, Event};
use crate::game::Game;
use crate::registry::ActionRegistry;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Controller<D = RandomDice> {
    registry: ActionRegistry,
    dice: D,
}

impl Controller<RandomDice> {
    /// Standard routes with entropy-seeded dice
    pub fn new() -> Self {
        Self::with_dice(RandomDice::from_entropy())
    }
}

impl Default for Controller<RandomDice> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DiceSource> Controller<D> {
    pub fn with_dice(dice: D) -> Self {
        Self {
            registry: ActionRegistry::standard(),
            dice,
        }
    }

    pub fn with_registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Opening events: the first `start-turn`, unless the game is already under way
    pub fn start(&self, game: &Game) -> Vec<Event> {
        if game.turn >= 1 {
            return Vec::new();
        }
        let opening = game.data_for_turn(1);
        info!("Starting game, player {} opens", opening.current_player);
        vec![Event::StartTurn(opening)]
    }

    /// Validate a request against `game` and return its commit set.
    ///
    /// On rejection nothing is returned but the error; its `Display` text is
    /// the message for the requesting player.
    pub fn dispatch(&mut self, game: &Game, request: &ActionRequest) -> Result<Vec<Event>, ActionError> {
        match self.registry.dispatch(game, request, &mut self.dice) {
            Ok(events) => {
                info!(
                    "Turn {}: {} from player {} committed {} event(s)",
                    game.turn,
                    request.action,
                    request.player_id,
                    events.len()
                );
                Ok(events)
            }
            Err(e) => {
                warn!(
                    "Turn {}: rejected {} from player {}: {}",
                    game.turn, request.action, request.player_id, e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardGraph;
    use crate::dice::ScriptedDice;
    use crate::events::ActionType;
    use crate::game::{Allowance, Phase};
    use crate::player::Player;
    use crate::registry::PhaseGuard;
    use crate::rules::Step;

    fn game() -> Game {
        Game::new(
            vec![Player::new(0, "A"), Player::new(1, "B")],
            BoardGraph::default(),
            Allowance::default(),
        )
    }

    #[test]
    fn test_start_once() {
        let controller = Controller::with_dice(ScriptedDice::default());
        let mut game = game();

        let events = controller.start(&game);
        assert_eq!(events, vec![Event::StartTurn(game.data_for_turn(1))]);

        game.apply_all(&events).unwrap();
        assert!(controller.start(&game).is_empty());
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = ActionRegistry::new();
        registry.register(ActionType::EndTurn, PhaseGuard::Only(Phase::Playing), vec![Step::EndTurn]);
        let mut controller = Controller::with_dice(ScriptedDice::default()).with_registry(registry);

        assert!(matches!(
            controller.dispatch(&game(), &ActionRequest::end_turn(0)),
            Err(ActionError::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_default_controller_routes() {
        let controller: Controller = Controller::default();
        assert_eq!(controller.registry().routes().len(), 7);
    }
}
