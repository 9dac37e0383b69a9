//! Routing of action requests to rule chains.

use crate::context::RequestContext;
use crate::dice::DiceSource;
use crate::error::ActionError;
use crate::events::{ActionRequest, ActionType, Event};
use crate::executor::Chain;
use crate::game::{BuildKind, Game, Phase};
use crate::rules::Step;
use tracing::debug;

/// When a route applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseGuard {
    Any,
    Only(Phase),
}

impl PhaseGuard {
    pub fn admits(&self, game: &Game) -> bool {
        match self {
            PhaseGuard::Any => true,
            PhaseGuard::Only(phase) => game.phase == *phase,
        }
    }
}

/// One registered handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub action: ActionType,
    pub guard: PhaseGuard,
    pub chain: Chain,
}

/// Routes in registration order; the first admitting route wins
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    routes: Vec<Route>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, action: ActionType, guard: PhaseGuard, chain: impl Into<Chain>) -> &mut Self {
        self.routes.push(Route {
            action,
            guard,
            chain: chain.into(),
        });
        self
    }

    /// The game's route table
    pub fn standard() -> Self {
        use Step::*;

        let mut registry = Self::new();
        registry
            .register(ActionType::EndTurn, PhaseGuard::Any, vec![IsCurrentPlayer, EndTurn])
            .register(ActionType::TradeOffer, PhaseGuard::Any, vec![IsCurrentPlayer, OfferTrade])
            .register(
                ActionType::BuildRoad,
                PhaseGuard::Only(Phase::Setup),
                vec![IsCurrentPlayer, InitRoad, EndTurn],
            )
            .register(
                ActionType::BuildRoad,
                PhaseGuard::Only(Phase::Playing),
                vec![
                    IsCurrentPlayer,
                    HasResources(BuildKind::Road.cost()),
                    HasAllowance(BuildKind::Road),
                    BuildRoad,
                ],
            )
            .register(
                ActionType::BuildSettlement,
                PhaseGuard::Only(Phase::Setup),
                vec![IsCurrentPlayer, InitSettlement],
            )
            .register(
                ActionType::BuildSettlement,
                PhaseGuard::Only(Phase::Playing),
                vec![
                    IsCurrentPlayer,
                    HasResources(BuildKind::Settlement.cost()),
                    HasAllowance(BuildKind::Settlement),
                    BuildSettlement,
                ],
            )
            .register(
                ActionType::BuildCity,
                PhaseGuard::Only(Phase::Playing),
                vec![
                    IsCurrentPlayer,
                    HasResources(BuildKind::City.cost()),
                    HasAllowance(BuildKind::City),
                    BuildCity,
                ],
            );
        registry
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route for `action` whose guard admits the game
    pub fn select(&self, game: &Game, action: ActionType) -> Result<&Route, ActionError> {
        self.routes
            .iter()
            .find(|route| route.action == action && route.guard.admits(game))
            .ok_or(ActionError::UnknownAction {
                action,
                phase: game.phase,
            })
    }

    /// Select a chain for the request and run it
    pub fn dispatch(
        &self,
        game: &Game,
        request: &ActionRequest,
        dice: &mut dyn DiceSource,
    ) -> Result<Vec<Event>, ActionError> {
        let route = self.select(game, request.action)?;
        debug!(
            action = %request.action,
            guard = ?route.guard,
            steps = route.chain.steps().len(),
            "route selected"
        );
        route.chain.execute(RequestContext::new(game, request, dice))
    }
}
