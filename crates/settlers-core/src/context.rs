//! Per-dispatch request state.

use crate::dice::DiceSource;
use crate::error::{ActionError, NodeKind};
use crate::events::{ActionRequest, Event};
use crate::game::Game;
use crate::player::{Player, PlayerId};
use serde_json::Value;

/// Everything a rule step can see during one dispatch.
///
/// The game and request are shared borrows; the only thing a step can change
/// is the buffered event list, which is handed back only if every step in the
/// chain succeeds.
pub struct RequestContext<'a> {
    game: &'a Game,
    request: &'a ActionRequest,
    dice: &'a mut dyn DiceSource,
    events: Vec<Event>,
}

impl<'a> RequestContext<'a> {
    pub fn new(game: &'a Game, request: &'a ActionRequest, dice: &'a mut dyn DiceSource) -> Self {
        Self {
            game,
            request,
            dice,
            events: Vec::new(),
        }
    }

    pub fn game(&self) -> &'a Game {
        self.game
    }

    pub fn request(&self) -> &'a ActionRequest {
        self.request
    }

    pub fn player_id(&self) -> PlayerId {
        self.request.player_id
    }

    /// The requesting player
    pub fn player(&self) -> Result<&'a Player, ActionError> {
        let id = self.player_id();
        self.game
            .player(id)
            .ok_or(ActionError::not_found(NodeKind::Player, usize::from(id)))
    }

    pub fn data(&self) -> &'a Value {
        &self.request.data
    }

    /// The `buildId` a build request targets
    pub fn build_id(&self) -> Result<usize, ActionError> {
        self.request
            .build_id()
            .ok_or_else(|| ActionError::invalid_move("missing buildId"))
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events buffered so far
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn roll_d6(&mut self) -> u8 {
        self.dice.roll_d6()
    }

    pub(crate) fn into_events(self) -> Vec<Event> {
        self.events
    }
}
