//! Rule steps.
//!
//! Each step is a plain function over the request context: it reads the game,
//! optionally appends events, and either succeeds or rejects the whole request.
//! Steps never mutate the game itself.

use crate::board::{CornerFilter, CornerId, EdgeFilter, EdgeId, TileFilter};
use crate::context::RequestContext;
use crate::error::ActionError;
use crate::events::{BuildPayload, DiceRoll, Distribution, Event};
use crate::game::{BuildKind, Phase};
use crate::player::ResourceHand;
use serde_json::Value;

/// The roll that produces nothing
pub const ROBBER_TOTAL: u8 = 7;

/// Setup settlements (and setup roads) each player places
const SETUP_PIECES: usize = 2;

/// One link in an action chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    IsCurrentPlayer,
    HasResources(ResourceHand),
    HasAllowance(BuildKind),
    InitRoad,
    InitSettlement,
    BuildRoad,
    BuildSettlement,
    BuildCity,
    OfferTrade,
    EndTurn,
    RollDice,
    DistributeResources(u8),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::IsCurrentPlayer => "isCurrentPlayer",
            Step::HasResources(_) => "hasResources",
            Step::HasAllowance(_) => "hasAllowance",
            Step::InitRoad => "initRoad",
            Step::InitSettlement => "initSettlement",
            Step::BuildRoad => "buildRoad",
            Step::BuildSettlement => "buildSettlement",
            Step::BuildCity => "buildCity",
            Step::OfferTrade => "offerTrade",
            Step::EndTurn => "endTurn",
            Step::RollDice => "rollDice",
            Step::DistributeResources(_) => "distributeResources",
        }
    }

    pub fn run(&self, ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
        match *self {
            Step::IsCurrentPlayer => is_current_player(ctx),
            Step::HasResources(cost) => has_resources(ctx, &cost),
            Step::HasAllowance(kind) => has_allowance(ctx, kind),
            Step::InitRoad => init_road(ctx),
            Step::InitSettlement => init_settlement(ctx),
            Step::BuildRoad => build_road(ctx),
            Step::BuildSettlement => build_settlement(ctx),
            Step::BuildCity => build_city(ctx),
            Step::OfferTrade => offer_trade(ctx),
            Step::EndTurn => end_turn(ctx),
            Step::RollDice => roll_dice(ctx),
            Step::DistributeResources(total) => distribute_resources(ctx, total),
        }
    }
}

// ==================== Checks ====================

pub fn is_current_player(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    if ctx.player_id() != ctx.game().current_player {
        return Err(ActionError::NotCurrentPlayer);
    }
    Ok(())
}

pub fn has_resources(ctx: &mut RequestContext<'_>, cost: &ResourceHand) -> Result<(), ActionError> {
    if !ctx.player()?.resources.can_afford(cost) {
        return Err(ActionError::InsufficientResources);
    }
    Ok(())
}

pub fn has_allowance(ctx: &mut RequestContext<'_>, kind: BuildKind) -> Result<(), ActionError> {
    let game = ctx.game();
    let owned = game.owned_count(ctx.player_id(), kind);
    if owned >= game.allowance.cap(kind) as usize {
        return Err(ActionError::InvalidAllowance);
    }
    Ok(())
}

// ==================== Setup placement ====================

pub fn init_settlement(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let board = &ctx.game().board;
    let player = ctx.player_id();

    if board.query_corners(&CornerFilter::owned_by(player)).len() >= SETUP_PIECES {
        return Err(ActionError::invalid_move("both setup settlements are placed"));
    }

    let id = ctx.build_id()?;
    let corner = board.corner(CornerId(id))?;
    if !board.corner_is_buildable(corner) {
        return Err(ActionError::InvalidBuildSpot);
    }

    ctx.add_event(Event::BuildSettlement(BuildPayload::new(player, id)));
    Ok(())
}

/// Place a free road next to a settlement with no roads yet.
///
/// The second setup road also credits one unit per resource tile around the
/// settlement it leaves from.
pub fn init_road(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let board = &ctx.game().board;
    let player = ctx.player_id();

    let owned_edges = board.query_edges(&EdgeFilter::owned_by(player)).len();
    if owned_edges >= SETUP_PIECES {
        return Err(ActionError::invalid_move("both setup roads are placed"));
    }

    let id = ctx.build_id()?;
    let edge = board.edge(EdgeId(id))?;
    if !edge.is_buildable() {
        return Err(ActionError::InvalidBuildSpot);
    }

    let anchor = board
        .adjacent_corners(edge)
        .find(|corner| {
            corner.owner() == Some(player) && board.adjacent_edges(corner).all(|e| e.is_buildable())
        })
        .ok_or_else(|| ActionError::invalid_move("road can only be built next to the last settlement"))?;

    ctx.add_event(Event::BuildRoad(BuildPayload::new(player, id)));

    if owned_edges == SETUP_PIECES - 1 {
        let mut hand = ResourceHand::new();
        for resource in board.adjacent_tiles(anchor).filter_map(|t| t.resource()) {
            hand.add(resource, 1);
        }
        let mut credit = Distribution::new();
        credit.insert(player, hand);
        ctx.add_event(Event::DistributeResources(credit));
    }

    Ok(())
}

// ==================== Costed building ====================

pub fn build_road(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let board = &ctx.game().board;
    let player = ctx.player_id();
    let id = ctx.build_id()?;
    let target = board.edge(EdgeId(id))?.id;

    if !board.buildable_edges_for(player).iter().any(|e| e.id == target) {
        return Err(ActionError::InvalidBuildSpot);
    }

    ctx.add_event(Event::BuildRoad(BuildPayload::new(player, id)));
    Ok(())
}

pub fn build_settlement(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let board = &ctx.game().board;
    let player = ctx.player_id();
    let id = ctx.build_id()?;
    let target = board.corner(CornerId(id))?.id;

    if !board.buildable_corners_for(player).iter().any(|c| c.id == target) {
        return Err(ActionError::InvalidBuildSpot);
    }

    ctx.add_event(Event::BuildSettlement(BuildPayload::new(player, id)));
    Ok(())
}

pub fn build_city(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let board = &ctx.game().board;
    let player = ctx.player_id();
    let id = ctx.build_id()?;
    let corner = board.corner(CornerId(id))?;

    if corner.owner() != Some(player) {
        return Err(ActionError::invalid_move("corner is not owned by the player"));
    }
    if !corner.has_settlement() {
        return Err(ActionError::InvalidBuildSpot);
    }

    ctx.add_event(Event::BuildCity(BuildPayload::new(player, id)));
    Ok(())
}

// ==================== Trade ====================

/// Pass the offer through, stamped with the offering player
pub fn offer_trade(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let mut offer = ctx
        .data()
        .as_object()
        .cloned()
        .ok_or_else(|| ActionError::invalid_move("trade offer must be an object"))?;
    offer.insert("playerId".to_string(), Value::from(ctx.player_id()));

    ctx.add_event(Event::TradeOffer(offer));
    Ok(())
}

// ==================== Turns and dice ====================

/// Close the current turn and open the next.
///
/// Entering (or staying in) the playing phase rolls the dice in the same
/// commit set.
pub fn end_turn(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let game = ctx.game();
    let ending = game.data_for_turn(game.turn);
    let starting = game.data_for_turn(game.turn + 1);

    ctx.add_event(Event::EndTurn(ending));
    ctx.add_event(Event::StartTurn(starting));

    if starting.phase != Phase::Playing {
        return Ok(());
    }
    roll_dice(ctx)
}

pub fn roll_dice(ctx: &mut RequestContext<'_>) -> Result<(), ActionError> {
    let die1 = ctx.roll_d6();
    let die2 = ctx.roll_d6();
    let total = die1 + die2;

    ctx.add_event(Event::DiceRoll(DiceRoll { die1, die2, total }));

    if total == ROBBER_TOTAL {
        return Ok(());
    }
    distribute_resources(ctx, total)
}

/// Credit every building around the tiles that produce on `total`
pub fn distribute_resources(ctx: &mut RequestContext<'_>, total: u8) -> Result<(), ActionError> {
    let game = ctx.game();
    let board = &game.board;

    let mut credit: Distribution = game
        .players
        .iter()
        .map(|p| (p.id, ResourceHand::new()))
        .collect();

    for tile in board.query_tiles(&TileFilter::producing_on(total)) {
        let Some(resource) = tile.resource() else {
            continue;
        };
        for corner in board.tile_corners(tile) {
            let Some(owner) = corner.owner() else {
                continue;
            };
            if let Some(hand) = credit.get_mut(&owner) {
                hand.add(resource, corner.building.yield_multiplier());
            }
        }
    }

    ctx.add_event(Event::DistributeResources(credit));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardGraph, Resource};
    use crate::dice::ScriptedDice;
    use crate::events::{ActionRequest, ActionType};
    use crate::game::{Allowance, Game};
    use crate::layout::{HexCoord, TileSpec};
    use crate::player::{costs, Player};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Two players around one brick tile rolling on 8
    fn game() -> Game {
        let board = BoardGraph::from_tiles(&[TileSpec::resource(HexCoord::new(0, 0), Resource::Brick, 8)]);
        let mut game = Game::new(
            vec![Player::new(0, "A"), Player::new(1, "B")],
            board,
            Allowance::default(),
        );
        game.turn = 1;
        game
    }

    fn playing() -> Game {
        let mut game = game();
        game.turn = 5;
        game.phase = Phase::Playing;
        game
    }

    fn run(game: &Game, request: ActionRequest, step: Step, faces: &[u8]) -> Result<Vec<Event>, ActionError> {
        let mut dice = ScriptedDice::new(faces.iter().copied());
        let mut ctx = RequestContext::new(game, &request, &mut dice);
        step.run(&mut ctx)?;
        Ok(ctx.into_events())
    }

    fn build(player: u8, action: ActionType, id: usize) -> ActionRequest {
        ActionRequest::build(player, action, id)
    }

    #[test]
    fn test_is_current_player() {
        let game = game();
        assert_eq!(run(&game, ActionRequest::end_turn(0), Step::IsCurrentPlayer, &[]), Ok(vec![]));
        assert_eq!(
            run(&game, ActionRequest::end_turn(1), Step::IsCurrentPlayer, &[]),
            Err(ActionError::NotCurrentPlayer)
        );
    }

    #[test]
    fn test_has_resources() {
        let mut game = playing();
        let step = Step::HasResources(costs::road());
        let request = build(0, ActionType::BuildRoad, 0);
        assert_eq!(
            run(&game, request.clone(), step, &[]),
            Err(ActionError::InsufficientResources)
        );

        game.players[0].resources = ResourceHand::with_amounts(1, 0, 1, 0, 0);
        assert_eq!(run(&game, request, step, &[]), Ok(vec![]));
    }

    #[test]
    fn test_has_allowance_at_cap() {
        let mut game = playing();
        game.allowance.roads = 1;
        let step = Step::HasAllowance(BuildKind::Road);
        let request = build(0, ActionType::BuildRoad, 1);
        assert_eq!(run(&game, request.clone(), step, &[]), Ok(vec![]));

        game.board.place_road(EdgeId(0), 0).unwrap();
        assert_eq!(run(&game, request, step, &[]), Err(ActionError::InvalidAllowance));
    }

    #[test]
    fn test_city_frees_settlement_allowance() {
        let mut game = playing();
        game.allowance.settlements = 1;
        game.board.place_settlement(CornerId(0), 0).unwrap();
        let step = Step::HasAllowance(BuildKind::Settlement);
        let request = build(0, ActionType::BuildSettlement, 3);
        assert_eq!(run(&game, request.clone(), step, &[]), Err(ActionError::InvalidAllowance));

        game.board.upgrade_to_city(CornerId(0), 0).unwrap();
        assert_eq!(run(&game, request, step, &[]), Ok(vec![]));
    }

    #[test]
    fn test_init_settlement() {
        let mut game = game();
        let events = run(&game, build(0, ActionType::BuildSettlement, 0), Step::InitSettlement, &[]).unwrap();
        assert_eq!(events, vec![Event::BuildSettlement(BuildPayload::new(0, 0))]);

        game.board.place_settlement(CornerId(0), 0).unwrap();
        assert_eq!(
            run(&game, build(0, ActionType::BuildSettlement, 1), Step::InitSettlement, &[]),
            Err(ActionError::InvalidBuildSpot),
            "next to an existing settlement"
        );

        game.board.place_settlement(CornerId(3), 0).unwrap();
        assert!(matches!(
            run(&game, build(0, ActionType::BuildSettlement, 2), Step::InitSettlement, &[]),
            Err(ActionError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_init_settlement_unknown_corner() {
        let game = game();
        assert!(matches!(
            run(&game, build(0, ActionType::BuildSettlement, 60), Step::InitSettlement, &[]),
            Err(ActionError::NotFound { id: 60, .. })
        ));
    }

    #[test]
    fn test_first_setup_road_grants_nothing() {
        let mut game = game();
        game.board.place_settlement(CornerId(0), 0).unwrap();
        let events = run(&game, build(0, ActionType::BuildRoad, 0), Step::InitRoad, &[]).unwrap();
        assert_eq!(events, vec![Event::BuildRoad(BuildPayload::new(0, 0))]);
    }

    #[test]
    fn test_second_setup_road_grants_resources() {
        let mut game = game();
        game.board.place_settlement(CornerId(0), 0).unwrap();
        game.board.place_road(EdgeId(0), 0).unwrap();
        game.board.place_settlement(CornerId(3), 0).unwrap();

        let events = run(&game, build(0, ActionType::BuildRoad, 3), Step::InitRoad, &[]).unwrap();

        let mut credit = Distribution::new();
        credit.insert(0, ResourceHand::single(Resource::Brick, 1));
        assert_eq!(
            events,
            vec![
                Event::BuildRoad(BuildPayload::new(0, 3)),
                Event::DistributeResources(credit),
            ]
        );
    }

    #[test]
    fn test_setup_road_must_leave_fresh_settlement() {
        let mut game = game();
        game.board.place_settlement(CornerId(0), 0).unwrap();
        game.board.place_road(EdgeId(0), 0).unwrap();

        // Corner 0 already has a road, and edge 2 touches no settlement
        assert!(matches!(
            run(&game, build(0, ActionType::BuildRoad, 5), Step::InitRoad, &[]),
            Err(ActionError::InvalidMove(_))
        ));
        assert!(matches!(
            run(&game, build(0, ActionType::BuildRoad, 2), Step::InitRoad, &[]),
            Err(ActionError::InvalidMove(_))
        ));
        assert_eq!(
            run(&game, build(0, ActionType::BuildRoad, 0), Step::InitRoad, &[]),
            Err(ActionError::InvalidBuildSpot)
        );
    }

    #[test]
    fn test_build_road_needs_connection() {
        let mut game = playing();
        game.board.place_settlement(CornerId(0), 0).unwrap();

        assert_eq!(
            run(&game, build(0, ActionType::BuildRoad, 0), Step::BuildRoad, &[]),
            Ok(vec![Event::BuildRoad(BuildPayload::new(0, 0))])
        );
        assert_eq!(
            run(&game, build(0, ActionType::BuildRoad, 2), Step::BuildRoad, &[]),
            Err(ActionError::InvalidBuildSpot)
        );
    }

    #[test]
    fn test_build_settlement_needs_road_and_spacing() {
        let mut game = playing();
        game.board.place_settlement(CornerId(0), 0).unwrap();
        game.board.place_road(EdgeId(0), 0).unwrap();

        assert_eq!(
            run(&game, build(0, ActionType::BuildSettlement, 1), Step::BuildSettlement, &[]),
            Err(ActionError::InvalidBuildSpot)
        );

        game.board.place_road(EdgeId(1), 0).unwrap();
        assert_eq!(
            run(&game, build(0, ActionType::BuildSettlement, 2), Step::BuildSettlement, &[]),
            Ok(vec![Event::BuildSettlement(BuildPayload::new(0, 2))])
        );
    }

    #[test]
    fn test_build_city() {
        let mut game = playing();
        game.board.place_settlement(CornerId(0), 0).unwrap();
        game.board.place_settlement(CornerId(3), 1).unwrap();

        assert_eq!(
            run(&game, build(0, ActionType::BuildCity, 0), Step::BuildCity, &[]),
            Ok(vec![Event::BuildCity(BuildPayload::new(0, 0))])
        );
        assert!(matches!(
            run(&game, build(0, ActionType::BuildCity, 3), Step::BuildCity, &[]),
            Err(ActionError::InvalidMove(_))
        ));
        assert!(matches!(
            run(&game, build(0, ActionType::BuildCity, 2), Step::BuildCity, &[]),
            Err(ActionError::InvalidMove(_))
        ));

        game.board.upgrade_to_city(CornerId(0), 0).unwrap();
        assert_eq!(
            run(&game, build(0, ActionType::BuildCity, 0), Step::BuildCity, &[]),
            Err(ActionError::InvalidBuildSpot)
        );
    }

    #[test]
    fn test_offer_trade_stamps_player() {
        let game = playing();
        let request = ActionRequest::new(0, ActionType::TradeOffer, json!({"give": {"ore": 1}, "want": {"wool": 2}}));
        let events = run(&game, request, Step::OfferTrade, &[]).unwrap();

        assert_eq!(events.len(), 1);
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(
            json,
            json!({"type": "trade-offer", "payload": {"give": {"ore": 1}, "want": {"wool": 2}, "playerId": 0}})
        );

        let request = ActionRequest::new(0, ActionType::TradeOffer, json!([1, 2]));
        assert!(matches!(
            run(&game, request, Step::OfferTrade, &[]),
            Err(ActionError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_end_turn_within_setup() {
        let game = game();
        let events = run(&game, ActionRequest::end_turn(0), Step::EndTurn, &[]).unwrap();
        assert_eq!(
            events,
            vec![
                Event::EndTurn(game.data_for_turn(1)),
                Event::StartTurn(game.data_for_turn(2)),
            ]
        );
    }

    #[test]
    fn test_end_turn_into_play_rolls() {
        let mut game = game();
        game.turn = 4;
        game.current_player = 0;
        let events = run(&game, ActionRequest::end_turn(0), Step::EndTurn, &[2, 3]).unwrap();

        let kinds: Vec<&str> = events.iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            vec!["end-turn", "start-turn", "DiceRoll", "distribute-resources"]
        );
        assert_eq!(events[1], Event::StartTurn(game.data_for_turn(5)));
        assert_eq!(
            events[2],
            Event::DiceRoll(DiceRoll {
                die1: 2,
                die2: 3,
                total: 5
            })
        );
    }

    #[test]
    fn test_seven_skips_distribution() {
        let game = playing();
        let events = run(&game, ActionRequest::end_turn(0), Step::RollDice, &[3, 4]).unwrap();
        assert_eq!(
            events,
            vec![Event::DiceRoll(DiceRoll {
                die1: 3,
                die2: 4,
                total: 7
            })]
        );
    }

    #[test]
    fn test_distribution_doubles_cities_and_zero_fills() {
        let mut game = playing();
        game.board.place_settlement(CornerId(0), 0).unwrap();
        game.board.place_settlement(CornerId(3), 0).unwrap();
        game.board.upgrade_to_city(CornerId(3), 0).unwrap();

        let events = run(&game, ActionRequest::end_turn(0), Step::DistributeResources(8), &[]).unwrap();

        let mut credit = Distribution::new();
        credit.insert(0, ResourceHand::single(Resource::Brick, 3));
        credit.insert(1, ResourceHand::new());
        assert_eq!(events, vec![Event::DistributeResources(credit)]);
    }

    #[test]
    fn test_distribution_on_barren_roll() {
        let mut game = playing();
        game.board.place_settlement(CornerId(0), 1).unwrap();

        let events = run(&game, ActionRequest::end_turn(0), Step::DistributeResources(4), &[]).unwrap();
        let Event::DistributeResources(credit) = &events[0] else {
            panic!("expected a distribution, got {:?}", events[0]);
        };
        assert_eq!(credit.len(), 2);
        assert!(credit.values().all(ResourceHand::is_empty));
    }
}
