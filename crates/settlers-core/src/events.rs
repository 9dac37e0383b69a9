//! Action requests coming in and events going out.
//!
//! Requests arrive as `{playerId, type, data}`; a successful dispatch answers
//! with an ordered commit set of [`Event`]s, each serialized as
//! `{"type": ..., "payload": ...}`.

use crate::game::TurnData;
use crate::player::{PlayerId, ResourceHand};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Kinds of request a player can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    EndTurn,
    TradeOffer,
    BuildRoad,
    BuildSettlement,
    BuildCity,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::EndTurn => "end-turn",
            ActionType::TradeOffer => "trade-offer",
            ActionType::BuildRoad => "build-road",
            ActionType::BuildSettlement => "build-settlement",
            ActionType::BuildCity => "build-city",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incoming player action.
///
/// `type` must be one of the five [`ActionType`] names; any other string is a
/// deserialization error, raised before the request reaches a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub action: ActionType,
    /// `{buildId}` for builds, offer fields for trades
    #[serde(default)]
    pub data: Value,
}

impl ActionRequest {
    pub fn new(player_id: PlayerId, action: ActionType, data: Value) -> Self {
        Self {
            player_id,
            action,
            data,
        }
    }

    /// A build request targeting `build_id`
    pub fn build(player_id: PlayerId, action: ActionType, build_id: usize) -> Self {
        Self::new(player_id, action, json!({ "buildId": build_id }))
    }

    pub fn end_turn(player_id: PlayerId) -> Self {
        Self::new(player_id, ActionType::EndTurn, Value::Null)
    }

    /// The numeric `buildId` field, if present
    pub fn build_id(&self) -> Option<usize> {
        self.data
            .get("buildId")
            .and_then(Value::as_u64)
            .and_then(|id| usize::try_from(id).ok())
    }
}

/// Payload of the three build events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPayload {
    pub player_id: PlayerId,
    pub build_id: usize,
}

impl BuildPayload {
    pub fn new(player_id: PlayerId, build_id: usize) -> Self {
        Self {
            player_id,
            build_id,
        }
    }
}

/// Faces and sum of a dice roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die1: u8,
    pub die2: u8,
    pub total: u8,
}

/// Credits per player, zero-filled for every seat on a dice roll
pub type Distribution = BTreeMap<PlayerId, ResourceHand>;

/// Player ids as map keys.
///
/// JSON object keys are strings, and a buffered payload (an adjacently tagged
/// event read back from a `Value`) hands them over as such, so both the
/// string and the numeric form are accepted.
mod player_keys {
    use super::*;

    #[derive(PartialEq, Eq, PartialOrd, Ord)]
    struct PlayerKey(PlayerId);

    struct PlayerKeyVisitor;

    impl<'de> Visitor<'de> for PlayerKeyVisitor {
        type Value = PlayerKey;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a player id as a number or a numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<PlayerKey, E> {
            PlayerId::try_from(v)
                .map(PlayerKey)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<PlayerKey, E> {
            PlayerId::try_from(v)
                .map(PlayerKey)
                .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<PlayerKey, E> {
            v.parse()
                .map(PlayerKey)
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    impl<'de> Deserialize<'de> for PlayerKey {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(PlayerKeyVisitor)
        }
    }

    pub fn serialize<S: Serializer>(credit: &Distribution, serializer: S) -> Result<S::Ok, S::Error> {
        credit.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Distribution, D::Error> {
        let keyed = BTreeMap::<PlayerKey, ResourceHand>::deserialize(deserializer)?;
        Ok(keyed.into_iter().map(|(PlayerKey(id), hand)| (id, hand)).collect())
    }
}

/// A committed fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    #[serde(rename = "build-road")]
    BuildRoad(BuildPayload),

    #[serde(rename = "build-settlement")]
    BuildSettlement(BuildPayload),

    #[serde(rename = "build-city")]
    BuildCity(BuildPayload),

    /// Offer fields as sent, plus the offering `playerId`
    #[serde(rename = "trade-offer")]
    TradeOffer(Map<String, Value>),

    #[serde(rename = "start-turn")]
    StartTurn(TurnData),

    #[serde(rename = "end-turn")]
    EndTurn(TurnData),

    #[serde(rename = "DiceRoll")]
    DiceRoll(DiceRoll),

    #[serde(rename = "distribute-resources", with = "player_keys")]
    DistributeResources(Distribution),
}

impl Event {
    /// Wire name of the event
    pub fn kind(&self) -> &'static str {
        match self {
            Event::BuildRoad(_) => "build-road",
            Event::BuildSettlement(_) => "build-settlement",
            Event::BuildCity(_) => "build-city",
            Event::TradeOffer(_) => "trade-offer",
            Event::StartTurn(_) => "start-turn",
            Event::EndTurn(_) => "end-turn",
            Event::DiceRoll(_) => "DiceRoll",
            Event::DistributeResources(_) => "distribute-resources",
        }
    }
}
