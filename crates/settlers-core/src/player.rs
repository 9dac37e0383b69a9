//! Players and their resource ledgers.
//!
//! This module contains:
//! - `Player`, the seat identity plus its resource hand
//! - `ResourceHand`, counts per resource with has/add/subtract arithmetic
//! - Build costs

use crate::board::Resource;
use crate::error::ActionError;
use serde::{Deserialize, Serialize};

/// Player identifier (seat index, 0-3)
pub type PlayerId = u8;

/// A seat at the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub resources: ResourceHand,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            resources: ResourceHand::new(),
        }
    }
}

/// A bundle of resource counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub brick: u32,
    pub grain: u32,
    pub lumber: u32,
    pub ore: u32,
    pub wool: u32,
}

impl ResourceHand {
    /// An empty hand
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amounts(brick: u32, grain: u32, lumber: u32, ore: u32, wool: u32) -> Self {
        Self {
            brick,
            grain,
            lumber,
            ore,
            wool,
        }
    }

    /// A hand holding `amount` of a single resource
    pub fn single(resource: Resource, amount: u32) -> Self {
        let mut hand = Self::new();
        hand.add(resource, amount);
        hand
    }

    pub fn total(&self) -> u32 {
        Resource::ALL.iter().map(|&r| self.get(r)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Grain => self.grain,
            Resource::Lumber => self.lumber,
            Resource::Ore => self.ore,
            Resource::Wool => self.wool,
        }
    }

    fn slot(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Brick => &mut self.brick,
            Resource::Grain => &mut self.grain,
            Resource::Lumber => &mut self.lumber,
            Resource::Ore => &mut self.ore,
            Resource::Wool => &mut self.wool,
        }
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        *self.slot(resource) += amount;
    }

    pub fn add_hand(&mut self, other: &ResourceHand) {
        for r in Resource::ALL {
            self.add(r, other.get(r));
        }
    }

    /// Whether every amount in `cost` is covered
    pub fn can_afford(&self, cost: &ResourceHand) -> bool {
        Resource::ALL.iter().all(|&r| self.get(r) >= cost.get(r))
    }

    /// Remove `cost`, leaving the hand untouched if it does not cover it
    pub fn subtract(&mut self, cost: &ResourceHand) -> Result<(), ActionError> {
        if !self.can_afford(cost) {
            return Err(ActionError::InsufficientResources);
        }
        for r in Resource::ALL {
            *self.slot(r) -= cost.get(r);
        }
        Ok(())
    }
}

/// Build costs
pub mod costs {
    use super::ResourceHand;

    /// 1 brick, 1 lumber
    pub fn road() -> ResourceHand {
        ResourceHand::with_amounts(1, 0, 1, 0, 0)
    }

    /// 1 brick, 1 grain, 1 lumber, 1 wool
    pub fn settlement() -> ResourceHand {
        ResourceHand::with_amounts(1, 1, 1, 0, 1)
    }

    /// 2 grain, 3 ore
    pub fn city() -> ResourceHand {
        ResourceHand::with_amounts(0, 2, 0, 3, 0)
    }
}
