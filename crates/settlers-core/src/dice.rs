//! Dice sources.
//!
//! Rule steps never touch an RNG directly; they ask a [`DiceSource`] for one
//! face at a time, so tests can script exact rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A uniform six-sided die
pub trait DiceSource {
    /// A face in `1..=6`
    fn roll_d6(&mut self) -> u8;
}

/// Dice backed by a standard RNG
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible rolls
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DiceSource for RandomDice {
    fn roll_d6(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// Replays a fixed list of faces, wrapping around at the end
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Faces outside `1..=6` are clamped into range
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().map(|f| f.clamp(1, 6)).collect(),
            next: 0,
        }
    }
}

impl DiceSource for ScriptedDice {
    fn roll_d6(&mut self) -> u8 {
        let Some(&face) = self.faces.get(self.next) else {
            return 1;
        };
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_faces_in_range() {
        let mut dice = RandomDice::seeded(42);
        for _ in 0..500 {
            assert!((1..=6).contains(&dice.roll_d6()));
        }
    }

    #[test]
    fn test_seeded_dice_repeat() {
        let mut a = RandomDice::seeded(7);
        let mut b = RandomDice::seeded(7);
        let rolls_a: Vec<u8> = (0..20).map(|_| a.roll_d6()).collect();
        let rolls_b: Vec<u8> = (0..20).map(|_| b.roll_d6()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_scripted_faces_cycle() {
        let mut dice = ScriptedDice::new([3, 4, 9]);
        let rolls: Vec<u8> = (0..5).map(|_| dice.roll_d6()).collect();
        assert_eq!(rolls, vec![3, 4, 6, 3, 4]);
    }

    #[test]
    fn test_empty_script_rolls_one() {
        let mut dice = ScriptedDice::default();
        assert_eq!(dice.roll_d6(), 1);
        assert_eq!(dice.roll_d6(), 1);
    }
}
