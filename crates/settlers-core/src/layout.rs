//! Axial hex coordinates and the standard board layout.
//!
//! Coordinates exist only to wire up the [`BoardGraph`](crate::board::BoardGraph)
//! arena once at setup; rule code never sees them.
//!
//! With pointy-top hexes every corner is the north or south pole of exactly
//! one hex, so `(hex, pole)` names a corner without any canonicalization. An
//! edge is shared by two hexes and is always stored from the hex with the
//! smaller `(q, r)`.

use crate::board::{Resource, TileKind};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top or bottom corner of a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pole {
    North,
    South,
}

/// One of the six sides of a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

impl Side {
    /// Clockwise from the north-east side
    pub const ALL: [Side; 6] = [
        Side::NorthEast,
        Side::East,
        Side::SouthEast,
        Side::SouthWest,
        Side::West,
        Side::NorthWest,
    ];

    pub fn opposite(self) -> Side {
        match self {
            Side::NorthEast => Side::SouthWest,
            Side::East => Side::West,
            Side::SouthEast => Side::NorthWest,
            Side::SouthWest => Side::NorthEast,
            Side::West => Side::East,
            Side::NorthWest => Side::SouthEast,
        }
    }
}

/// Axial hex coordinate; `q` grows east, `r` grows south-east
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The hex across the given side
    pub fn neighbor(&self, side: Side) -> HexCoord {
        match side {
            Side::East => HexCoord::new(self.q + 1, self.r),
            Side::NorthEast => HexCoord::new(self.q + 1, self.r - 1),
            Side::NorthWest => HexCoord::new(self.q, self.r - 1),
            Side::West => HexCoord::new(self.q - 1, self.r),
            Side::SouthWest => HexCoord::new(self.q - 1, self.r + 1),
            Side::SouthEast => HexCoord::new(self.q, self.r + 1),
        }
    }

    pub fn neighbors(&self) -> [HexCoord; 6] {
        Side::ALL.map(|side| self.neighbor(side))
    }

    /// Corners clockwise from the north pole.
    ///
    /// Only the north and south poles belong to this hex; the other four are
    /// poles of neighbouring hexes.
    pub fn corners(&self) -> [CornerCoord; 6] {
        [
            CornerCoord::new(*self, Pole::North),
            CornerCoord::new(self.neighbor(Side::NorthEast), Pole::South),
            CornerCoord::new(self.neighbor(Side::SouthEast), Pole::North),
            CornerCoord::new(*self, Pole::South),
            CornerCoord::new(self.neighbor(Side::SouthWest), Pole::North),
            CornerCoord::new(self.neighbor(Side::NorthWest), Pole::South),
        ]
    }

    /// Edges clockwise from the north-east side
    pub fn edges(&self) -> [EdgeCoord; 6] {
        Side::ALL.map(|side| EdgeCoord::new(*self, side))
    }
}

/// A corner named by the hex whose pole it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CornerCoord {
    pub hex: HexCoord,
    pub pole: Pole,
}

impl CornerCoord {
    pub fn new(hex: HexCoord, pole: Pole) -> Self {
        Self { hex, pole }
    }
}

/// An edge named from the smaller of its two hexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeCoord {
    pub hex: HexCoord,
    pub side: Side,
}

impl EdgeCoord {
    pub fn new(hex: HexCoord, side: Side) -> Self {
        let other = hex.neighbor(side);
        if hex <= other {
            Self { hex, side }
        } else {
            Self {
                hex: other,
                side: side.opposite(),
            }
        }
    }

    /// The two corners this edge joins
    pub fn endpoints(&self) -> [CornerCoord; 2] {
        let h = self.hex;
        match self.side {
            Side::NorthEast => [
                CornerCoord::new(h, Pole::North),
                CornerCoord::new(h.neighbor(Side::NorthEast), Pole::South),
            ],
            Side::East => [
                CornerCoord::new(h.neighbor(Side::NorthEast), Pole::South),
                CornerCoord::new(h.neighbor(Side::SouthEast), Pole::North),
            ],
            Side::SouthEast => [
                CornerCoord::new(h.neighbor(Side::SouthEast), Pole::North),
                CornerCoord::new(h, Pole::South),
            ],
            Side::SouthWest => [
                CornerCoord::new(h, Pole::South),
                CornerCoord::new(h.neighbor(Side::SouthWest), Pole::North),
            ],
            Side::West => [
                CornerCoord::new(h.neighbor(Side::SouthWest), Pole::North),
                CornerCoord::new(h.neighbor(Side::NorthWest), Pole::South),
            ],
            Side::NorthWest => [
                CornerCoord::new(h.neighbor(Side::NorthWest), Pole::South),
                CornerCoord::new(h, Pole::North),
            ],
        }
    }
}

/// Description of one tile before the graph is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub coord: HexCoord,
    pub kind: TileKind,
    pub value: Option<u8>,
}

impl TileSpec {
    pub fn resource(coord: HexCoord, resource: Resource, value: u8) -> Self {
        Self {
            coord,
            kind: TileKind::Resource(resource),
            value: Some(value),
        }
    }

    pub fn desert(coord: HexCoord) -> Self {
        Self {
            coord,
            kind: TileKind::Desert,
            value: None,
        }
    }
}

/// The 19 land hexes: centre, inner ring, outer ring
pub const STANDARD_LAND: [HexCoord; 19] = [
    HexCoord::new(0, 0),
    HexCoord::new(1, 0),
    HexCoord::new(1, -1),
    HexCoord::new(0, -1),
    HexCoord::new(-1, 0),
    HexCoord::new(-1, 1),
    HexCoord::new(0, 1),
    HexCoord::new(2, 0),
    HexCoord::new(2, -1),
    HexCoord::new(2, -2),
    HexCoord::new(1, -2),
    HexCoord::new(0, -2),
    HexCoord::new(-1, -1),
    HexCoord::new(-2, 0),
    HexCoord::new(-2, 1),
    HexCoord::new(-2, 2),
    HexCoord::new(-1, 2),
    HexCoord::new(0, 2),
    HexCoord::new(1, 1),
];

const STANDARD_MIX: [(TileKind, usize); 6] = [
    (TileKind::Resource(Resource::Lumber), 4),
    (TileKind::Resource(Resource::Grain), 4),
    (TileKind::Resource(Resource::Wool), 4),
    (TileKind::Resource(Resource::Ore), 3),
    (TileKind::Resource(Resource::Brick), 3),
    (TileKind::Desert, 1),
];

const STANDARD_VALUES: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

const MAX_DEAL_ATTEMPTS: usize = 100;

/// Shuffle the standard tile mix over [`STANDARD_LAND`] and deal dice values,
/// keeping 6s and 8s apart where possible.
pub fn standard_tiles<R: Rng + ?Sized>(rng: &mut R) -> Vec<TileSpec> {
    let mut kinds: Vec<TileKind> = STANDARD_MIX
        .iter()
        .flat_map(|&(kind, count)| std::iter::repeat(kind).take(count))
        .collect();
    kinds.shuffle(rng);

    let productive: Vec<HexCoord> = STANDARD_LAND
        .iter()
        .zip(&kinds)
        .filter(|(_, kind)| kind.is_resource())
        .map(|(coord, _)| *coord)
        .collect();
    let values = deal_values(&productive, rng);

    STANDARD_LAND
        .iter()
        .zip(kinds)
        .map(|(&coord, kind)| TileSpec {
            coord,
            kind,
            value: values.get(&coord).copied(),
        })
        .collect()
}

fn deal_values<R: Rng + ?Sized>(productive: &[HexCoord], rng: &mut R) -> HashMap<HexCoord, u8> {
    let mut values = STANDARD_VALUES.to_vec();
    let mut dealt = HashMap::new();

    // Falls through with the last shuffle if no attempt separates the hot numbers
    for _ in 0..MAX_DEAL_ATTEMPTS {
        values.shuffle(rng);
        dealt = productive.iter().copied().zip(values.iter().copied()).collect();
        if hot_values_apart(&dealt) {
            break;
        }
    }

    dealt
}

fn is_hot(value: u8) -> bool {
    value == 6 || value == 8
}

/// No two 6/8 tiles share a side
fn hot_values_apart(dealt: &HashMap<HexCoord, u8>) -> bool {
    dealt
        .iter()
        .filter(|(_, &value)| is_hot(value))
        .all(|(coord, _)| {
            coord
                .neighbors()
                .iter()
                .all(|n| !dealt.get(n).is_some_and(|&v| is_hot(v)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_neighbors_are_distinct() {
        let unique: HashSet<_> = HexCoord::new(0, 0).neighbors().into_iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_shared_edge_has_one_name() {
        let e1 = EdgeCoord::new(HexCoord::new(0, 0), Side::East);
        let e2 = EdgeCoord::new(HexCoord::new(1, 0), Side::West);
        assert_eq!(e1, e2);

        let e3 = EdgeCoord::new(HexCoord::new(0, 1), Side::NorthEast);
        let e4 = EdgeCoord::new(HexCoord::new(1, 0), Side::SouthWest);
        assert_eq!(e3, e4);
    }

    #[test]
    fn test_edge_endpoints_are_hex_corners() {
        let hex = HexCoord::new(2, -1);
        let corners = hex.corners();
        for edge in hex.edges() {
            for end in edge.endpoints() {
                assert!(corners.contains(&end), "{edge:?} ends outside its hex");
            }
        }
    }

    #[test]
    fn test_edges_walk_the_corner_ring() {
        // Side i joins corner i and corner i + 1
        let hex = HexCoord::new(0, 0);
        let corners = hex.corners();
        for (i, edge) in hex.edges().iter().enumerate() {
            let ends: HashSet<_> = edge.endpoints().into_iter().collect();
            let expected: HashSet<_> = [corners[i], corners[(i + 1) % 6]].into_iter().collect();
            assert_eq!(ends, expected);
        }
    }

    #[test]
    fn test_three_hexes_meet_at_one_corner() {
        // North pole of (0, 1) is shared by (0, 0) and (1, 0)
        let shared = CornerCoord::new(HexCoord::new(0, 1), Pole::North);
        assert!(HexCoord::new(0, 0).corners().contains(&shared));
        assert!(HexCoord::new(1, 0).corners().contains(&shared));
        assert!(HexCoord::new(0, 1).corners().contains(&shared));
    }

    #[test]
    fn test_standard_tiles_mix() {
        let mut rng = StdRng::seed_from_u64(7);
        let tiles = standard_tiles(&mut rng);
        assert_eq!(tiles.len(), 19);

        let deserts: Vec<_> = tiles.iter().filter(|t| t.kind == TileKind::Desert).collect();
        assert_eq!(deserts.len(), 1);
        assert_eq!(deserts[0].value, None);

        let count = |r: Resource| tiles.iter().filter(|t| t.kind == TileKind::Resource(r)).count();
        assert_eq!(count(Resource::Lumber), 4);
        assert_eq!(count(Resource::Grain), 4);
        assert_eq!(count(Resource::Wool), 4);
        assert_eq!(count(Resource::Ore), 3);
        assert_eq!(count(Resource::Brick), 3);

        let mut values: Vec<u8> = tiles.iter().filter_map(|t| t.value).collect();
        values.sort_unstable();
        assert_eq!(values, STANDARD_VALUES.to_vec());
    }

    #[test]
    fn test_hot_values_kept_apart() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let dealt: HashMap<HexCoord, u8> = standard_tiles(&mut rng)
                .into_iter()
                .filter_map(|t| t.value.map(|v| (t.coord, v)))
                .collect();
            assert!(hot_values_apart(&dealt), "seed {seed} placed 6/8 side by side");
        }
    }
}
