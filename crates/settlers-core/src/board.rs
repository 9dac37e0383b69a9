//! The board as a fixed graph of corners, edges and tiles.
//!
//! The graph is an arena: nodes live in three vectors and refer to each other
//! by integer id. Topology is computed once in [`BoardGraph::from_tiles`] and
//! never changes; only corner buildings and edge owners move, and only through
//! the replay of committed events.

use crate::error::{ActionError, NodeKind};
use crate::layout::{self, CornerCoord, EdgeCoord, HexCoord, TileSpec};
use crate::player::PlayerId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Resource kinds produced by tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Brick,
    Grain,
    Lumber,
    Ore,
    Wool,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Grain,
        Resource::Lumber,
        Resource::Ore,
        Resource::Wool,
    ];
}

/// What a tile is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Resource(Resource),
    Desert,
}

impl TileKind {
    pub fn is_resource(&self) -> bool {
        matches!(self, TileKind::Resource(_))
    }
}

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

node_id!(
    /// Index of a corner in the arena
    CornerId
);
node_id!(
    /// Index of an edge in the arena
    EdgeId
);
node_id!(
    /// Index of a tile in the arena
    TileId
);

/// What stands on a corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CornerBuilding {
    #[default]
    Empty,
    Settlement(PlayerId),
    City(PlayerId),
}

impl CornerBuilding {
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            CornerBuilding::Empty => None,
            CornerBuilding::Settlement(p) | CornerBuilding::City(p) => Some(*p),
        }
    }

    /// Units of a tile's resource credited per production
    pub fn yield_multiplier(&self) -> u32 {
        match self {
            CornerBuilding::Empty => 0,
            CornerBuilding::Settlement(_) => 1,
            CornerBuilding::City(_) => 2,
        }
    }
}

/// A vertex where settlements and cities stand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corner {
    pub id: CornerId,
    pub coord: CornerCoord,
    pub building: CornerBuilding,
    edges: Vec<EdgeId>,
    tiles: Vec<TileId>,
}

impl Corner {
    fn new(id: CornerId, coord: CornerCoord) -> Self {
        Self {
            id,
            coord,
            building: CornerBuilding::Empty,
            edges: Vec::with_capacity(3),
            tiles: Vec::with_capacity(3),
        }
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.building.owner()
    }

    /// A standing settlement (not yet upgraded)
    pub fn has_settlement(&self) -> bool {
        matches!(self.building, CornerBuilding::Settlement(_))
    }

    pub fn is_city(&self) -> bool {
        matches!(self.building, CornerBuilding::City(_))
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }
}

/// A connector between two corners where roads are built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub coord: EdgeCoord,
    pub owner: Option<PlayerId>,
    corners: [CornerId; 2],
}

impl Edge {
    pub fn corners(&self) -> [CornerId; 2] {
        self.corners
    }

    /// Buildable while nobody owns it; connection rules live in the rule steps
    pub fn is_buildable(&self) -> bool {
        self.owner.is_none()
    }
}

/// A hex that produces its resource when its value is rolled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub coord: HexCoord,
    pub kind: TileKind,
    /// Dice value 2-12, `None` for the desert
    pub value: Option<u8>,
    corners: Vec<CornerId>,
    neighbors: Vec<TileId>,
}

impl Tile {
    pub fn is_resource(&self) -> bool {
        self.kind.is_resource()
    }

    pub fn resource(&self) -> Option<Resource> {
        match self.kind {
            TileKind::Resource(r) => Some(r),
            TileKind::Desert => None,
        }
    }

    pub fn corners(&self) -> &[CornerId] {
        &self.corners
    }

    pub fn neighbors(&self) -> &[TileId] {
        &self.neighbors
    }
}

/// Corner query; `None` fields match anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CornerFilter {
    pub owner: Option<PlayerId>,
    pub settlement: Option<bool>,
    pub city: Option<bool>,
}

impl CornerFilter {
    pub fn owned_by(player: PlayerId) -> Self {
        Self {
            owner: Some(player),
            ..Self::default()
        }
    }

    pub fn settlement(mut self, yes: bool) -> Self {
        self.settlement = Some(yes);
        self
    }

    pub fn city(mut self, yes: bool) -> Self {
        self.city = Some(yes);
        self
    }

    pub fn matches(&self, corner: &Corner) -> bool {
        self.owner.map_or(true, |p| corner.owner() == Some(p))
            && self.settlement.map_or(true, |s| corner.has_settlement() == s)
            && self.city.map_or(true, |c| corner.is_city() == c)
    }
}

/// Edge query; `None` fields match anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeFilter {
    pub owner: Option<PlayerId>,
}

impl EdgeFilter {
    pub fn owned_by(player: PlayerId) -> Self {
        Self {
            owner: Some(player),
        }
    }

    pub fn matches(&self, edge: &Edge) -> bool {
        self.owner.map_or(true, |p| edge.owner == Some(p))
    }
}

/// Tile query; `None` fields match anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileFilter {
    pub value: Option<u8>,
    pub resource_only: bool,
}

impl TileFilter {
    /// Resource tiles that produce on `total`
    pub fn producing_on(total: u8) -> Self {
        Self {
            value: Some(total),
            resource_only: true,
        }
    }

    pub fn matches(&self, tile: &Tile) -> bool {
        self.value.map_or(true, |v| tile.value == Some(v)) && (!self.resource_only || tile.is_resource())
    }
}

/// The complete board graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardGraph {
    corners: Vec<Corner>,
    edges: Vec<Edge>,
    tiles: Vec<Tile>,
}

impl BoardGraph {
    /// Build the graph for a set of tiles.
    ///
    /// Ids follow the order tiles are given in, then each tile's corners and
    /// edges clockwise from north. A repeated coordinate is ignored.
    pub fn from_tiles(specs: &[TileSpec]) -> Self {
        let mut graph = Self::default();
        let mut corner_ids: HashMap<CornerCoord, CornerId> = HashMap::new();
        let mut edge_ids: HashMap<EdgeCoord, EdgeId> = HashMap::new();
        let mut tile_ids: HashMap<HexCoord, TileId> = HashMap::new();

        for spec in specs {
            if tile_ids.contains_key(&spec.coord) {
                continue;
            }
            let tile_id = TileId(graph.tiles.len());
            tile_ids.insert(spec.coord, tile_id);

            let mut tile_corners = Vec::with_capacity(6);
            for coord in spec.coord.corners() {
                let corner = graph.intern_corner(&mut corner_ids, coord);
                graph.corners[corner.0].tiles.push(tile_id);
                tile_corners.push(corner);
            }

            for coord in spec.coord.edges() {
                if edge_ids.contains_key(&coord) {
                    continue;
                }
                let edge_id = EdgeId(graph.edges.len());
                let [a, b] = coord.endpoints();
                let a = graph.intern_corner(&mut corner_ids, a);
                let b = graph.intern_corner(&mut corner_ids, b);
                graph.corners[a.0].edges.push(edge_id);
                graph.corners[b.0].edges.push(edge_id);
                graph.edges.push(Edge {
                    id: edge_id,
                    coord,
                    owner: None,
                    corners: [a, b],
                });
                edge_ids.insert(coord, edge_id);
            }

            graph.tiles.push(Tile {
                id: tile_id,
                coord: spec.coord,
                kind: spec.kind,
                value: spec.value,
                corners: tile_corners,
                neighbors: Vec::new(),
            });
        }

        for tile in &mut graph.tiles {
            tile.neighbors = tile
                .coord
                .neighbors()
                .iter()
                .filter_map(|n| tile_ids.get(n).copied())
                .collect();
        }

        graph
    }

    fn intern_corner(
        &mut self,
        ids: &mut HashMap<CornerCoord, CornerId>,
        coord: CornerCoord,
    ) -> CornerId {
        *ids.entry(coord).or_insert_with(|| {
            let id = CornerId(self.corners.len());
            self.corners.push(Corner::new(id, coord));
            id
        })
    }

    /// Standard 19-tile board with a fresh random layout
    pub fn standard() -> Self {
        let mut rng = rand::thread_rng();
        Self::standard_with_rng(&mut rng)
    }

    /// Standard 19-tile board laid out with the provided RNG
    pub fn standard_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_tiles(&layout::standard_tiles(rng))
    }

    // ==================== Lookup ====================

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn corner(&self, id: CornerId) -> Result<&Corner, ActionError> {
        self.corners
            .get(id.0)
            .ok_or(ActionError::not_found(NodeKind::Corner, id.0))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, ActionError> {
        self.edges
            .get(id.0)
            .ok_or(ActionError::not_found(NodeKind::Edge, id.0))
    }

    pub fn tile(&self, id: TileId) -> Result<&Tile, ActionError> {
        self.tiles
            .get(id.0)
            .ok_or(ActionError::not_found(NodeKind::Tile, id.0))
    }

    pub fn query_corners(&self, filter: &CornerFilter) -> Vec<&Corner> {
        self.corners.iter().filter(|c| filter.matches(c)).collect()
    }

    pub fn query_edges(&self, filter: &EdgeFilter) -> Vec<&Edge> {
        self.edges.iter().filter(|e| filter.matches(e)).collect()
    }

    pub fn query_tiles(&self, filter: &TileFilter) -> Vec<&Tile> {
        self.tiles.iter().filter(|t| filter.matches(t)).collect()
    }

    // ==================== Adjacency ====================

    /// The two corners an edge joins
    pub fn adjacent_corners<'g>(&'g self, edge: &'g Edge) -> impl Iterator<Item = &'g Corner> + 'g {
        edge.corners.iter().filter_map(move |id| self.corners.get(id.0))
    }

    /// Edges meeting at a corner (two on the coast, three inland)
    pub fn adjacent_edges<'g>(&'g self, corner: &'g Corner) -> impl Iterator<Item = &'g Edge> + 'g {
        corner.edges.iter().filter_map(move |id| self.edges.get(id.0))
    }

    /// Tiles touching a corner
    pub fn adjacent_tiles<'g>(&'g self, corner: &'g Corner) -> impl Iterator<Item = &'g Tile> + 'g {
        corner.tiles.iter().filter_map(move |id| self.tiles.get(id.0))
    }

    /// The six corners of a tile
    pub fn tile_corners<'g>(&'g self, tile: &'g Tile) -> impl Iterator<Item = &'g Corner> + 'g {
        tile.corners.iter().filter_map(move |id| self.corners.get(id.0))
    }

    /// Tiles sharing a side with `tile`
    pub fn tile_neighbors<'g>(&'g self, tile: &'g Tile) -> impl Iterator<Item = &'g Tile> + 'g {
        tile.neighbors.iter().filter_map(move |id| self.tiles.get(id.0))
    }

    /// Corners one edge away from `corner`
    pub fn corner_neighbors<'g>(&'g self, corner: &'g Corner) -> impl Iterator<Item = &'g Corner> + 'g {
        let here = corner.id;
        self.adjacent_edges(corner)
            .filter_map(move |edge| edge.corners.iter().find(|&&c| c != here))
            .filter_map(move |id| self.corners.get(id.0))
    }

    // ==================== Buildability ====================

    /// Unowned, with no owned corner one edge away
    pub fn corner_is_buildable(&self, corner: &Corner) -> bool {
        corner.owner().is_none() && self.corner_neighbors(corner).all(|n| n.owner().is_none())
    }

    /// Edges `player` may extend a road onto.
    ///
    /// The edge must be unowned and touch the player's network: either an
    /// endpoint holds the player's building, or an endpoint carries another
    /// of the player's roads and no rival building sits there.
    pub fn buildable_edges_for(&self, player: PlayerId) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|edge| edge.is_buildable() && self.edge_touches_network(edge, player))
            .collect()
    }

    fn edge_touches_network(&self, edge: &Edge, player: PlayerId) -> bool {
        self.adjacent_corners(edge).any(|end| match end.owner() {
            Some(owner) => owner == player,
            None => self
                .adjacent_edges(end)
                .any(|other| other.id != edge.id && other.owner == Some(player)),
        })
    }

    /// Buildable corners reached by one of `player`'s roads
    pub fn buildable_corners_for(&self, player: PlayerId) -> Vec<&Corner> {
        self.corners
            .iter()
            .filter(|corner| {
                self.corner_is_buildable(corner)
                    && self.adjacent_edges(corner).any(|e| e.owner == Some(player))
            })
            .collect()
    }

    // ==================== Mutation (replay only) ====================

    pub(crate) fn place_road(&mut self, id: EdgeId, player: PlayerId) -> Result<(), ActionError> {
        let edge = self
            .edges
            .get_mut(id.0)
            .ok_or(ActionError::not_found(NodeKind::Edge, id.0))?;
        if edge.owner.is_some() {
            return Err(ActionError::InvalidBuildSpot);
        }
        edge.owner = Some(player);
        Ok(())
    }

    pub(crate) fn place_settlement(&mut self, id: CornerId, player: PlayerId) -> Result<(), ActionError> {
        let corner = self
            .corners
            .get_mut(id.0)
            .ok_or(ActionError::not_found(NodeKind::Corner, id.0))?;
        if corner.building != CornerBuilding::Empty {
            return Err(ActionError::InvalidBuildSpot);
        }
        corner.building = CornerBuilding::Settlement(player);
        Ok(())
    }

    pub(crate) fn upgrade_to_city(&mut self, id: CornerId, player: PlayerId) -> Result<(), ActionError> {
        let corner = self
            .corners
            .get_mut(id.0)
            .ok_or(ActionError::not_found(NodeKind::Corner, id.0))?;
        if corner.building != CornerBuilding::Settlement(player) {
            return Err(ActionError::InvalidBuildSpot);
        }
        corner.building = CornerBuilding::City(player);
        Ok(())
    }
}
