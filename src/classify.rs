//! Region classification and labeling.
//!
//! Regions are sorted into rooms, junctions, and tunnels purely by tile
//! count. Rooms and junctions become graph vertices and receive labels
//! 0, 1, 2, ... (rooms first, then junctions, each in discovery order);
//! tunnel tiles all share the reserved `RegionLabel::TUNNEL`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::hex::Hex;
use crate::params::TopologyParams;
use crate::partition::Region;
use crate::tiles::{TileSet, TileState};

/// Category of a classified region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Room,
    Junction,
    Tunnel,
}

impl Category {
    /// Category for a region of `size` tiles.
    pub fn for_size(size: usize, params: &TopologyParams) -> Self {
        if size >= params.min_room {
            Category::Room
        } else if size >= params.min_junction {
            Category::Junction
        } else {
            Category::Tunnel
        }
    }

    pub fn tile_state(&self) -> TileState {
        match self {
            Category::Room => TileState::Room,
            Category::Junction => TileState::Junction,
            Category::Tunnel => TileState::Tunnel,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Room => "room",
            Category::Junction => "junction",
            Category::Tunnel => "tunnel",
        }
    }

    /// Plot color name used by the graph export.
    pub fn color_name(&self) -> &'static str {
        match self {
            Category::Room => "blue",
            Category::Junction => "red",
            Category::Tunnel => "black",
        }
    }
}

/// Vertex identity of a room or junction (`TUNNEL` for tunnel tiles)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionLabel(pub i32);

impl RegionLabel {
    pub const TUNNEL: RegionLabel = RegionLabel(-1);

    pub fn is_tunnel(&self) -> bool {
        *self == Self::TUNNEL
    }
}

impl std::fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rooms and junctions, in the order their regions were discovered
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub rooms: Vec<Region>,
    pub junctions: Vec<Region>,
    /// Number of regions classified as tunnel
    pub tunnel_regions: usize,
}

/// A room or junction together with its label.
#[derive(Clone, Copy, Debug)]
pub struct LabeledRegion<'a> {
    pub label: RegionLabel,
    pub category: Category,
    pub region: &'a Region,
}

impl Classification {
    /// Rooms then junctions, paired with consecutive labels from 0.
    pub fn labeled(&self) -> Vec<LabeledRegion<'_>> {
        let rooms = self.rooms.iter().map(|r| (Category::Room, r));
        let junctions = self.junctions.iter().map(|r| (Category::Junction, r));
        rooms
            .chain(junctions)
            .enumerate()
            .map(|(i, (category, region))| LabeledRegion {
                label: RegionLabel(i as i32),
                category,
                region,
            })
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.rooms.len() + self.junctions.len()
    }
}

/// Stamp every tile of every region with its category.
///
/// Every tile must be `Explored`; stamping a tile twice, or a tile the
/// set does not contain, is an error. All tiles are checked before any is
/// stamped, so on error the tile set is left unchanged.
pub fn classify_regions(
    regions: Vec<Region>,
    tiles: &mut TileSet,
    params: &TopologyParams,
) -> MapResult<Classification> {
    let plan = plan_stamps(&regions, tiles, params)?;
    for (idx, state) in plan {
        tiles.transition(idx, state)?;
    }

    let mut classification = Classification::default();
    for region in regions {
        match Category::for_size(region.len(), params) {
            Category::Room => classification.rooms.push(region),
            Category::Junction => classification.junctions.push(region),
            Category::Tunnel => classification.tunnel_regions += 1,
        }
    }

    tracing::debug!(
        rooms = classification.rooms.len(),
        junctions = classification.junctions.len(),
        tunnels = classification.tunnel_regions,
        "classified regions"
    );

    Ok(classification)
}

/// Tile index and target state for every tile, in region order.
fn plan_stamps(
    regions: &[Region],
    tiles: &TileSet,
    params: &TopologyParams,
) -> MapResult<Vec<(usize, TileState)>> {
    let mut planned: HashMap<usize, TileState> = HashMap::new();
    let mut plan = Vec::new();

    for region in regions {
        let next = Category::for_size(region.len(), params).tile_state();
        for &hex in region.iter() {
            let idx = tiles.index_of(hex).ok_or(MapError::UnknownTile(hex))?;
            let from = planned.get(&idx).copied().unwrap_or(tiles.state(idx));
            if !from.can_transition_to(next) {
                return Err(MapError::InvalidTransition { hex, from, to: next });
            }
            planned.insert(idx, next);
            plan.push((idx, next));
        }
    }

    Ok(plan)
}

/// Mapping from tile to region label
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelMap {
    labels: HashMap<Hex, RegionLabel>,
}

impl LabelMap {
    pub fn get(&self, hex: Hex) -> Option<RegionLabel> {
        self.labels.get(&hex).copied()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.labels.contains_key(&hex)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hex, &RegionLabel)> {
        self.labels.iter()
    }
}

impl FromIterator<(Hex, RegionLabel)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (Hex, RegionLabel)>>(iter: I) -> Self {
        Self { labels: iter.into_iter().collect() }
    }
}

/// Label every tile: rooms and junctions get their vertex label, every
/// other tile in the set gets `RegionLabel::TUNNEL`.
pub fn label_tiles(classification: &Classification, tiles: &TileSet) -> LabelMap {
    let mut labels: HashMap<Hex, RegionLabel> = tiles
        .hexes()
        .iter()
        .map(|&h| (h, RegionLabel::TUNNEL))
        .collect();

    for labeled in classification.labeled() {
        for &hex in labeled.region.iter() {
            labels.insert(hex, labeled.label);
        }
    }

    LabelMap { labels }
}
