//! Region partitioning by neighbor-threshold flood fill.
//!
//! A fill claims a tile and, only if that tile has at least
//! `neighbor_threshold` occupied neighbors, continues into every one of
//! them. Tiles below the threshold still join the region that reaches
//! them, but a fill never passes through them.
//!
//! Seeds are taken in two sweeps over the canonical tile order: tiles that
//! meet the threshold first, then whatever is left. Thick tiles that touch
//! always end up in the same region, so region shapes do not depend on
//! which tile of a blob happens to come first.

use crate::hex::Hex;
use crate::tiles::TileSet;

/// A maximal group of tiles claimed by one fill, in discovery order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Region {
    pub tiles: Vec<Hex>,
}

impl Region {
    pub fn new(tiles: Vec<Hex>) -> Self {
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.tiles.contains(&hex)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hex> {
        self.tiles.iter()
    }
}

/// Partition every tile of the set into regions.
///
/// Afterwards every tile is `Explored`. An empty set yields no regions.
pub fn flood_fill(tiles: &mut TileSet, neighbor_threshold: usize) -> Vec<Region> {
    let mut regions = Vec::new();

    // Thick seeds first, so a blob is never entered through its rim
    for idx in 0..tiles.len() {
        if tiles.neighbor_count(idx) < neighbor_threshold {
            continue;
        }
        let filled = fill(tiles, idx, neighbor_threshold);
        if !filled.is_empty() {
            regions.push(Region::new(filled));
        }
    }

    // Leftover thin tiles touch no thick tile and stand alone
    for idx in 0..tiles.len() {
        let filled = fill(tiles, idx, neighbor_threshold);
        if !filled.is_empty() {
            regions.push(Region::new(filled));
        }
    }

    tracing::debug!(
        regions = regions.len(),
        tiles = tiles.len(),
        neighbor_threshold,
        "flood fill complete"
    );

    regions
}

/// Grow one region from `start`.
///
/// Returns an empty list if `start` was already claimed. Uses an explicit
/// stack; neighbors are pushed in reverse so tiles are claimed in the same
/// depth-first order a recursive fill would use.
pub fn fill(tiles: &mut TileSet, start: usize, neighbor_threshold: usize) -> Vec<Hex> {
    let mut region = Vec::new();
    let mut stack = vec![start];
    let mut neighbors: Vec<usize> = Vec::with_capacity(6);

    while let Some(idx) = stack.pop() {
        if !tiles.try_explore(idx) {
            continue;
        }
        region.push(tiles.hex(idx));

        neighbors.clear();
        neighbors.extend(tiles.neighbors(idx));
        if neighbors.len() >= neighbor_threshold {
            stack.extend(neighbors.iter().rev());
        }
    }

    region
}
