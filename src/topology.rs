//! One-shot topology construction
//!
//! Runs the full chain over a set of occupied tiles:
//! partition -> classify -> label -> reachability.

use crate::classify::{self, Category, Classification, LabelMap, LabeledRegion};
use crate::error::MapResult;
use crate::hex::Hex;
use crate::params::TopologyParams;
use crate::partition;
use crate::reachability::{self, ReachabilityGraph};
use crate::tiles::TileSet;

/// Everything derived from one set of occupied tiles.
#[derive(Clone, Debug)]
pub struct TopologyMap {
    /// Every tile, stamped Room, Junction, or Tunnel
    pub tiles: TileSet,
    pub classification: Classification,
    pub labels: LabelMap,
    /// Reachability exactly as discovered, one search per region
    pub reachability: ReachabilityGraph,
}

impl TopologyMap {
    pub fn rooms(&self) -> &[partition::Region] {
        &self.classification.rooms
    }

    pub fn junctions(&self) -> &[partition::Region] {
        &self.classification.junctions
    }

    pub fn labeled_regions(&self) -> Vec<LabeledRegion<'_>> {
        self.classification.labeled()
    }

    /// Reachability with every edge mirrored.
    pub fn symmetric_reachability(&self) -> ReachabilityGraph {
        self.reachability.symmetrized()
    }

    /// Number of tiles in a category.
    pub fn tile_count(&self, category: Category) -> usize {
        self.tiles.count(category.tile_state())
    }
}

/// Build the labeled topology for a set of occupied tiles.
pub fn build_topology(
    hexes: impl IntoIterator<Item = Hex>,
    params: &TopologyParams,
) -> MapResult<TopologyMap> {
    params.validate()?;

    let hexes: Vec<Hex> = hexes.into_iter().collect();
    for hex in &hexes {
        hex.validate()?;
    }

    let mut tiles = TileSet::new(hexes);
    tracing::info!(tiles = tiles.len(), "partitioning occupied tiles");

    let regions = partition::flood_fill(&mut tiles, params.neighbor_threshold);
    tracing::info!(regions = regions.len(), "partitioned");

    let classification = classify::classify_regions(regions, &mut tiles, params)?;
    let labels = classify::label_tiles(&classification, &tiles);
    tracing::info!(
        rooms = classification.rooms.len(),
        junctions = classification.junctions.len(),
        tunnels = classification.tunnel_regions,
        "classified"
    );

    let reachability = reachability::discover_reachability(&classification.labeled(), &labels);
    let asymmetric = reachability.asymmetric_pairs();
    if !asymmetric.is_empty() {
        tracing::warn!(pairs = asymmetric.len(), "reachability is not symmetric");
    }

    Ok(TopologyMap {
        tiles,
        classification,
        labels,
        reachability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RegionLabel;
    use crate::error::MapError;
    use crate::tiles::TileState;
    use std::collections::BTreeSet;

    fn parallelogram(q0: i32, r0: i32, width: i32, height: i32) -> Vec<Hex> {
        let mut hexes = Vec::new();
        for r in r0..r0 + height {
            for q in q0..q0 + width {
                hexes.push(Hex::axial(q, r));
            }
        }
        hexes
    }

    /// Room of 10 and room of 15 joined at thin corners by a 3-tile tunnel.
    fn two_rooms() -> Vec<Hex> {
        let mut hexes = parallelogram(0, 0, 5, 2);
        hexes.extend([Hex::axial(5, 1), Hex::axial(6, 1), Hex::axial(7, 1)]);
        hexes.extend(parallelogram(8, 1, 5, 3));
        hexes
    }

    #[test]
    fn test_empty_input() {
        let map = build_topology(Vec::new(), &TopologyParams::default()).unwrap();
        assert!(map.tiles.is_empty());
        assert!(map.rooms().is_empty());
        assert!(map.junctions().is_empty());
        assert!(map.labels.is_empty());
        assert!(map.reachability.is_empty());
    }

    #[test]
    fn test_single_tile_is_tunnel() {
        let map = build_topology(vec![Hex::ORIGIN], &TopologyParams::default()).unwrap();
        assert_eq!(map.tiles.state_of(Hex::ORIGIN), Some(TileState::Tunnel));
        assert_eq!(map.labels.get(Hex::ORIGIN), Some(RegionLabel::TUNNEL));
        assert_eq!(map.classification.tunnel_regions, 1);
        assert!(map.reachability.is_empty());
    }

    #[test]
    fn test_twelve_tile_blob_is_room_zero() {
        let hexes = parallelogram(0, 0, 4, 3);
        let map = build_topology(hexes.clone(), &TopologyParams::default()).unwrap();
        assert_eq!(map.rooms().len(), 1);
        assert_eq!(map.rooms()[0].len(), 12);
        for hex in hexes {
            assert_eq!(map.labels.get(hex), Some(RegionLabel(0)));
        }
        assert_eq!(map.reachability.get(RegionLabel(0)), Some(&BTreeSet::new()));
    }

    #[test]
    fn test_two_rooms_joined_by_tunnel() {
        let map = build_topology(two_rooms(), &TopologyParams::default()).unwrap();

        let sizes: Vec<usize> = map.rooms().iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![10, 15]);
        assert!(map.junctions().is_empty());
        assert_eq!(map.tile_count(Category::Tunnel), 3);
        assert_eq!(map.labels.get(Hex::axial(6, 1)), Some(RegionLabel::TUNNEL));

        assert_eq!(map.reachability.get(RegionLabel(0)), Some(&BTreeSet::from([RegionLabel(1)])));
        assert_eq!(map.reachability.get(RegionLabel(1)), Some(&BTreeSet::from([RegionLabel(0)])));
        assert!(map.reachability.is_symmetric());
        assert_eq!(map.reachability.edge_list(), vec![(RegionLabel(0), RegionLabel(1))]);
    }

    #[test]
    fn test_every_tile_ends_terminal() {
        let mut hexes = two_rooms();
        hexes.extend(Hex::axial(30, 0).within(1));
        hexes.push(Hex::axial(-10, -10));
        let map = build_topology(hexes, &TopologyParams::default()).unwrap();

        assert!(map.tiles.iter().all(|(_, state)| state.is_terminal()));
        assert_eq!(map.labels.len(), map.tiles.len());
        assert_eq!(map.junctions().len(), 1);
        // The junction has no tunnel to anything
        assert_eq!(map.reachability.get(RegionLabel(2)), Some(&BTreeSet::new()));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = TopologyParams { min_junction: 12, ..Default::default() };
        assert!(build_topology(vec![Hex::ORIGIN], &params).is_err());
    }

    #[test]
    fn test_out_of_range_tiles_rejected() {
        let far = Hex { q: i32::MAX, r: -i32::MAX, s: 0 };
        let err = build_topology(vec![Hex::ORIGIN, far], &TopologyParams::default()).unwrap_err();
        assert!(matches!(err, MapError::CoordinateOutOfRange { .. }));
    }
}
