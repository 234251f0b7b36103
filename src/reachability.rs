//! Reachability between rooms and junctions through tunnels.
//!
//! For each vertex region a breadth-first search starts at the tiles
//! bordering it and spreads through tunnel tiles only. Any room or
//! junction tile it touches is recorded and not expanded, so reaching a
//! room never lets the search continue through that room.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use rayon::prelude::*;

use crate::classify::{LabelMap, LabeledRegion, RegionLabel};
use crate::hex::Hex;
use crate::partition::Region;

/// Region label -> labels reachable from it through tunnels
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReachabilityGraph {
    edges: BTreeMap<RegionLabel, BTreeSet<RegionLabel>>,
}

impl ReachabilityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: RegionLabel, reachable: BTreeSet<RegionLabel>) {
        self.edges.insert(from, reachable);
    }

    pub fn get(&self, label: RegionLabel) -> Option<&BTreeSet<RegionLabel>> {
        self.edges.get(&label)
    }

    pub fn reaches(&self, from: RegionLabel, to: RegionLabel) -> bool {
        self.edges.get(&from).is_some_and(|set| set.contains(&to))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionLabel, &BTreeSet<RegionLabel>)> {
        self.edges.iter()
    }

    /// Directed pairs (a, b) where a reaches b but b does not reach a.
    pub fn asymmetric_pairs(&self) -> Vec<(RegionLabel, RegionLabel)> {
        let mut pairs = Vec::new();
        for (&from, reachable) in &self.edges {
            for &to in reachable {
                if !self.reaches(to, from) {
                    pairs.push((from, to));
                }
            }
        }
        pairs
    }

    pub fn is_symmetric(&self) -> bool {
        self.asymmetric_pairs().is_empty()
    }

    /// Copy with every edge mirrored and self-loops dropped.
    pub fn symmetrized(&self) -> Self {
        let mut edges = self.edges.clone();
        for (&from, reachable) in &self.edges {
            for &to in reachable {
                edges.entry(to).or_default().insert(from);
            }
        }
        for (label, reachable) in edges.iter_mut() {
            reachable.remove(label);
        }
        Self { edges }
    }

    /// Undirected edges (low, high), de-duplicated, without self-loops.
    pub fn edge_list(&self) -> Vec<(RegionLabel, RegionLabel)> {
        let mut edges = BTreeSet::new();
        for (&from, reachable) in &self.edges {
            for &to in reachable {
                if from != to {
                    edges.insert((from.min(to), from.max(to)));
                }
            }
        }
        edges.into_iter().collect()
    }
}

/// Labels reachable from `region` by passing only through tunnel tiles.
///
/// The region's own tiles are never entered, so it cannot report itself.
pub fn reachable_from(region: &Region, labels: &LabelMap) -> BTreeSet<RegionLabel> {
    let mut reachable = BTreeSet::new();
    let mut visited: HashSet<Hex> = region.iter().copied().collect();
    let mut queue = VecDeque::new();

    for &hex in region.iter() {
        for n in hex.neighbors() {
            if labels.contains(n) && visited.insert(n) {
                queue.push_back(n);
            }
        }
    }

    while let Some(hex) = queue.pop_front() {
        let Some(label) = labels.get(hex) else {
            continue;
        };

        if !label.is_tunnel() {
            reachable.insert(label);
            continue;
        }

        for n in hex.neighbors() {
            if labels.contains(n) && visited.insert(n) {
                queue.push_back(n);
            }
        }
    }

    reachable
}

/// Run `reachable_from` for every room and junction.
///
/// Regions are independent and the label map is read-only, so the
/// searches run in parallel.
pub fn discover_reachability(regions: &[LabeledRegion<'_>], labels: &LabelMap) -> ReachabilityGraph {
    let results: Vec<(RegionLabel, BTreeSet<RegionLabel>)> = regions
        .par_iter()
        .map(|lr| (lr.label, reachable_from(lr.region, labels)))
        .collect();

    let mut graph = ReachabilityGraph::new();
    for (label, reachable) in results {
        tracing::debug!(label = label.0, reachable = reachable.len(), "region reachability");
        graph.insert(label, reachable);
    }
    graph
}
