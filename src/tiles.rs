//! Occupied tile arena with per-tile lifecycle state.
//!
//! Tiles are stored once in canonical row-major order and addressed by
//! index; a hash map resolves coordinates to indices. Every tile starts
//! `Unexplored`, is marked `Explored` when a fill claims it, and ends in
//! exactly one terminal category.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::hex::Hex;

/// Lifecycle state of an occupied tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileState {
    #[default]
    Unexplored,
    Explored,
    Room,
    Junction,
    Tunnel,
}

impl TileState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TileState::Room | TileState::Junction | TileState::Tunnel)
    }

    /// Unexplored -> Explored -> {Room, Junction, Tunnel}; nothing else.
    pub fn can_transition_to(&self, next: TileState) -> bool {
        match (self, next) {
            (TileState::Unexplored, TileState::Explored) => true,
            (TileState::Explored, next) => next.is_terminal(),
            _ => false,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TileState::Unexplored => "unexplored",
            TileState::Explored => "explored",
            TileState::Room => "room",
            TileState::Junction => "junction",
            TileState::Tunnel => "tunnel",
        }
    }
}

/// The set of occupied tiles under consideration.
#[derive(Clone, Debug, Default)]
pub struct TileSet {
    coords: Vec<Hex>,
    states: Vec<TileState>,
    index: HashMap<Hex, usize>,
}

impl TileSet {
    /// Build from any collection of tiles; duplicates collapse and order
    /// is normalized so the result depends only on the set of tiles.
    pub fn new(hexes: impl IntoIterator<Item = Hex>) -> Self {
        let mut coords: Vec<Hex> = hexes.into_iter().collect();
        coords.sort();
        coords.dedup();

        let index = coords.iter().enumerate().map(|(i, &h)| (h, i)).collect();
        let states = vec![TileState::Unexplored; coords.len()];

        Self { coords, states, index }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.index.contains_key(&hex)
    }

    pub fn index_of(&self, hex: Hex) -> Option<usize> {
        self.index.get(&hex).copied()
    }

    pub fn hex(&self, idx: usize) -> Hex {
        self.coords[idx]
    }

    pub fn state(&self, idx: usize) -> TileState {
        self.states[idx]
    }

    pub fn state_of(&self, hex: Hex) -> Option<TileState> {
        self.index_of(hex).map(|i| self.states[i])
    }

    /// Iterate tiles in canonical order with their states.
    pub fn iter(&self) -> impl Iterator<Item = (Hex, TileState)> + '_ {
        self.coords.iter().copied().zip(self.states.iter().copied())
    }

    pub fn hexes(&self) -> &[Hex] {
        &self.coords
    }

    /// Indices of the lattice neighbors of `idx` that are in the set.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.coords[idx]
            .neighbors()
            .into_iter()
            .filter_map(move |n| self.index_of(n))
    }

    /// Number of occupied lattice neighbors.
    pub fn neighbor_count(&self, idx: usize) -> usize {
        self.neighbors(idx).count()
    }

    /// Move a tile to its next lifecycle state.
    pub fn transition(&mut self, idx: usize, next: TileState) -> MapResult<()> {
        let current = self.states[idx];
        if !current.can_transition_to(next) {
            return Err(MapError::InvalidTransition {
                hex: self.coords[idx],
                from: current,
                to: next,
            });
        }
        self.states[idx] = next;
        Ok(())
    }

    /// Claim an unexplored tile for a fill. Returns false if it was
    /// already claimed, which callers treat as an empty contribution.
    pub fn try_explore(&mut self, idx: usize) -> bool {
        if self.states[idx] != TileState::Unexplored {
            return false;
        }
        self.states[idx] = TileState::Explored;
        true
    }

    /// Count tiles per state.
    pub fn count(&self, state: TileState) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }
}

impl FromIterator<Hex> for TileSet {
    fn from_iter<I: IntoIterator<Item = Hex>>(iter: I) -> Self {
        TileSet::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dedups_and_sorts() {
        let tiles = TileSet::new(vec![Hex::axial(1, 1), Hex::axial(0, 0), Hex::axial(1, 1)]);
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles.hexes(), &[Hex::axial(0, 0), Hex::axial(1, 1)]);
        assert!(tiles.iter().all(|(_, s)| s == TileState::Unexplored));
    }

    #[test]
    fn test_neighbors_filter_to_present_tiles() {
        let tiles: TileSet = Hex::ORIGIN.within(1).into_iter().collect();
        let center = tiles.index_of(Hex::ORIGIN).unwrap();
        assert_eq!(tiles.neighbor_count(center), 6);

        let edge = tiles.index_of(Hex::axial(1, 0)).unwrap();
        assert_eq!(tiles.neighbor_count(edge), 3);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut tiles = TileSet::new(vec![Hex::ORIGIN]);
        assert!(tiles.transition(0, TileState::Room).is_err());
        assert!(tiles.try_explore(0));
        assert!(!tiles.try_explore(0));
        tiles.transition(0, TileState::Tunnel).unwrap();
        assert_eq!(tiles.state_of(Hex::ORIGIN), Some(TileState::Tunnel));

        let err = tiles.transition(0, TileState::Room).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidTransition { from: TileState::Tunnel, to: TileState::Room, .. }
        ));
    }
}
