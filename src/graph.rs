//! Navigable graph export.
//!
//! One vertex per room or junction, placed at the median of its tile
//! centres, and one undirected edge per pair of regions that reach each
//! other through tunnels.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{Category, RegionLabel};
use crate::error::{MapError, MapResult};
use crate::hex::HexLayout;
use crate::topology::TopologyMap;

/// A room or junction vertex
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub label: RegionLabel,
    pub x: f64,
    pub y: f64,
    /// Number of tiles in the region
    pub size: usize,
    pub category: Category,
    pub color: String,
}

/// Undirected edge between two vertex labels, `source < target`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: RegionLabel,
    pub target: RegionLabel,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl TopologyGraph {
    /// Build the graph from a finished topology.
    pub fn from_topology(map: &TopologyMap, layout: &HexLayout) -> Self {
        let vertices = map
            .labeled_regions()
            .into_iter()
            .map(|lr| {
                let (xs, ys): (Vec<f64>, Vec<f64>) =
                    lr.region.iter().map(|&h| layout.to_pixel(h)).unzip();
                Vertex {
                    label: lr.label,
                    x: median(xs),
                    y: median(ys),
                    size: lr.region.len(),
                    category: lr.category,
                    color: lr.category.color_name().to_string(),
                }
            })
            .collect();

        let edges = map
            .symmetric_reachability()
            .edge_list()
            .into_iter()
            .map(|(source, target)| Edge { source, target })
            .collect();

        Self { vertices, edges }
    }

    pub fn vertex(&self, label: RegionLabel) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.label == label)
    }

    pub fn save_json(&self, path: &Path) -> MapResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| MapError::io(path, e))
    }

    pub fn load_json(path: &Path) -> MapResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Median, averaging the two middle values for even counts.
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::Hex;
    use crate::params::TopologyParams;
    use crate::topology::build_topology;
    use tempfile::tempdir;

    fn corridor_map() -> TopologyMap {
        // Room, thin tunnel, junction
        let mut hexes = Hex::ORIGIN.within(2);
        hexes.extend((3..6).map(|q| Hex::axial(q, 0)));
        hexes.extend(Hex::axial(7, 0).within(1));
        build_topology(hexes, &TopologyParams::default()).unwrap()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(Vec::new()), 0.0);
    }

    #[test]
    fn test_vertices_and_edges() {
        let map = corridor_map();
        let graph = TopologyGraph::from_topology(&map, &HexLayout::new(7.0));

        assert_eq!(graph.vertices.len(), 2);
        let room = graph.vertex(RegionLabel(0)).unwrap();
        assert_eq!(room.category, Category::Room);
        assert_eq!(room.color, "blue");
        assert_eq!((room.x, room.y), (0.0, 0.0));

        let junction = graph.vertex(RegionLabel(1)).unwrap();
        assert_eq!(junction.category, Category::Junction);
        assert_eq!(junction.color, "red");

        assert_eq!(
            graph.edges,
            vec![Edge { source: RegionLabel(0), target: RegionLabel(1) }]
        );
    }

    #[test]
    fn test_json_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let graph = TopologyGraph::from_topology(&corridor_map(), &HexLayout::new(7.0));

        graph.save_json(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"category\": \"room\""));
        let loaded = TopologyGraph::load_json(&path).unwrap();
        assert_eq!(loaded.vertices.len(), graph.vertices.len());
        assert_eq!(loaded.edges, graph.edges);
    }
}
