//! Hex floor-plan mapping library
//!
//! Turns a rasterized floor plan into a hex-lattice map, partitions the
//! occupied tiles into rooms, junctions, and tunnels, and discovers which
//! rooms and junctions connect through tunnels.

pub mod classify;
pub mod error;
pub mod graph;
pub mod hex;
pub mod logging;
pub mod params;
pub mod partition;
pub mod raster;
pub mod reachability;
pub mod render;
pub mod tile_io;
pub mod tiles;
pub mod topology;

pub use classify::{Category, Classification, LabelMap, RegionLabel};
pub use error::{MapError, MapResult};
pub use hex::{Hex, HexLayout};
pub use params::{MapConfig, OccupancyMode, RasterParams, TopologyParams};
pub use partition::Region;
pub use reachability::ReachabilityGraph;
pub use tiles::{TileSet, TileState};
pub use topology::{build_topology, TopologyMap};
