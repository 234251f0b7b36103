//! Map construction parameters and configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// How rasterized hexes are turned into occupied tiles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyMode {
    /// Occupied when the filled-pixel ratio exceeds the cutoff
    #[default]
    Cutoff,
    /// Error-diffusion dithering over the lattice
    Dither,
}

impl std::fmt::Display for OccupancyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cutoff => write!(f, "cutoff"),
            Self::Dither => write!(f, "dither"),
        }
    }
}

/// Parameters for partitioning and classifying occupied tiles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyParams {
    /// A tile must have at least this many occupied neighbors for a fill
    /// to continue through it (default: 4)
    pub neighbor_threshold: usize,

    /// Regions with at least this many tiles are rooms (default: 10)
    pub min_room: usize,

    /// Regions with at least this many tiles, but fewer than `min_room`,
    /// are junctions; anything smaller is tunnel (default: 4)
    pub min_junction: usize,
}

impl Default for TopologyParams {
    fn default() -> Self {
        Self {
            neighbor_threshold: 4,
            min_room: 10,
            min_junction: 4,
        }
    }
}

impl TopologyParams {
    pub fn validate(&self) -> MapResult<()> {
        if self.neighbor_threshold > 7 {
            return Err(MapError::InvalidConfig(format!(
                "neighbor_threshold {} exceeds 7 (a hex has 6 neighbors)",
                self.neighbor_threshold
            )));
        }
        if self.min_junction == 0 {
            return Err(MapError::InvalidConfig("min_junction must be at least 1".into()));
        }
        if self.min_junction > self.min_room {
            return Err(MapError::InvalidConfig(format!(
                "min_junction {} is larger than min_room {}",
                self.min_junction, self.min_room
            )));
        }
        Ok(())
    }
}

/// Parameters for turning a floor-plan image into occupied tiles
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterParams {
    /// Hex centre-to-corner distance in pixels (default: 7)
    pub hex_radius: f64,

    /// Filled-pixel ratio above which a hex counts as occupied (default: 0.22)
    pub cutoff: f32,

    pub occupancy: OccupancyMode,

    /// Dark pixels are floor (default), otherwise light pixels are
    pub dark_is_floor: bool,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self {
            hex_radius: 7.0,
            cutoff: 0.22,
            occupancy: OccupancyMode::Cutoff,
            dark_is_floor: true,
        }
    }
}

impl RasterParams {
    pub fn validate(&self) -> MapResult<()> {
        if !(self.hex_radius > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "hex_radius must be positive, got {}",
                self.hex_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(MapError::InvalidConfig(format!(
                "cutoff must be within [0, 1], got {}",
                self.cutoff
            )));
        }
        Ok(())
    }
}

/// Complete configuration, loadable from JSON
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub topology: TopologyParams,
    pub raster: RasterParams,
}

impl MapConfig {
    /// Load a configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> MapResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
        let config: MapConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> MapResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| MapError::io(path, e))
    }

    pub fn validate(&self) -> MapResult<()> {
        self.topology.validate()?;
        self.raster.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let params = TopologyParams::default();
        assert_eq!(params.neighbor_threshold, 4);
        assert_eq!(params.min_room, 10);
        assert_eq!(params.min_junction, 4);
        assert!(MapConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_inverted_thresholds() {
        let params = TopologyParams { min_room: 3, ..Default::default() };
        assert!(matches!(params.validate(), Err(MapError::InvalidConfig(_))));

        let raster = RasterParams { cutoff: 1.5, ..Default::default() };
        assert!(raster.validate().is_err());

        let raster = RasterParams { hex_radius: 0.0, ..Default::default() };
        assert!(raster.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "topology": { "min_room": 20 }, "raster": { "occupancy": "dither" } }"#)
            .unwrap();

        let config = MapConfig::load(&path).unwrap();
        assert_eq!(config.topology.min_room, 20);
        assert_eq!(config.topology.neighbor_threshold, 4);
        assert_eq!(config.raster.occupancy, OccupancyMode::Dither);
        assert!((config.raster.cutoff - 0.22).abs() < 1e-6);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = MapConfig {
            topology: TopologyParams { neighbor_threshold: 3, ..Default::default() },
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(MapConfig::load(&path).unwrap(), config);
    }
}
