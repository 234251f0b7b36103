//! Error types for hex map construction.

use std::path::PathBuf;

use thiserror::Error;

use crate::hex::Hex;
use crate::tiles::TileState;

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors that can occur while building or exporting a hex map.
#[derive(Debug, Error)]
pub enum MapError {
    /// Cube coordinates must sum to zero.
    #[error("invalid cube coordinate ({q}, {r}, {s}): q + r + s must be 0")]
    InvalidCoordinate { q: i32, r: i32, s: i32 },

    /// A component is too large for lattice arithmetic.
    #[error("cube coordinate ({q}, {r}, {s}) is out of range: components must be within ±{limit}")]
    CoordinateOutOfRange { q: i32, r: i32, s: i32, limit: i32 },

    /// A tile record could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A tile was moved between states in an order the lifecycle forbids.
    #[error("tile {hex} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        hex: Hex,
        from: TileState,
        to: TileState,
    },

    /// A region referenced a tile that is not in the tile set.
    #[error("tile {0} is not part of the tile set")]
    UnknownTile(Hex),

    /// Parameters failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding or encoding an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MapError::Io {
            path: path.into(),
            source,
        }
    }
}
