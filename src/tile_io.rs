//! Tile CSV reading and writing.
//!
//! Occupied tiles are stored one per line as `q,r,s` with no header.
//! Labeled output adds the region label and kind: `q,r,s,region,kind`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::classify::Classification;
use crate::error::{MapError, MapResult};
use crate::hex::Hex;

/// Parse `q,r,s` rows. Blank lines and `#` comments are skipped.
pub fn parse_tiles(text: &str) -> MapResult<Vec<Hex>> {
    let mut hexes = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(MapError::Parse {
                line,
                message: format!("expected 3 fields, found {}", fields.len()),
            });
        }

        let mut values = [0i32; 3];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse().map_err(|_| MapError::Parse {
                line,
                message: format!("'{}' is not an integer", field),
            })?;
        }

        let hex = Hex::new(values[0], values[1], values[2]).map_err(|e| MapError::Parse {
            line,
            message: e.to_string(),
        })?;
        hexes.push(hex);
    }

    Ok(hexes)
}

/// Read occupied tiles from a CSV file.
pub fn read_tiles_csv(path: &Path) -> MapResult<Vec<Hex>> {
    let text = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
    parse_tiles(&text)
}

/// Write occupied tiles as `q,r,s` rows.
pub fn write_tiles_csv(path: &Path, hexes: &[Hex]) -> MapResult<()> {
    let file = File::create(path).map_err(|e| MapError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for hex in hexes {
        writeln!(writer, "{},{},{}", hex.q, hex.r, hex.s).map_err(|e| MapError::io(path, e))?;
    }

    writer.flush().map_err(|e| MapError::io(path, e))
}

/// Write every room and junction tile as `q,r,s,region,kind`.
pub fn write_labeled_csv(path: &Path, classification: &Classification) -> MapResult<()> {
    let file = File::create(path).map_err(|e| MapError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for labeled in classification.labeled() {
        for hex in labeled.region.iter() {
            writeln!(
                writer,
                "{},{},{},{},{}",
                hex.q,
                hex.r,
                hex.s,
                labeled.label,
                labeled.category.display_name()
            )
            .map_err(|e| MapError::io(path, e))?;
        }
    }

    writer.flush().map_err(|e| MapError::io(path, e))
}
