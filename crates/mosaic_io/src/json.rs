//! JSON emission and re-reading of placement results.
//!
//! The output is a single object with keys `grid` (`{width, height}`),
//! `cells`, and `nets`, produced directly from the data model's serde
//! layout. Reading it back and refreshing the grid yields a placement
//! identical to the one written.

use mosaic_place::Placement;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while writing or reading placement JSON.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// The file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The JSON could not be serialized or deserialized.
    #[error("placement JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Serializes a placement to pretty-printed JSON.
pub fn placement_to_json(pl: &Placement) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(pl)?)
}

/// Deserializes a placement from JSON and rebuilds its occupancy grid.
pub fn placement_from_json(json: &str) -> Result<Placement, JsonError> {
    let mut pl: Placement = serde_json::from_str(json)?;
    pl.refresh_grid();
    Ok(pl)
}

/// Writes a placement to a JSON file.
pub fn write_placement(pl: &Placement, path: &Path) -> Result<(), JsonError> {
    let mut json = placement_to_json(pl)?;
    json.push('\n');
    fs::write(path, json).map_err(|source| JsonError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a placement back from a JSON file.
pub fn read_json(path: &Path) -> Result<Placement, JsonError> {
    let content = fs::read_to_string(path).map_err(|source| JsonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    placement_from_json(&content)
}
