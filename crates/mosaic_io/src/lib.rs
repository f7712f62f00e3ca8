//! Input and output adapters for the Mosaic placement engine.
//!
//! The [`reader`] module parses the whitespace-separated text format into a
//! populated [`Placement`](mosaic_place::Placement); the [`json`] module
//! emits and re-reads the JSON result format used by downstream
//! visualization. Both are thin: all interesting behavior lives in
//! `mosaic_place`.

#![warn(missing_docs)]

pub mod json;
pub mod reader;

pub use json::{placement_from_json, placement_to_json, read_json, write_placement, JsonError};
pub use reader::{read_placement, ReadError};
