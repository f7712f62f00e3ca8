//! Shared foundational types used across the Mosaic placement toolchain.
//!
//! This crate provides axis-aligned integer rectangle geometry and the
//! common result types used by every other Mosaic crate.

#![warn(missing_docs)]

pub mod geom;
pub mod result;

pub use geom::Rect;
pub use result::{InternalError, MosaicResult};
