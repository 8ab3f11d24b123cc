//! Raster sources for chromascii: decoding and grid-sized resampling.

pub mod dimensions;
pub mod image;
pub mod resize;

pub use dimensions::{GlyphGrid, TargetGrid, fit_within, glyph_grid, target_grid};
pub use crate::image::{DecodeError, decode_bytes, load_image};
pub use resize::{Resizer, resize_raster};
