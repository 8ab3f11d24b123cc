//! Text-art conversion engine for chromascii.
//!
//! Turns a raster into a block of glyphs plus a parallel grid of colors:
//! rescale, enhance, then map each pixel through the character ramp.

pub mod assembler;
pub mod enhance;
pub mod luminance;

pub use assembler::{ConvertedArt, convert_to_art};
pub use enhance::ColorEnhancer;
