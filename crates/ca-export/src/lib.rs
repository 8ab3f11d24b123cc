//! Glyph rendering and artifact persistence for chromascii.
//!
//! Resolves a monospace font (or the built-in bitmap glyphs), draws a
//! colored text block back into an RGB image and stores it through a sink.

pub mod error;
pub mod font;
pub mod glyphs;
pub mod rasterizer;
pub mod sink;

pub use error::RenderError;
pub use font::{
    FixedFont, FontProvider, NoFont, Platform, PlatformFonts, resolve_font, resolve_glyphs,
};
pub use glyphs::{GlyphSet, TrueTypeFont};
pub use rasterizer::render_art_to_image;
pub use sink::{ArtifactId, ArtifactSink, DirectorySink, MemorySink};
