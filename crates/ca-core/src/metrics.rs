use crate::traits::MetricsSource;

/// Largeur de cellule du jeu de glyphes intégré (pixels).
pub const FALLBACK_GLYPH_WIDTH: u32 = 8;
/// Hauteur de cellule du jeu de glyphes intégré (pixels).
pub const FALLBACK_GLYPH_HEIGHT: u32 = 16;

/// Pixel size of one monospaced glyph cell.
///
/// # Example
/// ```
/// use ca_core::metrics::FontMetrics;
/// let m = FontMetrics::FALLBACK;
/// assert_eq!((m.glyph_width, m.glyph_height), (8, 16));
/// assert_eq!(m.canvas_size(5, 3), (40, 48));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    /// Cell width in pixels (≥ 1).
    pub glyph_width: u32,
    /// Cell height in pixels (≥ 1).
    pub glyph_height: u32,
}

impl FontMetrics {
    /// Metrics of the built-in bitmap glyphs.
    pub const FALLBACK: Self = Self {
        glyph_width: FALLBACK_GLYPH_WIDTH,
        glyph_height: FALLBACK_GLYPH_HEIGHT,
    };

    /// Build metrics, flooring both sides at one pixel.
    #[must_use]
    pub fn new(glyph_width: u32, glyph_height: u32) -> Self {
        Self {
            glyph_width: glyph_width.max(1),
            glyph_height: glyph_height.max(1),
        }
    }

    /// Canvas size for a grid of `cols × rows` cells.
    #[must_use]
    pub fn canvas_size(&self, cols: u32, rows: u32) -> (u32, u32) {
        (cols * self.glyph_width, rows * self.glyph_height)
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Fixed metrics answer every size with themselves.
impl MetricsSource for FontMetrics {
    fn metrics_at(&self, _px_size: f32) -> FontMetrics {
        *self
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
