use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, point};
use ca_core::metrics::FontMetrics;
use ca_core::traits::MetricsSource;
use font8x8::{BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, LATIN_FONTS, UnicodeFonts};

use crate::error::RenderError;

/// ASCII imprimable, toujours pré-rasterisé.
const PRINTABLE_ASCII: std::ops::RangeInclusive<char> = ' '..='~';

/// Police TrueType/OpenType chargée en mémoire.
pub struct TrueTypeFont {
    font: FontVec,
    path: PathBuf,
    label: String,
}

impl TrueTypeFont {
    /// Read and parse a font file.
    ///
    /// # Errors
    /// Returns [`RenderError::Io`] if the file cannot be read and
    /// [`RenderError::Font`] if it is not a usable font.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, path)
    }

    /// Parse font bytes; `path` is kept for diagnostics only.
    ///
    /// # Errors
    /// Returns [`RenderError::Font`] if the bytes are not a usable font.
    pub fn from_bytes(data: Vec<u8>, path: &Path) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(data).map_err(|e| RenderError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let label = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            font,
            path: path.to_path_buf(),
            label,
        })
    }

    /// Path the font was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` if the face has a real glyph for `ch` (whitespace always counts).
    #[must_use]
    pub fn can_render(&self, ch: char) -> bool {
        ch.is_whitespace() || self.font.glyph_id(ch).0 != 0
    }

    /// Cellule monospace à `px_size` : avance de 'M' × hauteur de ligne.
    fn cell_metrics(&self, px_size: f32) -> FontMetrics {
        let scale = PxScale::from(px_size);
        let font = &self.font;

        let v_advance = font.ascent_unscaled() - font.descent_unscaled() + font.line_gap_unscaled();
        let height = (v_advance * scale.y / font.height_unscaled()).ceil() as u32;

        let m_glyph = font.glyph_id('M');
        let h_advance = font.h_advance_unscaled(m_glyph);
        let width = (h_advance * scale.x / font.height_unscaled()).ceil() as u32;

        FontMetrics::new(width, height)
    }

    /// Coverage mask of `ch` in a `metrics` cell, or `None` for .notdef.
    fn coverage(&self, ch: char, px_size: f32, metrics: FontMetrics) -> Option<Vec<u8>> {
        let font = &self.font;
        let gid = font.glyph_id(ch);
        if gid.0 == 0 && !ch.is_whitespace() {
            return None;
        }

        let (cw, chh) = (metrics.glyph_width, metrics.glyph_height);
        let mut buffer = vec![0u8; (cw * chh) as usize];

        let scale = PxScale::from(px_size);
        let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
        let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));

        if let Some(outline) = font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            #[allow(clippy::cast_possible_wrap)]
            outline.draw(|x, y, v| {
                let px = (x as i32 + bounds.min.x as i32).max(0) as u32;
                let py = (y as i32 + bounds.min.y as i32).max(0) as u32;
                if px < cw && py < chh {
                    let idx = (py * cw + px) as usize;
                    buffer[idx] = buffer[idx].max((v * 255.0).round() as u8);
                }
            });
        }
        Some(buffer)
    }
}

impl MetricsSource for TrueTypeFont {
    fn metrics_at(&self, px_size: f32) -> FontMetrics {
        self.cell_metrics(px_size)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Bitmap 8×8 intégré, lignes doublées pour une cellule 8×16.
fn builtin_bitmap(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
}

fn builtin_coverage(ch: char) -> Option<Vec<u8>> {
    let bitmap = builtin_bitmap(ch)?;
    let FontMetrics {
        glyph_width: cw,
        glyph_height: chh,
    } = FontMetrics::FALLBACK;
    let mut buffer = vec![0u8; (cw * chh) as usize];
    for py in 0..chh {
        let bits = bitmap[(py / 2) as usize];
        for px in 0..cw {
            // bit de poids faible = pixel le plus à gauche
            if (bits >> px) & 1 == 1 {
                buffer[(py * cw + px) as usize] = 255;
            }
        }
    }
    Some(buffer)
}

/// Atlas logiciel : masques de couverture par caractère + métriques de cellule.
///
/// Les métriques sont toujours celles du jeu effectivement utilisé.
///
/// # Example
/// ```
/// use ca_export::glyphs::GlyphSet;
/// let set = GlyphSet::builtin();
/// assert!(set.is_builtin());
/// assert_eq!((set.metrics().glyph_width, set.metrics().glyph_height), (8, 16));
/// assert!(set.mask('@').iter().any(|&a| a == 255));
/// assert!(set.mask(' ').iter().all(|&a| a == 0));
/// ```
pub struct GlyphSet {
    metrics: FontMetrics,
    masks: HashMap<char, Vec<u8>>,
    empty: Vec<u8>,
    builtin: bool,
}

impl GlyphSet {
    fn with_metrics(metrics: FontMetrics, builtin: bool) -> Self {
        Self {
            metrics,
            masks: HashMap::new(),
            empty: vec![0u8; (metrics.glyph_width * metrics.glyph_height) as usize],
            builtin,
        }
    }

    fn cache(
        &mut self,
        chars: impl IntoIterator<Item = char>,
        render: impl Fn(char) -> Option<Vec<u8>>,
    ) {
        for ch in chars {
            if self.masks.contains_key(&ch) {
                continue;
            }
            if let Some(mask) = render(ch) {
                self.masks.insert(ch, mask);
            }
        }
    }

    /// Built-in 8×16 glyphs for printable ASCII.
    #[must_use]
    pub fn builtin() -> Self {
        Self::builtin_for("")
    }

    /// Built-in glyphs for printable ASCII plus every character of `text`
    /// the bitmap tables know.
    #[must_use]
    pub fn builtin_for(text: &str) -> Self {
        let mut set = Self::with_metrics(FontMetrics::FALLBACK, true);
        set.cache(PRINTABLE_ASCII.chain(text.chars()), builtin_coverage);
        set
    }

    /// Rasterize printable ASCII from `font` at `px_size`.
    #[must_use]
    pub fn from_font(font: &TrueTypeFont, px_size: f32) -> Self {
        Self::from_font_for(font, px_size, "")
    }

    fn from_font_for(font: &TrueTypeFont, px_size: f32, text: &str) -> Self {
        let metrics = font.cell_metrics(px_size);
        let mut set = Self::with_metrics(metrics, false);
        set.cache(PRINTABLE_ASCII.chain(text.chars()), |ch| {
            font.coverage(ch, px_size, metrics)
        });
        set
    }

    /// Glyph set able to draw `text`.
    ///
    /// Uses `font` when it can render at least one visible character of
    /// `text`; otherwise (or without a font) switches to the built-in glyphs.
    ///
    /// # Example
    /// ```
    /// use ca_export::glyphs::GlyphSet;
    /// let set = GlyphSet::for_text(None, 12.0, "@@\n..\n");
    /// assert!(set.is_builtin());
    /// ```
    #[must_use]
    pub fn for_text(font: Option<&TrueTypeFont>, px_size: f32, text: &str) -> Self {
        let Some(font) = font else {
            return Self::builtin_for(text);
        };
        let visible: BTreeSet<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if !visible.is_empty() && !visible.iter().any(|&c| font.can_render(c)) {
            log::warn!(
                "{} ne couvre aucun glyphe du texte, repli sur les glyphes intégrés",
                font.name()
            );
            return Self::builtin_for(text);
        }
        Self::from_font_for(font, px_size, text)
    }

    /// Cell metrics of this set.
    #[must_use]
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// `true` for the built-in bitmap glyphs.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Coverage mask (`glyph_width × glyph_height`, row-major, 0‥255).
    /// Unknown characters draw as blank.
    #[must_use]
    pub fn mask(&self, ch: char) -> &[u8] {
        self.masks.get(&ch).unwrap_or(&self.empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontProvider, PlatformFonts};
    use crate::rasterizer::render_art_to_image;
    use crate::sink::{ArtifactId, MemorySink};

    #[test]
    fn builtin_masks_fill_the_cell() {
        let set = GlyphSet::builtin();
        for ch in PRINTABLE_ASCII {
            assert_eq!(set.mask(ch).len(), 8 * 16, "masque de {ch:?}");
        }
    }

    #[test]
    fn builtin_rows_are_doubled() {
        let set = GlyphSet::builtin();
        let mask = set.mask('#');
        for row in (0..16).step_by(2) {
            assert_eq!(mask[row * 8..row * 8 + 8], mask[(row + 1) * 8..(row + 2) * 8]);
        }
    }

    #[test]
    fn builtin_covers_block_ramp() {
        let set = GlyphSet::builtin_for("░▒▓█");
        assert!(set.mask('█').iter().all(|&a| a == 255));
        let light = set.mask('░').iter().filter(|&&a| a > 0).count();
        let dark = set.mask('▓').iter().filter(|&&a| a > 0).count();
        assert!(light < dark);
    }

    #[test]
    fn unknown_char_is_blank() {
        let set = GlyphSet::builtin();
        assert!(set.mask('\u{1F600}').iter().all(|&a| a == 0));
    }

    fn system_font() -> Option<TrueTypeFont> {
        let path = PlatformFonts::current().locate()?;
        TrueTypeFont::load(&path).ok()
    }

    #[test]
    fn uncovered_text_switches_a_real_font_to_builtin() {
        let Some(font) = system_font() else {
            return;
        };
        // plane 15/16 private use and unassigned code points
        let text: String = ['\u{F0000}', '\u{F0001}', '\u{10FFFD}', '\u{E01EF}']
            .into_iter()
            .filter(|&c| !font.can_render(c))
            .collect();
        if text.is_empty() {
            return;
        }
        let width = text.chars().count();
        let block = format!("{text}\n{text}\n");

        let set = GlyphSet::for_text(Some(&font), 20.0, &block);
        assert!(set.is_builtin());
        assert_eq!(set.metrics(), FontMetrics::FALLBACK);

        let colors = vec![vec![(200, 100, 50); width]; 2];
        let id = ArtifactId::from_content(&block, &colors);
        let img = render_art_to_image(&block, &colors, &set, &mut MemorySink::default(), &id).unwrap();
        assert_eq!(img.dimensions(), (8 * width as u32, 16 * 2));
    }

    #[test]
    fn covered_text_keeps_the_real_font() {
        let Some(font) = system_font() else {
            return;
        };
        let set = GlyphSet::for_text(Some(&font), 20.0, "@#\n. \n");
        assert!(!set.is_builtin());
        assert_eq!(set.metrics(), font.metrics_at(20.0));
        assert!(set.mask('@').iter().any(|&a| a > 0));
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let err = TrueTypeFont::from_bytes(vec![0, 1, 2, 3], Path::new("bad.ttf"));
        assert!(matches!(err, Err(RenderError::Font { .. })));
    }

    #[test]
    fn missing_font_file_is_io_error() {
        let err = TrueTypeFont::load(Path::new("/nonexistent/chromascii/font.ttf"));
        assert!(matches!(err, Err(RenderError::Io { .. })));
    }
}
