use ca_core::frame::Rgb;
use image::RgbImage;

use crate::error::RenderError;
use crate::glyphs::GlyphSet;
use crate::sink::{ArtifactId, ArtifactSink};

/// Vérifie la forme texte/couleurs ; renvoie (colonnes max, lignes).
fn validate(lines: &[&str], colors: &[Vec<Rgb>]) -> Result<(usize, usize), RenderError> {
    if lines.len() != colors.len() {
        return Err(RenderError::GridMismatch {
            row: lines.len().min(colors.len()),
            glyphs: lines.len(),
            colors: colors.len(),
        });
    }
    let mut max_len = 0;
    for (row, (line, color_row)) in lines.iter().zip(colors).enumerate() {
        let glyphs = line.chars().count();
        if glyphs != color_row.len() {
            return Err(RenderError::GridMismatch {
                row,
                glyphs,
                colors: color_row.len(),
            });
        }
        max_len = max_len.max(glyphs);
    }
    if max_len == 0 {
        return Err(RenderError::EmptyArt);
    }
    Ok((max_len, lines.len()))
}

/// Redessine un bloc de texte coloré en image RGB et la persiste via `sink`.
///
/// Taille : `glyph_width × plus longue ligne` par `glyph_height × rangées`,
/// avec les métriques du jeu de glyphes effectivement utilisé. Fond noir ;
/// chaque glyphe est teinté par sa couleur, pondérée par sa couverture.
///
/// # Errors
/// [`RenderError::GridMismatch`] if `text` and `colors` disagree,
/// [`RenderError::EmptyArt`] if there is nothing to draw,
/// [`RenderError::Allocation`] if the image would be too large, or any
/// error from the sink.
///
/// # Example
/// ```
/// use ca_export::{GlyphSet, MemorySink, ArtifactId, render_art_to_image};
/// let text = "@@@@@\n@@@@@\n@@@@@\n";
/// let colors = vec![vec![(255, 0, 0); 5]; 3];
/// let id = ArtifactId::from_content(text, &colors);
/// let mut sink = MemorySink::default();
/// let img = render_art_to_image(text, &colors, &GlyphSet::builtin(), &mut sink, &id).unwrap();
/// assert_eq!(img.dimensions(), (40, 48));
/// ```
pub fn render_art_to_image(
    text: &str,
    colors: &[Vec<Rgb>],
    glyphs: &GlyphSet,
    sink: &mut dyn ArtifactSink,
    id: &ArtifactId,
) -> Result<RgbImage, RenderError> {
    let lines: Vec<&str> = text.lines().collect();
    let (cols, rows) = validate(&lines, colors)?;

    let metrics = glyphs.metrics();
    let (gw, gh) = (metrics.glyph_width, metrics.glyph_height);
    let too_large = || RenderError::Allocation {
        width: cols,
        height: rows,
    };
    let width = u32::try_from(cols)
        .ok()
        .and_then(|c| c.checked_mul(gw))
        .ok_or_else(too_large)?;
    let height = u32::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(gh))
        .ok_or_else(too_large)?;
    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3));
    if bytes.is_none() {
        return Err(too_large());
    }

    let mut img = RgbImage::new(width, height);

    for (gy, (line, color_row)) in lines.iter().zip(colors).enumerate() {
        let y0 = gy as u32 * gh;
        for (gx, (ch, &(r, g, b))) in line.chars().zip(color_row).enumerate() {
            let mask = glyphs.mask(ch);
            let x0 = gx as u32 * gw;
            for cy in 0..gh {
                for cx in 0..gw {
                    let alpha = u16::from(mask[(cy * gw + cx) as usize]);
                    if alpha == 0 {
                        continue;
                    }
                    let tint = |c: u8| ((u16::from(c) * alpha + 127) / 255) as u8;
                    img.put_pixel(x0 + cx, y0 + cy, image::Rgb([tint(r), tint(g), tint(b)]));
                }
            }
        }
    }

    sink.store(id, &img)?;
    log::debug!(
        "Rendu {cols}×{rows} glyphes → {width}×{height} px ({})",
        if glyphs.is_builtin() { "intégrés" } else { "police" }
    );
    Ok(img)
}
