use anyhow::{Context, Result};
use ca_core::config::ArtConfig;
use ca_core::error::CoreError;
use ca_core::frame::{ArtCell, ArtGrid, Raster, Rgb};
use ca_core::traits::MetricsSource;
use ca_source::dimensions::target_grid;
use ca_source::resize::resize_raster;

use crate::enhance::ColorEnhancer;
use crate::luminance::process_luminance;

/// Résultat d'une conversion : bloc de texte + grille de couleurs parallèle.
///
/// Chaque ligne de `text` se termine par `'\n'` et contient exactement
/// `width` glyphes ; `colors` a `height` rangées de `width` couleurs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertedArt {
    /// Glyphes, une ligne par rangée.
    pub text: String,
    /// Couleur rehaussée de chaque glyphe.
    pub colors: Vec<Vec<Rgb>>,
    /// Colonnes.
    pub width: u32,
    /// Rangées.
    pub height: u32,
    /// Taille de police (px) mesurée par la politique `GlyphMetric`, à
    /// réutiliser au rendu. `None` sous `FixedBound`.
    pub font_size: Option<u32>,
}

impl ConvertedArt {
    /// Fusionne texte et couleurs en une [`ArtGrid`].
    ///
    /// # Example
    /// ```
    /// use ca_ascii::convert_to_art;
    /// use ca_core::config::ArtConfig;
    /// use ca_core::frame::Raster;
    /// use ca_core::metrics::FontMetrics;
    ///
    /// let art = convert_to_art(&Raster::new(3, 2), &ArtConfig::default(), &FontMetrics::FALLBACK).unwrap();
    /// let grid = art.into_grid();
    /// assert_eq!((grid.width, grid.height), (3, 2));
    /// assert_eq!(grid.get(2, 1).ch, '@');
    /// ```
    #[must_use]
    pub fn into_grid(self) -> ArtGrid {
        let cells = self
            .text
            .lines()
            .zip(&self.colors)
            .flat_map(|(line, row)| line.chars().zip(row).map(|(ch, &fg)| ArtCell { ch, fg }))
            .collect();
        ArtGrid {
            cells,
            width: self.width,
            height: self.height,
        }
    }
}

/// Convertit un raster en texte coloré : Rescale → Enhance → Map.
///
/// `metrics` n'est consulté que par la politique `GlyphMetric`.
/// L'entrée n'est jamais modifiée.
///
/// # Errors
/// Returns an error if the raster is empty, the configured ramp is unusable,
/// or resampling fails.
///
/// # Example
/// ```
/// use ca_ascii::convert_to_art;
/// use ca_core::config::ArtConfig;
/// use ca_core::frame::Raster;
/// use ca_core::metrics::FontMetrics;
///
/// let white = Raster::filled(2, 2, (255, 255, 255));
/// let art = convert_to_art(&white, &ArtConfig::default(), &FontMetrics::FALLBACK).unwrap();
/// assert_eq!(art.text, "  \n  \n");
/// assert_eq!(art.colors, vec![vec![(255, 255, 255); 2]; 2]);
/// ```
pub fn convert_to_art(
    raster: &Raster,
    config: &ArtConfig,
    metrics: &dyn MetricsSource,
) -> Result<ConvertedArt> {
    if raster.is_empty() {
        return Err(CoreError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        }
        .into());
    }
    let ramp = config.character_ramp()?;

    let target = target_grid(raster.width, raster.height, &config.rescale, metrics)?;
    let (cols, rows) = (target.cols, target.rows);
    let resized = resize_raster(raster, cols, rows)
        .with_context(|| format!("Redimensionnement vers {cols}×{rows}"))?;
    let enhanced = ColorEnhancer::new(config.enhance).apply(&resized);
    let grid = process_luminance(&enhanced, &ramp);

    log::debug!(
        "Conversion {}×{} px → {cols}×{rows} glyphes",
        raster.width,
        raster.height
    );

    Ok(ConvertedArt {
        text: grid.text_block(),
        colors: grid.color_grid(),
        width: cols,
        height: rows,
        font_size: target.font_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ca_core::charset::RampOrder;
    use ca_core::config::RescalePolicy;
    use ca_core::metrics::FontMetrics;

    fn convert(raster: &Raster, config: &ArtConfig) -> ConvertedArt {
        convert_to_art(raster, config, &FontMetrics::FALLBACK).unwrap()
    }

    #[test]
    fn black_square_is_all_ink() {
        let art = convert(&Raster::filled(2, 2, (0, 0, 0)), &ArtConfig::default());
        assert_eq!(art.text, "@@\n@@\n");
        assert_eq!(art.colors, vec![vec![(0, 0, 0); 2]; 2]);
    }

    #[test]
    fn white_square_is_blank() {
        let art = convert(&Raster::filled(2, 2, (255, 255, 255)), &ArtConfig::default());
        assert_eq!(art.text, "  \n  \n");
    }

    #[test]
    fn light_first_ramp_inverts_the_mapping() {
        let config = ArtConfig {
            ramp: " .:-=+*#%@".to_string(),
            ramp_order: RampOrder::LightFirst,
            ..ArtConfig::default()
        };
        let art = convert(&Raster::filled(2, 2, (0, 0, 0)), &config);
        assert_eq!(art.text, "  \n  \n");
    }

    #[test]
    fn shape_follows_fixed_bound() {
        let config = ArtConfig::default();
        let art = convert(&Raster::filled(500, 100, (10, 200, 30)), &config);
        assert_eq!((art.width, art.height), (200, 40));
        assert_eq!(art.text.lines().count(), 40);
        assert_eq!(art.colors.len(), 40);
        for (line, row) in art.text.lines().zip(&art.colors) {
            assert_eq!(line.chars().count(), 200);
            assert_eq!(row.len(), 200);
        }
        assert!(art.text.ends_with('\n'));
    }

    #[test]
    fn shape_follows_glyph_metric_policy() {
        let config = ArtConfig {
            rescale: RescalePolicy::GLYPH_METRIC_DEFAULT,
            ..ArtConfig::default()
        };
        let art = convert(&Raster::new(800, 1600), &config);
        assert_eq!((art.width, art.height), (100, 100));
        assert_eq!(art.font_size, Some(32));
    }

    #[test]
    fn fixed_bound_leaves_font_size_to_config() {
        let art = convert(&Raster::new(4, 4), &ArtConfig::default());
        assert_eq!(art.font_size, None);
    }

    #[test]
    fn control_glyph_ramp_never_reaches_the_text() {
        let config = ArtConfig {
            ramp: "@\n".to_string(),
            ..ArtConfig::default()
        };
        let white = Raster::filled(2, 2, (255, 255, 255));
        assert!(convert_to_art(&white, &config, &FontMetrics::FALLBACK).is_err());
    }

    #[test]
    fn conversion_is_deterministic() {
        let mut raster = Raster::new(37, 23);
        for y in 0..23 {
            for x in 0..37 {
                raster.set_pixel(x, y, ((x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8));
            }
        }
        let config = ArtConfig::default();
        assert_eq!(convert(&raster, &config), convert(&raster, &config));
    }

    #[test]
    fn into_grid_matches_text_and_colors() {
        let mut raster = Raster::new(3, 1);
        raster.set_pixel(1, 0, (255, 255, 255));
        let art = convert(&raster, &ArtConfig::default());
        let text = art.text.clone();
        let colors = art.colors.clone();
        let grid = art.into_grid();
        assert_eq!(grid.text_block(), text);
        assert_eq!(grid.color_grid(), colors);
        assert_eq!(grid.get(1, 0).ch, ' ');
    }

    #[test]
    fn empty_raster_is_rejected() {
        assert!(convert_to_art(&Raster::new(0, 4), &ArtConfig::default(), &FontMetrics::FALLBACK).is_err());
    }
}
