//! Grid dimensions from source pixel dimensions.
//!
//! Two policies exist and are never mixed: a fixed bound on columns/rows, or
//! a grid derived from glyph metrics. [`target_grid`] dispatches on the
//! configured [`RescalePolicy`].

use ca_core::config::RescalePolicy;
use ca_core::error::CoreError;
use ca_core::traits::MetricsSource;

/// Fit `width × height` inside `max_width × max_height`, preserving the
/// aspect ratio. Never upscales; both results are at least 1.
///
/// Width is clamped first; if the height still exceeds `max_height`, the
/// height is clamped and the width recomputed from the original ratio.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] if either input is zero.
///
/// # Example
/// ```
/// use ca_source::dimensions::fit_within;
/// assert_eq!(fit_within(200, 100, 200, 200).unwrap(), (200, 100));
/// assert_eq!(fit_within(500, 100, 200, 200).unwrap(), (200, 40));
/// assert_eq!(fit_within(100, 500, 200, 200).unwrap(), (40, 200));
/// ```
pub fn fit_within(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> Result<(u32, u32), CoreError> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    let (w, h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(max_width.max(1)), u64::from(max_height.max(1)));

    let (mut new_w, mut new_h) = (w, h);
    if new_w > max_w {
        new_w = max_w;
        new_h = h * max_w / w;
    }
    if new_h > max_h {
        new_h = max_h;
        new_w = w * max_h / h;
    }

    Ok((new_w.max(1) as u32, new_h.max(1) as u32))
}

/// Grid chosen by the glyph-metric policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    /// Font size (pixels) the grid was derived from.
    pub font_size: u32,
    /// Columns: `width / glyph_width`.
    pub cols: u32,
    /// Rows: `height / glyph_height`.
    pub rows: u32,
}

/// Pick the largest font size in `min_size..=max_size` whose glyphs tile the
/// source into at least `min_cells` columns and rows. Falls back to
/// `min_size` when no size qualifies. Remainders are discarded; both results
/// are at least 1.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] if either input is zero.
///
/// # Example
/// ```
/// use ca_core::metrics::FontMetrics;
/// use ca_source::dimensions::glyph_grid;
/// let grid = glyph_grid(800, 1600, &FontMetrics::new(8, 16), 6, 24, 50).unwrap();
/// assert_eq!((grid.cols, grid.rows), (100, 100));
/// ```
pub fn glyph_grid(
    width: u32,
    height: u32,
    metrics: &dyn MetricsSource,
    min_size: u32,
    max_size: u32,
    min_cells: u32,
) -> Result<GlyphGrid, CoreError> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    let min_size = min_size.max(1);
    let grid_at = |size: u32| {
        let m = metrics.metrics_at(size as f32);
        GlyphGrid {
            font_size: size,
            cols: width / m.glyph_width.max(1),
            rows: height / m.glyph_height.max(1),
        }
    };

    let chosen = (min_size..=max_size.max(min_size))
        .map(grid_at)
        .filter(|g| g.cols >= min_cells && g.rows >= min_cells)
        .last()
        .unwrap_or_else(|| {
            log::debug!(
                "Aucune taille de {} ne donne {min_cells} cellules, repli sur {min_size}px",
                metrics.name()
            );
            grid_at(min_size)
        });

    Ok(GlyphGrid {
        cols: chosen.cols.max(1),
        rows: chosen.rows.max(1),
        ..chosen
    })
}

/// Grid picked for one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetGrid {
    /// Columns.
    pub cols: u32,
    /// Rows.
    pub rows: u32,
    /// Font size the grid was measured at. `None` under `FixedBound`, which
    /// leaves the render size to the configuration.
    pub font_size: Option<u32>,
}

/// Columns × rows for a source of `width × height` under `policy`.
///
/// `metrics` is consulted only by [`RescalePolicy::GlyphMetric`].
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] if either input is zero.
///
/// # Example
/// ```
/// use ca_core::config::RescalePolicy;
/// use ca_core::metrics::FontMetrics;
/// use ca_source::dimensions::target_grid;
/// let fixed = RescalePolicy::FixedBound { max_width: 200, max_height: 200 };
/// let grid = target_grid(500, 100, &fixed, &FontMetrics::FALLBACK).unwrap();
/// assert_eq!((grid.cols, grid.rows, grid.font_size), (200, 40, None));
/// ```
pub fn target_grid(
    width: u32,
    height: u32,
    policy: &RescalePolicy,
    metrics: &dyn MetricsSource,
) -> Result<TargetGrid, CoreError> {
    match *policy {
        RescalePolicy::FixedBound {
            max_width,
            max_height,
        } => {
            let (cols, rows) = fit_within(width, height, max_width, max_height)?;
            Ok(TargetGrid {
                cols,
                rows,
                font_size: None,
            })
        }
        RescalePolicy::GlyphMetric {
            min_size,
            max_size,
            min_cells,
        } => {
            let grid = glyph_grid(width, height, metrics, min_size, max_size, min_cells)?;
            log::debug!(
                "Grille {}×{} à {}px ({})",
                grid.cols,
                grid.rows,
                grid.font_size,
                metrics.name()
            );
            Ok(TargetGrid {
                cols: grid.cols,
                rows: grid.rows,
                font_size: Some(grid.font_size),
            })
        }
    }
}
