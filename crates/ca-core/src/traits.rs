use crate::metrics::FontMetrics;

/// Fournit les métriques de glyphe d'une police à une taille donnée.
///
/// Implémenté par : la police TrueType résolue, le jeu intégré (métriques fixes).
///
/// # Example
/// ```
/// use ca_core::traits::MetricsSource;
/// use ca_core::metrics::FontMetrics;
///
/// struct Fixed;
/// impl MetricsSource for Fixed {
///     fn metrics_at(&self, _px: f32) -> FontMetrics { FontMetrics::FALLBACK }
///     fn name(&self) -> &str { "fixed" }
/// }
/// assert_eq!(Fixed.metrics_at(12.0).glyph_height, 16);
/// ```
pub trait MetricsSource {
    /// Cell metrics when the font is rendered at `px_size` pixels.
    fn metrics_at(&self, px_size: f32) -> FontMetrics;

    /// Nom lisible pour les logs.
    fn name(&self) -> &str;
}
