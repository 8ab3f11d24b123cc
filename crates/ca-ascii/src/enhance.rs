use ca_core::color::{apply_contrast, apply_hsv_boost, denormalize, normalize};
use ca_core::config::EnhanceConfig;
use ca_core::frame::{Raster, Rgb};

/// Rehaussement couleur par pixel : contraste, puis boost HSV (S et V).
///
/// Chaque pixel est traité indépendamment de ses voisins.
///
/// # Example
/// ```
/// use ca_ascii::enhance::ColorEnhancer;
/// let e = ColorEnhancer::default();
/// assert_eq!(e.enhance_pixel((0, 0, 0)), (0, 0, 0));
/// assert_eq!(e.enhance_pixel((255, 255, 255)), (255, 255, 255));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorEnhancer {
    factors: EnhanceConfig,
}

impl ColorEnhancer {
    /// Enhancer using the given boost factors.
    #[must_use]
    pub fn new(factors: EnhanceConfig) -> Self {
        Self { factors }
    }

    /// Enhance one pixel.
    #[inline]
    #[must_use]
    pub fn enhance_pixel(&self, rgb: Rgb) -> Rgb {
        let (r, g, b) = normalize(rgb);
        let k = self.factors.contrast;
        let (r, g, b) = (apply_contrast(r, k), apply_contrast(g, k), apply_contrast(b, k));
        let (r, g, b) = apply_hsv_boost(
            r,
            g,
            b,
            self.factors.saturation,
            self.factors.brightness,
        );
        denormalize(r, g, b)
    }

    /// Enhance a whole raster into a new one of the same size.
    ///
    /// # Example
    /// ```
    /// use ca_ascii::enhance::ColorEnhancer;
    /// use ca_core::frame::Raster;
    /// let src = Raster::filled(4, 3, (20, 40, 200));
    /// let out = ColorEnhancer::default().apply(&src);
    /// assert_eq!((out.width, out.height), (4, 3));
    /// ```
    #[must_use]
    pub fn apply(&self, src: &Raster) -> Raster {
        let mut data = Vec::with_capacity(src.data.len());
        for px in src.pixels() {
            let (r, g, b) = self.enhance_pixel(px);
            data.extend_from_slice(&[r, g, b]);
        }
        Raster {
            data,
            width: src.width,
            height: src.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grays_stay_gray() {
        let e = ColorEnhancer::default();
        for v in (0..=255u8).step_by(5) {
            let (r, g, b) = e.enhance_pixel((v, v, v));
            assert_eq!(r, g, "gris {v} devenu chromatique");
            assert_eq!(g, b, "gris {v} devenu chromatique");
        }
    }

    #[test]
    fn mid_gray_is_brightened() {
        let (r, _, _) = ColorEnhancer::default().enhance_pixel((128, 128, 128));
        // contraste neutre à 0.5, puis V × 1.2
        assert!((150..=156).contains(&r), "got {r}");
    }

    #[test]
    fn saturation_boost_pushes_channels_apart() {
        let e = ColorEnhancer::new(EnhanceConfig {
            contrast: 1.0,
            saturation: 1.5,
            brightness: 1.0,
        });
        let (r, g, b) = e.enhance_pixel((200, 100, 100));
        assert_eq!(r, 200);
        assert!(g < 100 && b < 100);
        assert_eq!(g, b);
    }

    #[test]
    fn neutral_factors_are_identity() {
        let e = ColorEnhancer::new(EnhanceConfig {
            contrast: 1.0,
            saturation: 1.0,
            brightness: 1.0,
        });
        for rgb in [(0, 0, 0), (12, 200, 99), (255, 1, 128), (255, 255, 255)] {
            let out = e.enhance_pixel(rgb);
            assert!((i16::from(out.0) - i16::from(rgb.0)).abs() <= 1);
            assert!((i16::from(out.1) - i16::from(rgb.1)).abs() <= 1);
            assert!((i16::from(out.2) - i16::from(rgb.2)).abs() <= 1);
        }
    }

    #[test]
    fn apply_keeps_dimensions_and_input() {
        let src = Raster::filled(3, 2, (90, 30, 160));
        let copy = src.clone();
        let out = ColorEnhancer::default().apply(&src);
        assert_eq!(src, copy);
        assert_eq!(out.data.len(), src.data.len());
        assert_eq!((out.width, out.height), (3, 2));
    }
}
