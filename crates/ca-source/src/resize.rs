use anyhow::{Context, Result};
use ca_core::frame::Raster;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer as FirResizer};

/// Resizer réutilisable wrappant fast_image_resize (RGB, 3 bytes par pixel).
///
/// # Example
/// ```
/// use ca_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Copie de la source : fast_image_resize exige `&mut` sur l'entrée.
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new(),
            src_buf: Vec::new(),
        }
    }

    /// Resample `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// Same-size input is copied untouched.
    ///
    /// # Errors
    /// Returns an error if either raster is empty or the resize fails.
    ///
    /// # Example
    /// ```
    /// use ca_source::resize::Resizer;
    /// use ca_core::frame::Raster;
    /// let mut r = Resizer::new();
    /// let src = Raster::filled(100, 100, (200, 10, 10));
    /// let mut dst = Raster::new(50, 25);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// assert_eq!(dst.pixel(10, 10), (200, 10, 10));
    /// ```
    pub fn resize_into(&mut self, src: &Raster, dst: &mut Raster) -> Result<()> {
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x3)
                .context("Dimensions source invalides")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x3)
                .context("Dimensions destination invalides")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Échec du redimensionnement")?;

        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot resample of `src` to exactly `width × height`.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use ca_source::resize::resize_raster;
/// use ca_core::frame::Raster;
/// let src = Raster::new(500, 100);
/// let dst = resize_raster(&src, 200, 40).unwrap();
/// assert_eq!((dst.width, dst.height), (200, 40));
/// ```
pub fn resize_raster(src: &Raster, width: u32, height: u32) -> Result<Raster> {
    let mut dst = Raster::new(width, height);
    Resizer::new().resize_into(src, &mut dst)?;
    log::trace!(
        "Raster {}×{} → {}×{}",
        src.width,
        src.height,
        width,
        height
    );
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_is_a_copy() {
        let mut src = Raster::new(3, 2);
        src.set_pixel(1, 1, (7, 8, 9));
        let dst = resize_raster(&src, 3, 2).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn uniform_color_survives_downscale() {
        let src = Raster::filled(64, 48, (30, 120, 240));
        let dst = resize_raster(&src, 16, 12).unwrap();
        assert!(dst.pixels().all(|p| p == (30, 120, 240)));
    }

    #[test]
    fn resizer_is_reusable_across_sizes() {
        let mut r = Resizer::new();
        let a = Raster::filled(40, 40, (255, 255, 255));
        let b = Raster::filled(10, 80, (0, 0, 0));
        let mut out_a = Raster::new(8, 8);
        let mut out_b = Raster::new(5, 20);
        r.resize_into(&a, &mut out_a).unwrap();
        r.resize_into(&b, &mut out_b).unwrap();
        assert_eq!(out_a.pixel(4, 4), (255, 255, 255));
        assert_eq!(out_b.pixel(2, 10), (0, 0, 0));
    }
}
