use std::path::{Path, PathBuf};

use ca_core::frame::Raster;
use image::{DynamicImage, RgbImage};
use thiserror::Error;

/// Source bytes that cannot become a raster. Deterministic: never retried.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The bytes are not a recognizable or valid image.
    #[error("Image illisible : {0}")]
    Image(#[from] image::ImageError),

    /// The file could not be read.
    #[error("Impossible de lire {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The image decoded to zero pixels.
    #[error("Image vide : {width}×{height}")]
    Empty {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },
}

/// Décode des octets (PNG, JPEG, BMP, GIF) en raster RGB. Format deviné.
///
/// Alpha channels are dropped; only the first frame of an animation is kept.
///
/// # Errors
/// Returns [`DecodeError::Image`] for undecodable bytes and
/// [`DecodeError::Empty`] for zero-sized images.
///
/// # Example
/// ```
/// use ca_source::image::decode_bytes;
/// assert!(decode_bytes(b"definitely not an image").is_err());
/// ```
pub fn decode_bytes(bytes: &[u8]) -> Result<Raster, DecodeError> {
    let img = image::load_from_memory(bytes)?;
    from_dynamic(&img)
}

/// Charge une image depuis le disque.
///
/// # Errors
/// Returns [`DecodeError::Io`] if the file cannot be read, otherwise as
/// [`decode_bytes`].
///
/// # Example
/// ```no_run
/// use ca_source::image::load_image;
/// use std::path::Path;
/// let raster = load_image(Path::new("photo.jpg")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<Raster, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raster = decode_bytes(&bytes)?;
    log::debug!(
        "Image chargée : {} ({}×{})",
        path.display(),
        raster.width,
        raster.height
    );
    Ok(raster)
}

fn from_dynamic(img: &DynamicImage) -> Result<Raster, DecodeError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty { width, height });
    }
    Ok(from_rgb_image(rgb))
}

/// `image::RgbImage` → [`Raster`] without copying pixels.
#[must_use]
pub fn from_rgb_image(img: RgbImage) -> Raster {
    let (width, height) = img.dimensions();
    Raster {
        data: img.into_raw(),
        width,
        height,
    }
}
