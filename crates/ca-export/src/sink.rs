use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ca_core::frame::Rgb;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};

use crate::error::RenderError;

/// Qualité JPEG par défaut des artefacts.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Identifiant d'un artefact rendu, utilisable comme nom de fichier.
///
/// # Example
/// ```
/// use ca_export::sink::ArtifactId;
/// let colors = vec![vec![(0, 0, 0); 2]];
/// let a = ArtifactId::from_content("@@\n", &colors);
/// let b = ArtifactId::from_content("@@\n", &colors);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Explicit id. Only ASCII letters, digits, `-` and `_` are accepted.
    ///
    /// # Errors
    /// Returns [`RenderError::InvalidId`] for an empty id or any other
    /// character (path separators included).
    ///
    /// # Example
    /// ```
    /// use ca_export::sink::ArtifactId;
    /// assert!(ArtifactId::new("cat-01").is_ok());
    /// assert!(ArtifactId::new("../etc").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, RenderError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(id))
        } else {
            Err(RenderError::InvalidId(id))
        }
    }

    /// Hash de contenu : 16 premiers octets d'un SHA-256 sur le texte et
    /// les couleurs, en hexadécimal.
    #[must_use]
    pub fn from_content(text: &str, colors: &[Vec<Rgb>]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        for row in colors {
            for &(r, g, b) in row {
                hasher.update([r, g, b]);
            }
        }
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..16]))
    }

    /// Id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination des images rendues.
pub trait ArtifactSink {
    /// Persist `image` under `id`.
    ///
    /// # Errors
    /// Returns [`RenderError`] on encode or I/O failure.
    fn store(&mut self, id: &ArtifactId, image: &RgbImage) -> Result<(), RenderError>;
}

/// Écrit `<dir>/<id>.jpg` via un fichier temporaire renommé atomiquement.
///
/// Un lecteur concurrent ne voit jamais de fichier partiel.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    quality: u8,
}

impl DirectorySink {
    /// Sink writing into `dir` at quality 95.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Override the JPEG quality (clamped to 1‥100).
    #[must_use]
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of the artifact `id`.
    #[must_use]
    pub fn path_for(&self, id: &ArtifactId) -> PathBuf {
        self.dir.join(format!("{id}.jpg"))
    }
}

impl ArtifactSink for DirectorySink {
    fn store(&mut self, id: &ArtifactId, image: &RgbImage) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.dir).map_err(io_at(&self.dir))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_at(&self.dir))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            JpegEncoder::new_with_quality(&mut writer, self.quality).encode_image(image)?;
            writer.flush().map_err(io_at(&self.dir))?;
        }

        let path = self.path_for(id);
        tmp.persist(&path).map_err(|e| RenderError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        log::info!("Artefact écrit : {}", path.display());
        Ok(())
    }
}

fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError {
    let path = path.to_path_buf();
    move |source| RenderError::Io { path, source }
}

/// Garde les images en mémoire (tests, appelants qui encodent eux-mêmes).
///
/// # Example
/// ```
/// use ca_export::sink::{ArtifactId, ArtifactSink, MemorySink};
/// use image::RgbImage;
/// let mut sink = MemorySink::default();
/// let id = ArtifactId::new("a").unwrap();
/// sink.store(&id, &RgbImage::new(2, 2)).unwrap();
/// assert_eq!(sink.get(&id).map(RgbImage::dimensions), Some((2, 2)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    images: Vec<(ArtifactId, RgbImage)>,
}

impl MemorySink {
    /// Last image stored under `id`.
    #[must_use]
    pub fn get(&self, id: &ArtifactId) -> Option<&RgbImage> {
        self.images
            .iter()
            .rev()
            .find(|(stored, _)| stored == id)
            .map(|(_, img)| img)
    }

    /// Number of stored images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// `true` if nothing was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn store(&mut self, id: &ArtifactId, image: &RgbImage) -> Result<(), RenderError> {
        self.images.push((id.clone(), image.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_depends_on_colors() {
        let a = ArtifactId::from_content("@\n", &[vec![(0, 0, 0)]]);
        let b = ArtifactId::from_content("@\n", &[vec![(0, 0, 1)]]);
        assert_ne!(a, b);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn explicit_id_rejects_separators() {
        assert!(ArtifactId::new("").is_err());
        assert!(ArtifactId::new("a/b").is_err());
        assert!(ArtifactId::new("a.jpg").is_err());
        assert_eq!(ArtifactId::new("run_42").unwrap().to_string(), "run_42");
    }

    #[test]
    fn directory_sink_writes_a_decodable_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("out"));
        let id = ArtifactId::new("sample").unwrap();
        let img = RgbImage::from_pixel(24, 16, image::Rgb([200, 30, 30]));
        sink.store(&id, &img).unwrap();

        let path = sink.path_for(&id);
        assert_eq!(path, dir.path().join("out").join("sample.jpg"));
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 16));
        // no temp file left behind
        assert_eq!(std::fs::read_dir(sink.dir()).unwrap().count(), 1);
    }

    #[test]
    fn storing_twice_replaces_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path()).with_quality(80);
        let id = ArtifactId::new("same").unwrap();
        sink.store(&id, &RgbImage::new(8, 8)).unwrap();
        sink.store(&id, &RgbImage::new(16, 8)).unwrap();
        let decoded = image::open(sink.path_for(&id)).unwrap();
        assert_eq!(decoded.width(), 16);
    }

    #[test]
    fn memory_sink_keeps_latest() {
        let mut sink = MemorySink::default();
        let id = ArtifactId::new("x").unwrap();
        sink.store(&id, &RgbImage::new(1, 1)).unwrap();
        sink.store(&id, &RgbImage::new(3, 1)).unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get(&id).map(RgbImage::width), Some(3));
    }
}
