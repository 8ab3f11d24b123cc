use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rendering or persisting an artifact.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Text block and color grid disagree on shape.
    #[error("Grille incohérente à la ligne {row} : {glyphs} glyphes pour {colors} couleurs")]
    GridMismatch {
        /// First offending row (or the shorter row count).
        row: usize,
        /// Glyphs (or lines) found.
        glyphs: usize,
        /// Colors (or color rows) found.
        colors: usize,
    },

    /// Nothing to draw.
    #[error("Art vide : aucun glyphe à dessiner")]
    EmptyArt,

    /// Output raster would not fit in memory.
    #[error("Image trop grande : {width}×{height} glyphes")]
    Allocation {
        /// Columns requested.
        width: usize,
        /// Rows requested.
        height: usize,
    },

    /// Font file unreadable or not a TrueType/OpenType face.
    #[error("Police invalide {path} : {reason}")]
    Font {
        /// Path of the font file.
        path: PathBuf,
        /// Parser or I/O message.
        reason: String,
    },

    /// Artifact id unusable as a file stem.
    #[error("Identifiant d'artefact invalide : {0:?}")]
    InvalidId(String),

    /// Image encoding failed.
    #[error("Encodage échoué : {0}")]
    Encode(#[from] image::ImageError),

    /// Filesystem failure while persisting.
    #[error("E/S sur {path} : {source}")]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}
