use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A character ramp needs at least two glyphs to encode luminance.
    #[error("Rampe de caractères trop courte : {len} glyphe(s), minimum 2")]
    RampTooShort {
        /// Number of glyphs supplied.
        len: usize,
    },

    /// Pixel data length does not match the declared dimensions.
    #[error("Buffer de {len} octets incompatible avec {width}×{height} RGB")]
    BufferSize {
        /// Actual byte count.
        len: usize,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },

    /// A ramp glyph is a control character and would break the text layout.
    #[error("Glyphe de contrôle {ch:?} interdit dans la rampe (position {index})")]
    ControlGlyph {
        /// Offending character.
        ch: char,
        /// Its position in the ramp.
        index: usize,
    },
}
