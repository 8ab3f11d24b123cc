use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::frame::Rgb;

/// 10 caractères, dense→clair, la rampe historique du service.
pub const RAMP_CLASSIC: &str = "@%#*+=-:. ";

/// 10 caractères, clair→dense, bon contraste sur fond noir.
pub const RAMP_COMPACT: &str = " .:-=+*#%@";

/// 70 caractères, Paul Bourke, résolution maximale (dense→clair).
pub const RAMP_FULL: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Blocs Unicode, pseudo-pixels (clair→dense).
pub const RAMP_BLOCKS: &str = " ░▒▓█";

/// Rampes nommées, sélectionnables par `[ramp] preset`.
///
/// # Example
/// ```
/// use ca_core::charset::{RampOrder, RampPreset};
/// let ramp = RampPreset::Blocks.ramp();
/// assert_eq!(ramp.order(), RampOrder::LightFirst);
/// assert_eq!(ramp.densest(), '█');
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RampPreset {
    /// [`RAMP_CLASSIC`], dense first.
    #[default]
    Classic,
    /// [`RAMP_COMPACT`], light first.
    Compact,
    /// [`RAMP_FULL`], dense first.
    Full,
    /// [`RAMP_BLOCKS`], light first.
    Blocks,
}

impl RampPreset {
    /// Glyphs as stored.
    #[must_use]
    pub fn glyphs(self) -> &'static str {
        match self {
            Self::Classic => RAMP_CLASSIC,
            Self::Compact => RAMP_COMPACT,
            Self::Full => RAMP_FULL,
            Self::Blocks => RAMP_BLOCKS,
        }
    }

    /// Ordering of [`Self::glyphs`].
    #[must_use]
    pub fn order(self) -> RampOrder {
        match self {
            Self::Classic | Self::Full => RampOrder::DenseFirst,
            Self::Compact | Self::Blocks => RampOrder::LightFirst,
        }
    }

    /// The preset as a ramp.
    #[must_use]
    pub fn ramp(self) -> CharacterRamp {
        CharacterRamp {
            glyphs: self.glyphs().chars().collect(),
            order: self.order(),
        }
    }
}

/// Which end of a ramp carries the most ink.
///
/// The mapper always indexes the ramp as stored, so the order decides what
/// dark pixels become: `DenseFirst` draws ink for shadows (dark text on a
/// light page), `LightFirst` draws ink for highlights (light text on black).
///
/// # Example
/// ```
/// use ca_core::charset::RampOrder;
/// assert_eq!(RampOrder::default(), RampOrder::DenseFirst);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RampOrder {
    /// First glyph is the densest ("@"), last the lightest (" ").
    #[default]
    DenseFirst,
    /// First glyph is the lightest, last the densest.
    LightFirst,
}

/// Luminance perceptuelle BT.601 : `0.299 R + 0.587 G + 0.114 B`, dans [0, 255].
///
/// # Example
/// ```
/// use ca_core::charset::luminance;
/// assert_eq!(luminance((0, 0, 0)), 0.0);
/// assert_eq!(luminance((255, 255, 255)), 255.0);
/// ```
#[inline]
#[must_use]
pub fn luminance(rgb: Rgb) -> f32 {
    // Poids entiers : le blanc pur tombe exactement sur 255.
    let weighted = 299 * u32::from(rgb.0) + 587 * u32::from(rgb.1) + 114 * u32::from(rgb.2);
    weighted as f32 / 1000.0
}

/// Séquence ordonnée et immuable de glyphes encodant la luminance.
///
/// # Example
/// ```
/// use ca_core::charset::{CharacterRamp, RampOrder};
/// let ramp = CharacterRamp::new("@#. ", RampOrder::DenseFirst).unwrap();
/// assert_eq!(ramp.map_luminance(0.0), '@');
/// assert_eq!(ramp.map_luminance(255.0), ' ');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterRamp {
    glyphs: Vec<char>,
    order: RampOrder,
}

impl CharacterRamp {
    /// Build a ramp from `glyphs`, declaring which end is dense.
    ///
    /// # Errors
    /// Returns [`CoreError::RampTooShort`] if fewer than two glyphs are given
    /// and [`CoreError::ControlGlyph`] for a control character (`'\n'`,
    /// `'\t'`, ...), which would split or skew the text lines.
    pub fn new(glyphs: &str, order: RampOrder) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 {
            return Err(CoreError::RampTooShort { len: glyphs.len() });
        }
        if let Some((index, &ch)) = glyphs.iter().enumerate().find(|(_, c)| c.is_control()) {
            return Err(CoreError::ControlGlyph { ch, index });
        }
        Ok(Self { glyphs, order })
    }

    /// The same glyphs in the opposite order.
    ///
    /// # Example
    /// ```
    /// use ca_core::charset::{CharacterRamp, RampOrder};
    /// let ramp = CharacterRamp::new("@. ", RampOrder::DenseFirst).unwrap();
    /// let rev = ramp.reversed();
    /// assert_eq!(rev.order(), RampOrder::LightFirst);
    /// assert_eq!(rev.map_luminance(0.0), ' ');
    /// ```
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut glyphs = self.glyphs.clone();
        glyphs.reverse();
        let order = match self.order {
            RampOrder::DenseFirst => RampOrder::LightFirst,
            RampOrder::LightFirst => RampOrder::DenseFirst,
        };
        Self { glyphs, order }
    }

    /// Map a luminance value in [0, 255] to a glyph.
    ///
    /// `index = floor(L × (len − 1) / 255)`; out-of-range input saturates at
    /// the ramp ends.
    #[inline]
    #[must_use]
    pub fn map_luminance(&self, lum: f32) -> char {
        let last = self.glyphs.len() - 1;
        let idx = (lum.clamp(0.0, 255.0) * last as f32 / 255.0).floor() as usize;
        self.glyphs[idx.min(last)]
    }

    /// Map an RGB pixel to a glyph through its BT.601 luminance.
    ///
    /// # Example
    /// ```
    /// use ca_core::charset::{CharacterRamp, RampOrder};
    /// let ramp = CharacterRamp::new("@%#*+=-:. ", RampOrder::DenseFirst).unwrap();
    /// assert_eq!(ramp.map_rgb((0, 0, 0)), '@');
    /// assert_eq!(ramp.map_rgb((255, 255, 255)), ' ');
    /// ```
    #[inline]
    #[must_use]
    pub fn map_rgb(&self, rgb: Rgb) -> char {
        self.map_luminance(luminance(rgb))
    }

    /// Glyph with the most ink.
    #[must_use]
    pub fn densest(&self) -> char {
        match self.order {
            RampOrder::DenseFirst => self.glyphs[0],
            RampOrder::LightFirst => self.glyphs[self.glyphs.len() - 1],
        }
    }

    /// Glyph with the least ink (often a blank).
    #[must_use]
    pub fn lightest(&self) -> char {
        match self.order {
            RampOrder::DenseFirst => self.glyphs[self.glyphs.len() - 1],
            RampOrder::LightFirst => self.glyphs[0],
        }
    }

    /// Declared ordering.
    #[must_use]
    pub fn order(&self) -> RampOrder {
        self.order
    }

    /// Glyphs as stored.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Number of glyphs (always ≥ 2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`; kept for the `len`/`is_empty` pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl Default for CharacterRamp {
    fn default() -> Self {
        RampPreset::Classic.ramp()
    }
}
