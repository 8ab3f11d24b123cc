//! Monospace font discovery.
//!
//! A [`FontProvider`] answers "where is a usable font?" with a path or
//! `None`. Callers never fail on `None`: they switch to the built-in glyphs.

use std::path::{Path, PathBuf};

use crate::glyphs::{GlyphSet, TrueTypeFont};

/// Host platform family, used to pick font candidate locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    /// Linux and other freedesktop systems.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
    /// Anything else: no known locations.
    Other,
}

impl Platform {
    /// Platform this binary was built for.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }
}

const LINUX_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/usr/share/fonts/gnu-free/FreeMono.otf",
];

const MACOS_FONTS: &[&str] = &[
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "/Library/Fonts/Courier New.ttf",
];

const WINDOWS_FONTS: &[&str] = &[
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\lucon.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Source of a font file path.
pub trait FontProvider {
    /// First usable font path, or `None` when nothing resolves.
    fn locate(&self) -> Option<PathBuf>;
}

/// Ordered candidate list for one platform; the first existing file wins.
///
/// # Example
/// ```
/// use ca_export::font::{FontProvider, Platform, PlatformFonts};
/// assert!(PlatformFonts::new(Platform::Other).locate().is_none());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PlatformFonts {
    platform: Platform,
}

impl PlatformFonts {
    /// Candidates for `platform`.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Candidates for the running platform.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Platform::current())
    }

    /// Candidate paths, in search order.
    #[must_use]
    pub fn candidates(&self) -> &'static [&'static str] {
        match self.platform {
            Platform::Linux => LINUX_FONTS,
            Platform::MacOs => MACOS_FONTS,
            Platform::Windows => WINDOWS_FONTS,
            Platform::Other => &[],
        }
    }
}

impl FontProvider for PlatformFonts {
    fn locate(&self) -> Option<PathBuf> {
        self.candidates()
            .iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .map(Path::to_path_buf)
    }
}

/// A single configured font path.
#[derive(Clone, Debug)]
pub struct FixedFont(pub PathBuf);

impl FontProvider for FixedFont {
    fn locate(&self) -> Option<PathBuf> {
        self.0.is_file().then(|| self.0.clone())
    }
}

/// Never resolves; forces the built-in glyphs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFont;

impl FontProvider for NoFont {
    fn locate(&self) -> Option<PathBuf> {
        None
    }
}

/// Locate and parse a font. Any failure is logged and yields `None`.
///
/// # Example
/// ```
/// use ca_export::font::{NoFont, resolve_font};
/// assert!(resolve_font(&NoFont).is_none());
/// ```
#[must_use]
pub fn resolve_font(provider: &dyn FontProvider) -> Option<TrueTypeFont> {
    let Some(path) = provider.locate() else {
        log::warn!("Aucune police trouvée, glyphes intégrés 8×16");
        return None;
    };
    match TrueTypeFont::load(&path) {
        Ok(font) => {
            log::info!("Police : {}", font.path().display());
            Some(font)
        }
        Err(e) => {
            log::warn!("{e}, glyphes intégrés 8×16");
            None
        }
    }
}

/// Glyph set for printable ASCII from `provider`, or the built-in set.
///
/// # Example
/// ```
/// use ca_export::font::{NoFont, resolve_glyphs};
/// let set = resolve_glyphs(&NoFont, 14.0);
/// assert!(set.is_builtin());
/// ```
#[must_use]
pub fn resolve_glyphs(provider: &dyn FontProvider, px_size: f32) -> GlyphSet {
    match resolve_font(provider) {
        Some(font) => GlyphSet::from_font(&font, px_size),
        None => GlyphSet::builtin(),
    }
}
