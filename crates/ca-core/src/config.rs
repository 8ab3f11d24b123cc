use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{CharacterRamp, RAMP_CLASSIC, RampOrder, RampPreset};
use crate::error::CoreError;

/// Configuration complète d'une conversion + rendu.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ca_core::config::{ArtConfig, RescalePolicy};
/// let config = ArtConfig::default();
/// assert!(matches!(config.rescale, RescalePolicy::FixedBound { max_width: 200, .. }));
/// assert_eq!(config.jpeg_quality, 95);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ArtConfig {
    // === Grille ===
    /// Politique de dimensionnement de la grille.
    pub rescale: RescalePolicy,

    // === Couleur ===
    /// Facteurs de rehaussement appliqués avant le mapping.
    pub enhance: EnhanceConfig,

    // === Rampe ===
    /// Glyphes de la rampe, dans l'ordre déclaré par `ramp_order`.
    pub ramp: String,
    /// Quel bout de `ramp` porte l'encre.
    pub ramp_order: RampOrder,

    // === Rendu ===
    /// Police explicite. `None` = recherche par plateforme.
    pub font_path: Option<PathBuf>,
    /// Taille de police du rendu en pixels.
    pub font_size: f32,
    /// Qualité JPEG de l'artefact [1, 100].
    pub jpeg_quality: u8,
    /// Dossier de sortie des artefacts.
    pub output_dir: PathBuf,
}

/// Grid sizing policy. Exactly one is active per configuration.
///
/// # Example
/// ```
/// use ca_core::config::RescalePolicy;
/// let p = RescalePolicy::default();
/// assert_eq!(p, RescalePolicy::FixedBound { max_width: 200, max_height: 200 });
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "policy")]
pub enum RescalePolicy {
    /// Clamp width, then height, preserving the aspect ratio. Never upscales.
    FixedBound {
        /// Maximum columns.
        max_width: u32,
        /// Maximum rows after width clamping.
        max_height: u32,
    },
    /// Derive the grid from glyph metrics at the largest qualifying font size.
    GlyphMetric {
        /// Smallest candidate size in pixels.
        min_size: u32,
        /// Largest candidate size in pixels.
        max_size: u32,
        /// Minimum columns and rows a size must yield to qualify.
        min_cells: u32,
    },
}

const DEFAULT_MAX_CELLS: u32 = 200;
const DEFAULT_MIN_SIZE: u32 = 6;
const DEFAULT_MAX_SIZE: u32 = 32;
const DEFAULT_MIN_CELLS: u32 = 50;

impl Default for RescalePolicy {
    fn default() -> Self {
        Self::FixedBound {
            max_width: DEFAULT_MAX_CELLS,
            max_height: DEFAULT_MAX_CELLS,
        }
    }
}

impl RescalePolicy {
    /// Default glyph-metric policy (sizes 6..=32, at least 50 cells per side).
    pub const GLYPH_METRIC_DEFAULT: Self = Self::GlyphMetric {
        min_size: DEFAULT_MIN_SIZE,
        max_size: DEFAULT_MAX_SIZE,
        min_cells: DEFAULT_MIN_CELLS,
    };
}

/// Color boost factors.
///
/// # Example
/// ```
/// use ca_core::config::EnhanceConfig;
/// let e = EnhanceConfig::default();
/// assert_eq!((e.contrast, e.saturation, e.brightness), (1.5, 1.5, 1.2));
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct EnhanceConfig {
    /// Contraste autour de 0.5. 1.0 = neutre.
    pub contrast: f32,
    /// Multiplicateur de saturation HSV. 1.0 = neutre.
    pub saturation: f32,
    /// Multiplicateur de valeur HSV. 1.0 = neutre.
    pub brightness: f32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            contrast: 1.5,
            saturation: 1.5,
            brightness: 1.2,
        }
    }
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            rescale: RescalePolicy::default(),
            enhance: EnhanceConfig::default(),
            ramp: RAMP_CLASSIC.to_string(),
            ramp_order: RampOrder::DenseFirst,
            font_path: None,
            font_size: 12.0,
            jpeg_quality: 95,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ArtConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.enhance.contrast = self.enhance.contrast.clamp(0.1, 3.0);
        self.enhance.saturation = self.enhance.saturation.clamp(0.0, 3.0);
        self.enhance.brightness = self.enhance.brightness.clamp(0.0, 3.0);
        self.font_size = self.font_size.clamp(4.0, 128.0);
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.rescale = match self.rescale {
            RescalePolicy::FixedBound {
                max_width,
                max_height,
            } => RescalePolicy::FixedBound {
                max_width: max_width.max(1),
                max_height: max_height.max(1),
            },
            RescalePolicy::GlyphMetric {
                min_size,
                max_size,
                min_cells,
            } => {
                let min_size = min_size.clamp(1, 256);
                RescalePolicy::GlyphMetric {
                    min_size,
                    max_size: max_size.clamp(min_size, 256),
                    min_cells: min_cells.max(1),
                }
            }
        };
    }

    /// Reject values clamping cannot repair (NaN, infinities).
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] naming the first non-finite field.
    pub fn validate(&self) -> Result<(), CoreError> {
        let floats = [
            ("enhance.contrast", self.enhance.contrast),
            ("enhance.saturation", self.enhance.saturation),
            ("enhance.brightness", self.enhance.brightness),
            ("render.font_size", self.font_size),
        ];
        match floats.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(CoreError::Config(format!("{name} doit être fini, reçu {v}"))),
            None => Ok(()),
        }
    }

    /// Build the configured character ramp.
    ///
    /// # Errors
    /// Returns [`CoreError::RampTooShort`] if `ramp` has fewer than two glyphs.
    pub fn character_ramp(&self) -> Result<CharacterRamp, CoreError> {
        CharacterRamp::new(&self.ramp, self.ramp_order)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize, Default)]
struct ConfigFile {
    rescale: Option<RescaleSection>,
    enhance: Option<EnhanceSection>,
    ramp: Option<RampSection>,
    render: Option<RenderSection>,
}

/// Which rescale policy a `[rescale]` section selects.
#[derive(Deserialize, Clone, Copy)]
enum PolicyKind {
    FixedBound,
    GlyphMetric,
}

/// Rescale section, all fields optional for partial override.
#[derive(Deserialize)]
struct RescaleSection {
    policy: Option<PolicyKind>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    min_size: Option<u32>,
    max_size: Option<u32>,
    min_cells: Option<u32>,
}

#[derive(Deserialize)]
struct EnhanceSection {
    contrast: Option<f32>,
    saturation: Option<f32>,
    brightness: Option<f32>,
}

#[derive(Deserialize)]
struct RampSection {
    preset: Option<RampPreset>,
    glyphs: Option<String>,
    order: Option<RampOrder>,
}

#[derive(Deserialize)]
struct RenderSection {
    font_path: Option<PathBuf>,
    font_size: Option<f32>,
    jpeg_quality: Option<u8>,
    output_dir: Option<PathBuf>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the
/// configured ramp is unusable.
///
/// # Example
/// ```no_run
/// use ca_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ArtConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}

/// Parse TOML content and merge it over [`ArtConfig::default`].
///
/// # Errors
/// Returns an error on malformed TOML or a ramp shorter than two glyphs.
///
/// # Example
/// ```
/// use ca_core::config::{parse_config, RescalePolicy};
/// let config = parse_config("[rescale]\nmax_width = 120\n").unwrap();
/// assert_eq!(config.rescale, RescalePolicy::FixedBound { max_width: 120, max_height: 200 });
/// ```
pub fn parse_config(content: &str) -> Result<ArtConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = ArtConfig::default();

    if let Some(r) = file.rescale {
        config.rescale = merge_rescale(config.rescale, &r);
    }
    if let Some(e) = file.enhance {
        if let Some(v) = e.contrast {
            config.enhance.contrast = v;
        }
        if let Some(v) = e.saturation {
            config.enhance.saturation = v;
        }
        if let Some(v) = e.brightness {
            config.enhance.brightness = v;
        }
    }
    if let Some(r) = file.ramp {
        // le preset d'abord, les clés explicites le surchargent
        if let Some(p) = r.preset {
            config.ramp = p.glyphs().to_string();
            config.ramp_order = p.order();
        }
        if let Some(v) = r.glyphs {
            config.ramp = v;
        }
        if let Some(v) = r.order {
            config.ramp_order = v;
        }
    }
    if let Some(r) = file.render {
        if r.font_path.is_some() {
            config.font_path = r.font_path;
        }
        if let Some(v) = r.font_size {
            config.font_size = v;
        }
        if let Some(v) = r.jpeg_quality {
            config.jpeg_quality = v;
        }
        if let Some(v) = r.output_dir {
            config.output_dir = v;
        }
    }

    config.validate()?;
    config.clamp_all();
    config.character_ramp()?;
    log::debug!("Configuration : {:?}, rampe {:?}", config.rescale, config.ramp);
    Ok(config)
}

fn merge_rescale(current: RescalePolicy, r: &RescaleSection) -> RescalePolicy {
    let kind = r.policy.unwrap_or(match current {
        RescalePolicy::FixedBound { .. } => PolicyKind::FixedBound,
        RescalePolicy::GlyphMetric { .. } => PolicyKind::GlyphMetric,
    });
    match kind {
        PolicyKind::FixedBound => RescalePolicy::FixedBound {
            max_width: r.max_width.unwrap_or(DEFAULT_MAX_CELLS),
            max_height: r.max_height.unwrap_or(DEFAULT_MAX_CELLS),
        },
        PolicyKind::GlyphMetric => RescalePolicy::GlyphMetric {
            min_size: r.min_size.unwrap_or(DEFAULT_MIN_SIZE),
            max_size: r.max_size.unwrap_or(DEFAULT_MAX_SIZE),
            min_cells: r.min_cells.unwrap_or(DEFAULT_MIN_CELLS),
        },
    }
}
