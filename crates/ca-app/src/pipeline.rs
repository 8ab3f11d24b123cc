use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ca_ascii::{ConvertedArt, convert_to_art};
use ca_core::config::ArtConfig;
use ca_core::frame::Rgb;
use ca_core::metrics::FontMetrics;
use ca_core::traits::MetricsSource;
use ca_export::{
    ArtifactId, DirectorySink, FixedFont, FontProvider, GlyphSet, PlatformFonts, render_art_to_image,
    resolve_font,
};
use serde::Serialize;

/// Une requête : image source + sorties facultatives.
#[derive(Clone, Debug, Default)]
pub struct Request {
    /// Image source.
    pub image: PathBuf,
    /// Explicit artifact id; content hash otherwise.
    pub id: Option<String>,
    /// Where to write the text block.
    pub text_out: Option<PathBuf>,
    /// Where to write the JSON document.
    pub json_out: Option<PathBuf>,
}

/// Résultat d'une requête.
#[derive(Debug)]
pub struct Outcome {
    /// Artifact identifier.
    pub id: ArtifactId,
    /// Path of the rendered JPEG.
    pub artifact: PathBuf,
    /// Text block and colors.
    pub art: ConvertedArt,
    /// Rendered image size in pixels.
    pub image_size: (u32, u32),
}

/// Document JSON destiné à une couche d'affichage.
#[derive(Serialize)]
struct ArtDocument<'a> {
    id: &'a str,
    width: u32,
    height: u32,
    text: &'a str,
    colors: &'a [Vec<Rgb>],
}

/// Provider for `config`: the configured font, else the platform list.
#[must_use]
pub fn font_provider(config: &ArtConfig) -> Box<dyn FontProvider> {
    match &config.font_path {
        Some(path) => Box::new(FixedFont(path.clone())),
        None => Box::new(PlatformFonts::current()),
    }
}

/// Decode → Rescale → Enhance → Map → Assemble → Render, puis écrit les sorties.
///
/// # Errors
/// Returns an error if decoding, conversion, rendering or writing fails.
/// A missing font is not an error.
pub fn run(request: &Request, config: &ArtConfig, fonts: &dyn FontProvider) -> Result<Outcome> {
    let raster = ca_source::load_image(&request.image)
        .with_context(|| format!("Lecture de {}", request.image.display()))?;

    let font = resolve_font(fonts);
    let metrics: &dyn MetricsSource = match &font {
        Some(f) => f,
        None => &FontMetrics::FALLBACK,
    };

    let art = convert_to_art(&raster, config, metrics).context("Conversion en texte")?;
    let glyphs = GlyphSet::for_text(font.as_ref(), render_font_size(&art, config), &art.text);

    let id = match &request.id {
        Some(id) => ArtifactId::new(id.as_str())?,
        None => ArtifactId::from_content(&art.text, &art.colors),
    };

    let mut sink = DirectorySink::new(&config.output_dir).with_quality(config.jpeg_quality);
    let image = render_art_to_image(&art.text, &art.colors, &glyphs, &mut sink, &id)
        .context("Rendu de l'image")?;

    if let Some(path) = &request.text_out {
        write_output(path, art.text.as_bytes())?;
    }
    if let Some(path) = &request.json_out {
        let doc = ArtDocument {
            id: id.as_str(),
            width: art.width,
            height: art.height,
            text: &art.text,
            colors: &art.colors,
        };
        let json = serde_json::to_vec(&doc).context("Sérialisation JSON")?;
        write_output(path, &json)?;
    }

    log::info!(
        "{} → {}×{} glyphes, {}×{} px",
        request.image.display(),
        art.width,
        art.height,
        image.width(),
        image.height()
    );

    Ok(Outcome {
        artifact: sink.path_for(&id),
        image_size: image.dimensions(),
        id,
        art,
    })
}

/// Taille de rendu : celle qui a dimensionné la grille, sinon la config.
fn render_font_size(art: &ConvertedArt, config: &ArtConfig) -> f32 {
    art.font_size.map_or(config.font_size, |px| px as f32)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Écriture de {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ca_core::config::RescalePolicy;
    use ca_export::NoFont;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, rgb: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(w, h, image::Rgb(rgb))
            .save(&path)
            .unwrap();
        path
    }

    fn config_in(dir: &Path) -> ArtConfig {
        ArtConfig {
            output_dir: dir.join("out"),
            ..ArtConfig::default()
        }
    }

    #[test]
    fn black_image_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request {
            image: write_png(dir.path(), "black.png", 2, 2, [0, 0, 0]),
            id: Some("black".into()),
            ..Request::default()
        };
        let outcome = run(&request, &config_in(dir.path()), &NoFont).unwrap();
        assert_eq!(outcome.art.text, "@@\n@@\n");
        assert_eq!(outcome.image_size, (16, 32));
        assert_eq!(outcome.artifact, dir.path().join("out").join("black.jpg"));
        assert!(outcome.artifact.is_file());
    }

    #[test]
    fn wide_image_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request {
            image: write_png(dir.path(), "wide.png", 500, 100, [90, 160, 220]),
            ..Request::default()
        };
        let outcome = run(&request, &config_in(dir.path()), &NoFont).unwrap();
        assert_eq!((outcome.art.width, outcome.art.height), (200, 40));
        assert_eq!(outcome.image_size, (1600, 640));
        assert_eq!(outcome.id.as_str().len(), 32);
    }

    #[test]
    fn text_and_json_outputs_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request {
            image: write_png(dir.path(), "white.png", 3, 2, [255, 255, 255]),
            id: Some("white".into()),
            text_out: Some(dir.path().join("art.txt")),
            json_out: Some(dir.path().join("art.json")),
        };
        run(&request, &config_in(dir.path()), &NoFont).unwrap();

        let text = std::fs::read_to_string(dir.path().join("art.txt")).unwrap();
        assert_eq!(text, "   \n   \n");
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("art.json")).unwrap()).unwrap();
        assert_eq!(json["id"], "white");
        assert_eq!(json["width"], 3);
        assert_eq!(json["height"], 2);
        assert_eq!(json["colors"][1][2], serde_json::json!([255, 255, 255]));
    }

    #[test]
    fn glyph_policy_uses_fallback_metrics_without_font() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArtConfig {
            rescale: RescalePolicy::GLYPH_METRIC_DEFAULT,
            ..config_in(dir.path())
        };
        let request = Request {
            image: write_png(dir.path(), "tall.png", 800, 1600, [10, 10, 10]),
            ..Request::default()
        };
        let outcome = run(&request, &config, &NoFont).unwrap();
        assert_eq!((outcome.art.width, outcome.art.height), (100, 100));
    }

    #[test]
    fn render_size_follows_the_measured_grid() {
        let mut art = ConvertedArt {
            text: "@\n".into(),
            colors: vec![vec![(0, 0, 0)]],
            width: 1,
            height: 1,
            font_size: None,
        };
        let config = ArtConfig::default();
        assert_eq!(render_font_size(&art, &config), config.font_size);
        art.font_size = Some(20);
        assert_eq!(render_font_size(&art, &config), 20.0);
    }

    #[test]
    fn glyph_policy_renders_with_the_measured_font_size() {
        let Some(path) = PlatformFonts::current().locate() else {
            return;
        };
        let Some(font) = resolve_font(&FixedFont(path.clone())) else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let config = ArtConfig {
            rescale: RescalePolicy::GLYPH_METRIC_DEFAULT,
            font_size: 12.0,
            ..config_in(dir.path())
        };
        let request = Request {
            image: write_png(dir.path(), "square.png", 1000, 1000, [10, 10, 10]),
            ..Request::default()
        };
        let outcome = run(&request, &config, &FixedFont(path)).unwrap();

        let size = outcome.art.font_size.unwrap();
        let cell = font.metrics_at(size as f32);
        assert_eq!(
            outcome.image_size,
            (
                outcome.art.width * cell.glyph_width,
                outcome.art.height * cell.glyph_height
            )
        );
    }

    #[test]
    fn invalid_id_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request {
            image: write_png(dir.path(), "x.png", 2, 2, [0, 0, 0]),
            id: Some("../escape".into()),
            ..Request::default()
        };
        assert!(run(&request, &config_in(dir.path()), &NoFont).is_err());
    }

    #[test]
    fn missing_image_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request {
            image: dir.path().join("absent.png"),
            ..Request::default()
        };
        assert!(run(&request, &config_in(dir.path()), &NoFont).is_err());
    }

    #[test]
    fn configured_font_path_selects_fixed_provider() {
        let config = ArtConfig {
            font_path: Some(PathBuf::from("/nonexistent/mono.ttf")),
            ..ArtConfig::default()
        };
        assert!(font_provider(&config).locate().is_none());
    }
}
