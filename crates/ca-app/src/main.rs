use anyhow::Result;
use ca_core::config::{ArtConfig, RescalePolicy};
use clap::Parser;

pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis appliquer les overrides CLI
    let mut config = resolve_config(&cli)?;
    apply_overrides(&cli, &mut config);

    // 4. Exécuter la requête
    let request = pipeline::Request {
        image: cli.image.clone(),
        id: cli.id.clone(),
        text_out: cli.text_out.clone(),
        json_out: cli.json_out.clone(),
    };
    let fonts = pipeline::font_provider(&config);
    let outcome = pipeline::run(&request, &config, fonts.as_ref())?;

    if cli.print {
        print!("{}", outcome.art.text);
    }
    log::info!("Artefact {} : {}", outcome.id, outcome.artifact.display());
    Ok(())
}

/// Load `--config`, or fall back to defaults when the file is absent.
fn resolve_config(cli: &cli::Cli) -> Result<ArtConfig> {
    if cli.config.exists() {
        ca_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ArtConfig::default())
    }
}

/// CLI flags win over file values.
fn apply_overrides(cli: &cli::Cli, config: &mut ArtConfig) {
    if let Some(policy) = cli.policy {
        config.rescale = match (policy, config.rescale) {
            (cli::PolicyArg::Fixed, current @ RescalePolicy::FixedBound { .. })
            | (cli::PolicyArg::Glyph, current @ RescalePolicy::GlyphMetric { .. }) => current,
            (cli::PolicyArg::Fixed, RescalePolicy::GlyphMetric { .. }) => RescalePolicy::default(),
            (cli::PolicyArg::Glyph, RescalePolicy::FixedBound { .. }) => {
                RescalePolicy::GLYPH_METRIC_DEFAULT
            }
        };
    }
    if let Some(ref dir) = cli.out_dir {
        config.output_dir.clone_from(dir);
    }
    if let Some(ref font) = cli.font {
        config.font_path = Some(font.clone());
    }
    if let Some(size) = cli.font_size {
        config.font_size = size;
    }
    config.clamp_all();
}
