use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// chromascii : convertit une image en texte coloré et la redessine en JPEG.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Dossier de sortie des artefacts (écrase `[render] output_dir`).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Politique de dimensionnement de la grille.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Police TrueType/OpenType explicite.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Taille de police du rendu (pixels).
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Identifiant de l'artefact. Défaut : hash du contenu.
    #[arg(long)]
    pub id: Option<String>,

    /// Écrit le bloc de texte dans ce fichier.
    #[arg(long)]
    pub text_out: Option<PathBuf>,

    /// Écrit `{ id, width, height, text, colors }` en JSON dans ce fichier.
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// Affiche le bloc de texte sur stdout.
    #[arg(long, default_value_t = false)]
    pub print: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// `--policy` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Borne fixe (200×200 par défaut).
    Fixed,
    /// Grille dérivée des métriques de glyphes.
    Glyph,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_is_required() {
        assert!(Cli::try_parse_from(["chromascii"]).is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["chromascii", "--image", "cat.png"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("cat.png"));
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!(cli.log_level, "warn");
        assert!(cli.policy.is_none());
        assert!(!cli.print);
    }

    #[test]
    fn overrides_parse() {
        let cli = Cli::try_parse_from([
            "chromascii",
            "--image",
            "cat.png",
            "--policy",
            "glyph",
            "--font-size",
            "14",
            "--id",
            "cat",
            "--print",
        ])
        .unwrap();
        assert_eq!(cli.policy, Some(PolicyArg::Glyph));
        assert_eq!(cli.font_size, Some(14.0));
        assert_eq!(cli.id.as_deref(), Some("cat"));
        assert!(cli.print);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Cli::try_parse_from(["chromascii", "--image", "a.png", "--policy", "auto"]).is_err());
    }
}
