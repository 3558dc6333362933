use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "Headless portfolio page driven by a script on stdin", long_about = None)]
pub struct Cli {
    /// Chemin du fichier de configuration TOML.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Graine des générateurs aléatoires (particules, pluie matricielle).
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub seed: Option<u64>,

    /// Arrête la boucle d'animation après N images.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub frames: Option<u64>,

    /// Force l'intervalle entre deux images (ex. "33ms"), jamais nul.
    #[arg(long, value_parser = frame_interval)]
    pub frame_interval: Option<Duration>,

    /// Traite le script sur stdin puis quitte.
    #[arg(long, action = ArgAction::SetTrue)]
    pub once: bool,

    /// Répertoire où `prefs.json` est conservé.
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// N'enregistre pas les préférences, logue uniquement les effets.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Utilise un layer JSON pour les logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Filtre de logs explicite (ex. "vitrine=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn frame_interval(raw: &str) -> Result<Duration, String> {
    let interval = parse_duration(raw).map_err(|err| err.to_string())?;
    if interval.is_zero() {
        return Err("frame interval must be greater than zero".to_string());
    }
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn zero_frame_interval_is_rejected() {
        assert!(Cli::try_parse_from(["vitrine", "--frame-interval", "0s"]).is_err());
        assert!(Cli::try_parse_from(["vitrine", "--frame-interval", "0ms"]).is_err());
        let cli = Cli::try_parse_from(["vitrine", "--frame-interval", "33ms"])
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(cli.frame_interval, Some(Duration::from_millis(33)));
    }
}
