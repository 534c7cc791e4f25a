use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Command-line interface of the browser.
#[derive(Debug, Parser)]
#[command(name = "emodeldb")]
#[command(about = "Browse and export empirical amino-acid substitution models", long_about = None)]
pub struct Cli {
    /// SQLite catalog to browse (overrides the config file).
    #[arg(env = "EMODELDB_DB")]
    pub db: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, env = "EMODELDB_CONFIG")]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// SQLite catalog to browse.
    pub db_path: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("models.db"),
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl AppConfig {
    /// Layer defaults, the config file, `EMODELDB_*` variables and the
    /// database argument, later sources winning.
    pub fn load(cli: &Cli) -> Result<Self> {
        Self::resolve(cli, None)
    }

    /// `env` replaces the process environment for the `EMODELDB_*` layer.
    fn resolve(cli: &Cli, env: Option<HashMap<String, String>>) -> Result<Self> {
        let defaults = AppConfig::default();
        let mut builder = Config::builder()
            .set_default("db_path", defaults.db_path.to_string_lossy().into_owned())?
            .set_default("window_width", f64::from(defaults.window_width))?
            .set_default("window_height", f64::from(defaults.window_height))?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Json));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("EMODELDB")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option(
                "db_path",
                cli.db.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?
            .build()
            .context("reading configuration")?;

        config
            .try_deserialize()
            .context("parsing configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("emodeldb").chain(args.iter().copied())).unwrap()
    }

    fn no_env() -> Option<HashMap<String, String>> {
        Some(HashMap::new())
    }

    #[test]
    fn defaults_without_any_source() {
        let cli = Cli {
            db: None,
            config: None,
        };
        let config = AppConfig::resolve(&cli, no_env()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.db_path, PathBuf::from("models.db"));
    }

    #[test]
    fn file_values_fill_in_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emodeldb.json");
        std::fs::write(&path, r#"{ "db_path": "/data/catalog.db", "window_width": 800 }"#)
            .unwrap();

        let cli = Cli {
            db: None,
            config: Some(path),
        };
        let config = AppConfig::resolve(&cli, no_env()).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/catalog.db"));
        assert_eq!(config.window_width, 800.0);
        assert_eq!(config.window_height, 900.0);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emodeldb.json");
        std::fs::write(&path, r#"{ "window_height": 600 }"#).unwrap();

        let env = HashMap::from([("EMODELDB_WINDOW_HEIGHT".to_string(), "700".to_string())]);
        let cli = Cli {
            db: None,
            config: Some(path),
        };
        let config = AppConfig::resolve(&cli, Some(env)).unwrap();
        assert_eq!(config.window_height, 700.0);
    }

    #[test]
    fn database_argument_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emodeldb.json");
        std::fs::write(&path, r#"{ "db_path": "from_file.db" }"#).unwrap();

        let path = path.to_str().unwrap();
        let args = cli(&["--config", path, "from_arg.db"]);
        let config = AppConfig::resolve(&args, no_env()).unwrap();
        assert_eq!(config.db_path, PathBuf::from("from_arg.db"));
    }

    #[test]
    fn unreadable_or_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Cli {
            db: None,
            config: Some(dir.path().join("missing.json")),
        };
        assert!(AppConfig::resolve(&missing, no_env()).is_err());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let malformed = Cli {
            db: None,
            config: Some(bad),
        };
        let err = AppConfig::resolve(&malformed, no_env()).unwrap_err();
        assert!(format!("{err:#}").contains("reading configuration"));
    }

    #[test]
    fn cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["emodeldb", "--bogus"]).is_err());
    }
}
