//! Effective configuration for a popchat run.
//!
//! Layers, lowest to highest precedence:
//!
//! 1. Built-in defaults.
//! 2. `config/popchat.toml` (or `--config`), tables `[client]` and `[tui]`.
//! 3. `POPCHAT_*` environment variables, including those from `.env`.
//! 4. Command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use popchat_client::ClientConfig;
use popchat_tui::TuiConfig;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalArgs;

/// Everything a subcommand needs to know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub client: ClientConfig,
    pub tui: TuiConfig,
}

impl Settings {
    /// Read the file layer.  A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        settings
            .client
            .validate()
            .with_context(|| format!("invalid [client] section in {}", path.display()))?;
        Ok(settings)
    }

    /// Apply command-line overrides.
    pub fn apply_args(&mut self, args: &GlobalArgs) -> Result<()> {
        if let Some(url) = &args.base_url {
            self.client.base_url = url.clone();
        }
        if let Some(ms) = args.welcome_delay_ms {
            self.client.welcome_delay_ms = ms;
        }
        self.client.validate().context("invalid --base-url")?;
        Ok(())
    }
}

/// Build the effective settings from every layer.
pub fn load(args: &GlobalArgs) -> Result<Settings> {
    let mut settings = Settings::from_file(&args.config)?;
    settings
        .client
        .apply_env()
        .context("invalid POPCHAT_* environment override")?;
    settings.apply_args(args)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    fn args(config: PathBuf) -> GlobalArgs {
        GlobalArgs {
            config,
            base_url: None,
            welcome_delay_ms: None,
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_sections_are_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[client]\nbase_url = \"https://bank.example\"\n\n[tui]\nmouse = false"
        )
        .unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.client.base_url, "https://bank.example");
        assert_eq!(settings.client.welcome_delay_ms, 500);
        assert!(!settings.tui.mouse);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client\nbase_url = 1").unwrap();
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config file"));
    }

    #[test]
    fn bad_url_in_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nbase_url = \"::\"").unwrap();
        assert!(Settings::from_file(file.path()).is_err());
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nbase_url = \"https://bank.example\"").unwrap();
        let mut global = args(file.path().to_path_buf());
        global.base_url = Some("http://localhost:9000".into());
        global.welcome_delay_ms = Some(0);

        let mut settings = Settings::from_file(&global.config).unwrap();
        settings.apply_args(&global).unwrap();
        assert_eq!(settings.client.base_url, "http://localhost:9000");
        assert_eq!(settings.client.welcome_delay_ms, 0);
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(text.contains("[client]"));
        assert!(text.contains("[tui]"));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
