//! CLI configuration.
//!
//! Layered lowest to highest: built-in defaults, `<config dir>/psgallery/config.toml`,
//! `PSGALLERY_*` environment variables (a `.env` file is honoured), then
//! command-line flags.

use anyhow::{bail, Context};
use config::{Config, Environment, File};
use psgallery_client::{DEFAULT_PWSH, DEFAULT_REPOSITORY};
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "PSGALLERY";

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// PowerShell executable hosting the gallery cmdlets
    pub pwsh: String,
    /// Repository name passed to the search cmdlets
    pub repository: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl CliConfig {
    pub fn load() -> anyhow::Result<Self> {
        check_dotenv(dotenvy::dotenv())?;

        let mut builder = defaults()?;
        if let Some(path) = config_file_path() {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(environment());

        builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.pwsh.trim().is_empty() {
            bail!("pwsh must not be empty");
        }
        if self.repository.trim().is_empty() {
            bail!("repository must not be empty");
        }
        Ok(())
    }
}

fn defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("pwsh", DEFAULT_PWSH)?
        .set_default("repository", DEFAULT_REPOSITORY)?
        .set_default("logging.level", default_log_level())?
        .set_default("logging.json", false)?)
}

/// `PSGALLERY_PWSH`, `PSGALLERY_REPOSITORY`, `PSGALLERY_LOGGING__LEVEL`, ...
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// A missing `.env` is fine, a malformed one is not.
fn check_dotenv(result: dotenvy::Result<PathBuf>) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("psgallery").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_from_toml(toml: &str) -> CliConfig {
        defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = load_from_toml("");
        assert_eq!(config.pwsh, "pwsh");
        assert_eq!(config.repository, "PSGallery");
        assert_eq!(config.logging.level, "error");
        assert!(!config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = load_from_toml(
            r#"
            pwsh = "powershell.exe"
            repository = "InternalGallery"

            [logging]
            level = "debug"
            json = true
            "#,
        );
        assert_eq!(config.pwsh, "powershell.exe");
        assert_eq!(config.repository, "InternalGallery");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        std::env::set_var("PSGALLERY_PWSH", "powershell.exe");
        std::env::set_var("PSGALLERY_REPOSITORY", "Internal");
        std::env::set_var("PSGALLERY_LOGGING__LEVEL", "debug");

        let config: CliConfig = defaults()
            .unwrap()
            .add_source(environment())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        std::env::remove_var("PSGALLERY_PWSH");
        std::env::remove_var("PSGALLERY_REPOSITORY");
        std::env::remove_var("PSGALLERY_LOGGING__LEVEL");

        assert_eq!(config.pwsh, "powershell.exe");
        assert_eq!(config.repository, "Internal");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        let missing = std::env::temp_dir().join("psgallery-no-such-dir").join(".env");
        assert!(check_dotenv(dotenvy::from_path(&missing).map(|_| missing.clone())).is_ok());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let path = std::env::temp_dir().join(format!("psgallery-{}.env", std::process::id()));
        std::fs::write(&path, "not a valid line\n").unwrap();

        let result = check_dotenv(dotenvy::from_path(&path).map(|_| path.clone()));
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(err.to_string().contains(".env"));
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let mut config = load_from_toml("");
        config.repository = "  ".into();
        assert!(config.validate().is_err());

        let mut config = load_from_toml("");
        config.pwsh = String::new();
        assert!(config.validate().is_err());
    }
}
