use anyhow::{Context, Result};
use confyg::{env, Confygery};
use encore_core::search::DEFAULT_ENVELOPE_KM;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for encore.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (ENCORE_* prefix)
/// 3. Config file (~/.config/encore/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite document store.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: ENCORE_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/encore/encore.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Distance in kilometres the search box is expanded by around a
    /// center. Also the largest radius a location search accepts.
    ///
    /// Can be set via:
    /// - ENV: ENCORE_ENVELOPE_KM
    /// - Config: envelope_km = 1000.0
    #[serde(
        default = "default_envelope_km",
        deserialize_with = "deserialize_kilometres"
    )]
    pub envelope_km: f64,

    /// Logger options, handed to twyg by the CLI.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            envelope_km: default_envelope_km(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/encore/config.toml
    /// Reads environment variables with ENCORE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from the given file (if it exists) and
    /// environment variables.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("encore");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }
}

/// Returns: ~/.local/share/encore/encore.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("encore")
        .join("encore.db")
}

const fn default_envelope_km() -> f64 {
    DEFAULT_ENVELOPE_KM
}

/// Environment values arrive as strings, file values as numbers.
fn deserialize_kilometres<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Kilometres {
        Number(f64),
        Text(String),
    }

    match Kilometres::deserialize(deserializer)? {
        Kilometres::Number(km) => Ok(km),
        Kilometres::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("expected a distance in kilometres, got '{text}'"))
        }),
    }
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/encore/config.toml
/// - macOS: ~/Library/Application Support/encore/config.toml
/// - Windows: %APPDATA%\encore\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("encore")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Encore Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (ENCORE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite document store holding bands, venues and concerts
#
# Can also be set via:
# - CLI: encore --db /custom/path.db search ...
# - Environment: ENCORE_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/encore.db"

# Search envelope in kilometres
#
# Location searches size their bounding box from this distance, so it is
# also the largest radius a search may ask for.
#
# Can also be set via:
# - Environment: ENCORE_ENVELOPE_KM=250
envelope_km = 1000.0
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
