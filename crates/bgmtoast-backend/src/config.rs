use std::path::{Path, PathBuf};

use bgmtoast_bridge::config::Config;
use bgmtoast_intercept::WatchedExtension;
use directories::ProjectDirs;

/// Name of the configuration file inside the module directory.
pub const CONFIG_FILE_NAME: &str = "bgmtoast.toml";

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No module directory was given and the platform configuration
    /// directory could not be determined either (e.g., `$HOME` is unset).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    /// The file contains invalid TOML or does not match the expected
    /// structure.
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
    /// The watched extension is not exactly three ASCII letters.
    #[error("invalid watched extension {0:?}, expected three letters")]
    InvalidExtension(String),
    /// A duration or interval that must be positive is not.
    #[error("invalid value for {0}, expected a positive number")]
    NonPositive(&'static str),
    /// A size that may be zero is negative or not a number.
    #[error("invalid value for {0}, expected zero or more")]
    Negative(&'static str),
}

/// Platform configuration directory, used when the host does not provide a
/// module directory.
pub fn default_module_dir() -> Result<PathBuf, ConfigError> {
    match ProjectDirs::from("dev", "bgmtoast", "bgmtoast") {
        Some(dirs) => Ok(dirs.config_dir().to_path_buf()),
        None => Err(ConfigError::DirectoriesNotFound),
    }
}

/// Loads `bgmtoast.toml` from `module_dir`. A missing file yields the
/// defaults; nothing is ever written back.
pub fn load_config(module_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = module_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        log::info!("No configuration at {config_path:?}, using defaults.");
        return Ok(Config::default());
    }

    log::info!("Loading configuration from {config_path:?}");
    let contents = std::fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&contents)?;
    validate(&config)?;
    Ok(config)
}

/// Checks the values serde cannot check by type alone.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let extension = &config.intercept.watched_extension;
    if WatchedExtension::new(extension).is_none() {
        return Err(ConfigError::InvalidExtension(extension.clone()));
    }

    positive(
        config.notification.display_duration_secs,
        "notification.display_duration_secs",
    )?;
    if config.intercept.poll_interval_ms == 0 {
        return Err(ConfigError::NonPositive("intercept.poll_interval_ms"));
    }
    positive(config.overlay.animation_speed, "overlay.animation_speed")?;
    positive(config.overlay.ui_scale, "overlay.ui_scale")?;

    let padding = config.overlay.screen_padding;
    if !padding.is_finite() || padding < 0.0 {
        return Err(ConfigError::Negative("overlay.screen_padding"));
    }
    Ok(())
}

fn positive(value: f32, name: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive(name))
    }
}
