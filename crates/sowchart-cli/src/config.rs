//! Locating and loading the CLI's settings.
//!
//! Settings live in a directory: `config.toml` holds the [`AppConfig`], and an
//! optional `products.toml` next to it replaces the bundled product corpus.
//! The directory is picked from, in order, an explicit `--config` file, the
//! local `sowchart/` directory, and the platform configuration directory.
//! Without any of them the defaults apply.
//!
//! Every loaded configuration is validated here, so a bad theme or export
//! value is reported against the file it came from rather than surfacing
//! later as a render or export failure.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use sowchart::{SowchartError, config::AppConfig, config::ValidationError};

const CONFIG_FILE: &str = "config.toml";
const CORPUS_FILE: &str = "products.toml";

/// Settings-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to parse `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid setting in `{path}`: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

impl From<ConfigError> for SowchartError {
    fn from(err: ConfigError) -> Self {
        SowchartError::Config(err.to_string())
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in `sowchart/` under the working directory.
    Local(PathBuf),
    /// Found in the platform configuration directory.
    System(PathBuf),
    /// Nothing found; built-in defaults.
    Defaults,
}

impl ConfigOrigin {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Local(path) | Self::System(path) => Some(path),
            Self::Defaults => None,
        }
    }
}

/// A validated configuration and its origin.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: AppConfig,
    pub origin: ConfigOrigin,
}

impl Settings {
    /// `products.toml` in the configuration's directory, if present.
    pub fn sibling_corpus(&self) -> Option<PathBuf> {
        let dir = self.origin.path()?.parent()?;
        let corpus = dir.join(CORPUS_FILE);
        corpus.is_file().then_some(corpus)
    }
}

/// Picks the configuration file to use, without reading it.
pub fn discover(explicit_path: Option<&Path>) -> ConfigOrigin {
    if let Some(path) = explicit_path {
        return ConfigOrigin::Explicit(path.to_path_buf());
    }

    let local = Path::new("sowchart").join(CONFIG_FILE);
    if local.is_file() {
        return ConfigOrigin::Local(local);
    }

    match ProjectDirs::from("com", "sowchart", "sowchart") {
        Some(dirs) => {
            let system = dirs.config_dir().join(CONFIG_FILE);
            if system.is_file() {
                return ConfigOrigin::System(system);
            }
            debug!(path = system.display().to_string(); "No system configuration");
        }
        None => debug!("Platform configuration directory unknown"),
    }

    ConfigOrigin::Defaults
}

/// Discovers, reads and validates the configuration.
///
/// # Errors
///
/// Returns [`SowchartError::Config`] when an explicit file is missing, or when
/// the chosen file does not parse or holds an invalid value; the message names
/// the file.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<Settings, SowchartError> {
    let origin = discover(explicit_path);
    let config = match origin.path() {
        Some(path) => {
            info!(path = path.display().to_string(); "Loading configuration");
            read_config(path)?
        }
        None => {
            debug!("Using default configuration");
            AppConfig::default()
        }
    };

    Ok(Settings { config, origin })
}

fn read_config(path: &Path) -> Result<AppConfig, SowchartError> {
    if !path.is_file() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    config.validate().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(config)
}
