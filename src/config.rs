//! Locating, parsing and validating the comparison settings.
//!
//! Settings come from an optional configuration file (JSON, or TOML when the
//! file name ends in `.toml`) and are overridden by command-line flags. The
//! resulting [`Config`] always holds two canonical, existing directories.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Searched in order when no configuration file is given explicitly.
pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "config/config.json",
    "config.json",
    "config/config.toml",
    "config.toml",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "No configuration file found (searched {}); pass a config file or both --left and --right",
        searched.join(", ")
    )]
    NotFound { searched: Vec<String> },
    #[error("Cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot parse config file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Cannot parse config file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("The {side} directory does not exist: {}", path.display())]
    DirNotFound { side: Side, path: PathBuf },
    #[error("The {side} path is not a directory: {}", path.display())]
    NotADirectory { side: Side, path: PathBuf },
    #[error("Cannot resolve the {side} directory {}: {source}", path.display())]
    Canonicalize {
        side: Side,
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Contents of a configuration file. Every field is optional so that flags
/// can fill in whatever the file leaves out.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub left_dir: Option<PathBuf>,
    pub right_dir: Option<PathBuf>,
    #[serde(default)]
    pub show_unchanged: bool,
}

impl ConfigFile {
    /// Load a configuration file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Settings given on the command line. They win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub left_dir: Option<PathBuf>,
    pub right_dir: Option<PathBuf>,
    pub show_unchanged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Canonical path of the left root.
    pub left_dir: PathBuf,
    /// Canonical path of the right root.
    pub right_dir: PathBuf,
    pub show_unchanged: bool,
    /// The configuration file that was used, if any.
    pub source: Option<PathBuf>,
}

impl Config {
    /// Resolve the settings for one run.
    ///
    /// `config_path` names an explicit configuration file. Without one, the
    /// [`DEFAULT_CONFIG_PATHS`] are searched, unless `overrides` already
    /// names both directories.
    ///
    /// # Errors
    ///
    /// Fails if no configuration can be found or parsed, if a directory is
    /// not set, or if a directory does not exist or is not a directory.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let source = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None if overrides.left_dir.is_some() && overrides.right_dir.is_some() => None,
            None => Some(find_default_config()?),
        };

        let file = match &source {
            Some(path) => {
                info!("Using config file {}", path.display());
                ConfigFile::load(path)?
            }
            None => ConfigFile::default(),
        };

        let left_dir = overrides
            .left_dir
            .or(file.left_dir)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingField("left_dir"))?;
        let right_dir = overrides
            .right_dir
            .or(file.right_dir)
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingField("right_dir"))?;

        let left_dir = resolve_directory(Side::Left, &left_dir)?;
        let right_dir = resolve_directory(Side::Right, &right_dir)?;

        Ok(Config {
            left_dir,
            right_dir,
            show_unchanged: overrides.show_unchanged || file.show_unchanged,
            source: source.map(|p| std::path::absolute(&p).unwrap_or(p)),
        })
    }
}

fn find_default_config() -> Result<PathBuf, ConfigError> {
    for candidate in DEFAULT_CONFIG_PATHS {
        let path = Path::new(candidate);
        debug!("Looking for config file at {}", path.display());
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
    }

    Err(ConfigError::NotFound {
        searched: DEFAULT_CONFIG_PATHS.iter().map(|s| s.to_string()).collect(),
    })
}

fn resolve_directory(side: Side, path: &Path) -> Result<PathBuf, ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::DirNotFound {
                side,
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Canonicalize {
                side,
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(ConfigError::NotADirectory {
            side,
            path: path.to_path_buf(),
        });
    }

    path.canonicalize()
        .map_err(|source| ConfigError::Canonicalize {
            side,
            path: path.to_path_buf(),
            source,
        })
}
