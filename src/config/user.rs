//! User configuration loading for diff-regions.
//!
//! This module handles loading user-wide configuration from the XDG config directory.
//! User config location: $XDG_CONFIG_HOME/diff-regions/diff-regions.toml
//! Fallback: the platform config directory (e.g. ~/.config/diff-regions/diff-regions.toml)

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::EngineSettings;

/// Errors raised while reading the user configuration file
#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type UserConfigResult<T> = Result<T, UserConfigError>;

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/diff-regions/diff-regions.toml
/// 2. Otherwise: `dirs::config_dir()`/diff-regions/diff-regions.toml
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
        _ => dirs::config_dir()?,
    };
    Some(base.join("diff-regions").join("diff-regions.toml"))
}

/// Load settings from `path`.
///
/// A missing file is not an error and yields `Ok(None)`.
pub fn load_user_config(path: &Path) -> UserConfigResult<Option<EngineSettings>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(UserConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let settings = toml::from_str(&content).map_err(|source| UserConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        target: "diff_regions::config",
        "Loaded user configuration from {}",
        path.display()
    );
    Ok(Some(settings))
}

/// Load settings from `path` if given, else from [`user_config_path`],
/// falling back to defaults when no file exists.
pub fn load_settings(path: Option<&Path>) -> UserConfigResult<EngineSettings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match user_config_path() {
            Some(path) => path,
            None => return Ok(EngineSettings::default()),
        },
    };
    Ok(load_user_config(&path)?.unwrap_or_default())
}
