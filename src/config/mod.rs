pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".agui.toml";

/// Get the global config file path (~/.agui.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (dir/.agui.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit path must exist and parse. Otherwise the local config in the
/// working directory is tried, then the global one, then defaults. Implicit
/// files that fail to load are skipped with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return Ok(read_config(path)?);
    }

    let candidates = [Some(local_config_path(Path::new("."))), global_config_path()];
    for path in candidates.into_iter().flatten() {
        if !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(config) => {
                log::debug!("loaded configuration from {}", path.display());
                return Ok(config);
            }
            Err(e) => log::warn!("ignoring configuration: {}", e),
        }
    }

    Ok(types::Config::default())
}

/// Read and parse one config file
pub fn read_config(path: &Path) -> std::result::Result<types::Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
