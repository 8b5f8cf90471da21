//! Platform locations of local playground files.
//!
//! ```text
//! <config_dir>/antd-playground/
//! └── preferences.toml    # provider preference (`setting-cdn`)
//! ```

use std::path::PathBuf;
use thiserror::Error;

pub const APP_DIR_NAME: &str = "antd-playground";
pub const PREFERENCES_FILE: &str = "preferences.toml";
/// Overrides the configuration directory when set.
pub const CONFIG_DIR_ENV: &str = "PLAYGROUND_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine the platform configuration directory")]
    ConfigDirNotFound,
}

pub struct PlaygroundPaths;

impl PlaygroundPaths {
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn preferences_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(PREFERENCES_FILE))
    }
}
