//! Cross-platform config locations

use std::path::PathBuf;

/// Name of the project-local config file, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "rookwatch.toml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// `None` when the platform has no notion of a user config directory.
    pub fn new() -> Option<Self> {
        let base = dirs::config_dir()?;
        Some(Self {
            config_dir: base.join("rookwatch"),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn local_config_file() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }
}
