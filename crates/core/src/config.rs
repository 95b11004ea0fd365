//! Layered configuration loading using figment.
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. User-level `<config_dir>/rookwatch/config.toml`
//! 3. Project-level `./rookwatch.toml`
//! 4. A file passed explicitly (e.g. `--config`)
//! 5. Environment variables with the `ROOKWATCH_` prefix
//!    (`ROOKWATCH_SERVER_URL` → `server_url`)
//!
//! Command-line flags are applied by the binary on top of the loaded value;
//! call [`MonitorConfig::validate`] afterwards.

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::AppPaths;

pub const ENV_PREFIX: &str = "ROOKWATCH_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Base URL of the training server.
    pub server_url: String,
    /// Live-status poll period.
    pub status_interval_ms: u64,
    /// Progress-history poll period.
    pub progress_interval_ms: u64,
    /// Game count sent by `start` when none is given.
    pub default_num_games: u32,
    /// Client-side request timeout. Unset leaves it to the transport.
    pub request_timeout_secs: Option<u64>,
    /// Drop fetch results that complete after a newer one for the same path.
    pub discard_superseded: bool,
    /// Draw only the most recent N trend points.
    pub trend_window: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            status_interval_ms: 1000,
            progress_interval_ms: 5000,
            default_num_games: 10,
            request_timeout_secs: None,
            discard_superseded: false,
            trend_window: None,
        }
    }
}

impl MonitorConfig {
    /// Load and validate from every source.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain. Public so tests can add providers on top.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global) = AppPaths::new().map(|p| p.config_file()) {
            if global.exists() {
                figment = figment.merge(Toml::file(global));
            }
        }

        let local = AppPaths::local_config_file();
        if local.exists() {
            figment = figment.merge(Toml::file(local));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(invalid("server_url", "must start with http:// or https://"));
        }
        if self.status_interval_ms == 0 {
            return Err(invalid("status_interval_ms", "must be greater than zero"));
        }
        if self.progress_interval_ms == 0 {
            return Err(invalid("progress_interval_ms", "must be greater than zero"));
        }
        if self.default_num_games == 0 {
            return Err(invalid("default_num_games", "must be greater than zero"));
        }
        if self.trend_window == Some(0) {
            return Err(invalid("trend_window", "must be greater than zero when set"));
        }
        Ok(())
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    fn jail_err(e: ConfigError) -> figment::Error {
        figment::Error::from(e.to_string())
    }

    #[test]
    fn default_config_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.status_interval(), Duration::from_secs(1));
        assert_eq!(config.progress_interval(), Duration::from_secs(5));
    }

    #[test]
    fn local_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "rookwatch.toml",
                r#"
                server_url = "http://trainer.local:8080"
                status_interval_ms = 500
                trend_window = 50
                "#,
            )?;
            jail.set_env("ROOKWATCH_STATUS_INTERVAL_MS", "250");

            let config = MonitorConfig::load(None).map_err(jail_err)?;
            assert_eq!(config.server_url, "http://trainer.local:8080");
            assert_eq!(config.status_interval_ms, 250);
            assert_eq!(config.progress_interval_ms, 5000);
            assert_eq!(config.trend_window, Some(50));
            Ok(())
        });
    }

    #[test]
    fn explicit_file_beats_local_file() {
        Jail::expect_with(|jail| {
            jail.create_file("rookwatch.toml", "default_num_games = 20")?;
            jail.create_file("other.toml", "default_num_games = 5")?;

            let config = MonitorConfig::load(Some(Path::new("other.toml"))).map_err(jail_err)?;
            assert_eq!(config.default_num_games, 5);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = MonitorConfig::load(Some(Path::new("nope.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::MissingFile(_)));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ROOKWATCH_PROGRESS_INTERVAL_MS", "0");
            let err = MonitorConfig::load(None).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref field, .. } if field == "progress_interval_ms"
            ));
            Ok(())
        });

        let config = MonitorConfig {
            server_url: "ftp://example".to_string(),
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
