#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Configuration for the accident dashboard.
//!
//! Values are resolved in layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`dashboard.toml` in the working directory, or an
//!    explicit path)
//! 3. environment variables (`DASHBOARD_DEFAULT_DATASET`,
//!    `DASHBOARD_TITLE`, `BIND_ADDR`, `PORT`)
//!
//! Binaries apply their command-line flags on top of the result.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Dataset read when no file has been uploaded.
pub const DEFAULT_DATASET: &str = "data/imus_accidents.csv";

/// Page title.
pub const DEFAULT_TITLE: &str = "Imus City Vehicle Accident Dashboard";

/// Environment variable overriding [`DashboardConfig::default_dataset`].
pub const ENV_DEFAULT_DATASET: &str = "DASHBOARD_DEFAULT_DATASET";
/// Environment variable overriding [`DashboardConfig::title`].
pub const ENV_TITLE: &str = "DASHBOARD_TITLE";
/// Environment variable overriding [`DashboardConfig::bind_addr`].
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
/// Environment variable overriding [`DashboardConfig::port`].
pub const ENV_PORT: &str = "PORT";

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment variable holds an unusable value.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Resolved dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// CSV read when no file has been uploaded, and for the original-data
    /// download.
    pub default_dataset: PathBuf,
    /// Page title.
    pub title: String,
    /// Address the dashboard host binds to.
    pub bind_addr: String,
    /// Port the dashboard host listens on.
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_dataset: PathBuf::from(DEFAULT_DATASET),
            title: DEFAULT_TITLE.to_string(),
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Optional overrides read from a TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct ConfigFile {
    /// See [`DashboardConfig::default_dataset`].
    pub default_dataset: Option<PathBuf>,
    /// See [`DashboardConfig::title`].
    pub title: Option<String>,
    /// See [`DashboardConfig::bind_addr`].
    pub bind_addr: Option<String>,
    /// See [`DashboardConfig::port`].
    pub port: Option<u16>,
}

/// Parses a [`ConfigFile`] from a TOML string.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the TOML is malformed or has unknown
/// keys.
pub fn parse_config_toml(toml_str: &str) -> Result<ConfigFile, ConfigError> {
    Ok(toml::de::from_str(toml_str)?)
}

impl DashboardConfig {
    /// Resolves configuration from defaults, the config file, and the
    /// process environment.
    ///
    /// With `explicit` set, that file must exist. Otherwise
    /// [`DEFAULT_CONFIG_FILE`] is read if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file can't be read or parsed,
    /// or an environment variable is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = explicit.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                log::info!("Reading config from {}", path.display());
                config.apply_file(parse_config_toml(&contents)?);
            }
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies every value set in `file`.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(path) = file.default_dataset {
            self.default_dataset = path;
        }
        if let Some(title) = file.title {
            self.title = title;
        }
        if let Some(bind_addr) = file.bind_addr {
            self.bind_addr = bind_addr;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `PORT` is not a valid port.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup(ENV_DEFAULT_DATASET) {
            self.default_dataset = PathBuf::from(path);
        }
        if let Some(title) = lookup(ENV_TITLE) {
            self.title = title;
        }
        if let Some(bind_addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = bind_addr;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PORT,
                value: port.clone(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_dataset, PathBuf::from("data/imus_accidents.csv"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, "127.0.0.1");
    }

    #[test]
    fn file_overrides_defaults() {
        let file = parse_config_toml(
            r#"
default_dataset = "/srv/accidents.csv"
port = 9000
"#,
        )
        .unwrap();
        let mut config = DashboardConfig::default();
        config.apply_file(file);
        assert_eq!(config.default_dataset, PathBuf::from("/srv/accidents.csv"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.title, DEFAULT_TITLE);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            parse_config_toml("dataset = \"x.csv\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides_file() {
        let env: BTreeMap<&str, &str> = [
            (ENV_DEFAULT_DATASET, "env.csv"),
            (ENV_TITLE, "Accidents"),
            (ENV_PORT, "3000"),
        ]
        .into_iter()
        .collect();
        let mut config = DashboardConfig::default();
        config.apply_file(ConfigFile {
            default_dataset: Some(PathBuf::from("file.csv")),
            ..ConfigFile::default()
        });
        config
            .apply_env(|key| env.get(key).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.default_dataset, PathBuf::from("env.csv"));
        assert_eq!(config.title, "Accidents");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_PORT).then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = DashboardConfig::load(Some(Path::new("/no/such/dashboard.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/no/such/dashboard.toml"));
    }
}
