//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Global config: `$XDG_CONFIG_HOME/<app>/<app>.toml`
//! 2. Explicit config file, usually chosen with `--config`
//! 3. Environment variables: `<APP>_*` prefix, `__` separating nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::domain::Unit;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot load settings for {app}: {source}")]
    Load {
        app: String,
        #[source]
        source: ConfigError,
    },

    #[error("invalid settings for {app}: {source}")]
    Shape {
        app: String,
        #[source]
        source: ConfigError,
    },

    #[error("invalid setting '{key}': {source}")]
    Invalid {
        key: String,
        #[source]
        source: ConfigError,
    },
}

/// A unit that accepts a configuration file chosen on the command line.
pub trait ConfigurableUnit: Unit {
    fn set_config_file(&mut self, path: PathBuf);

    fn config_file(&self) -> Option<&Path>;

    /// Load settings for `app`, including the configured file if any.
    fn load_settings(&self, app: &str) -> Result<Settings, SettingsError> {
        Settings::load(app, self.config_file())
    }
}

/// Merged view of all configuration layers.
#[derive(Debug, Clone)]
pub struct Settings {
    app: String,
    file: Option<PathBuf>,
    config: Config,
}

/// Path of the global config file for `app`.
pub fn global_config_path(app: &str) -> Option<PathBuf> {
    ProjectDirs::from("", "", app).map(|dirs| dirs.config_dir().join(format!("{app}.toml")))
}

/// Environment variable prefix for `app`: `my-tool` → `MY_TOOL`.
pub fn env_prefix(app: &str) -> String {
    app.to_uppercase().replace('-', "_")
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// The global file is optional; an explicit `file` must exist.
    pub fn load(app: &str, file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path(app) {
            builder = builder.add_source(File::from(global_path).required(false));
        }
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(&env_prefix(app))
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(|source| SettingsError::Load {
            app: app.to_string(),
            source,
        })?;
        debug!(app, file = ?file, "settings loaded");

        Ok(Self {
            app: app.to_string(),
            file: file.map(Path::to_path_buf),
            config,
        })
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// The explicit config file, if one was given.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Value at `key` (dotted path), `None` when no layer sets it.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.config.get::<T>(key) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::NotFound(_)) => Ok(None),
            Err(source) => Err(SettingsError::Invalid {
                key: key.to_string(),
                source,
            }),
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, SettingsError> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Deserialize the merged layers into a settings struct.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, SettingsError> {
        self.config
            .clone()
            .try_deserialize()
            .map_err(|source| SettingsError::Shape {
                app: self.app.clone(),
                source,
            })
    }
}
