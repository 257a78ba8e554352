use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use varasto_utils::{
    fs::ensure_dir_exists,
    path::{resolve_path, xdg_config_home},
};

use crate::error::{ConfigError, Result};

pub const DEFAULT_HOST: &str = "::1";

/// Application's configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database file.
    /// Default: $XDG_DATA_HOME/varasto/varasto.sqlite3
    pub database: Option<String>,

    /// Address the HTTP server binds to.
    /// Default: ::1
    pub host: String,

    /// Port the HTTP server binds to. 0 lets the operating system pick a free port.
    /// Default: 0
    pub port: u16,

    /// If true, every HTTP request is logged.
    /// Default: false
    pub request_logging: bool,

    /// Row limit applied to list requests that don't send one.
    /// Default: unbounded
    pub page_size: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            host: DEFAULT_HOST.to_string(),
            port: 0,
            request_logging: false,
            page_size: None,
        }
    }
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("VARASTO_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("varasto").join("config.toml"),
    })
});

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

pub fn set_config_path(path: &str) -> Result<()> {
    let path = resolve_path(path)?;
    let mut config_path = CONFIG_PATH
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *config_path = path;
    Ok(())
}

impl Config {
    /// Loads the configuration from [`CONFIG_PATH`].
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => {
                debug!("loading configuration from {}", path.display());
                toml::from_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        self.host = self.host.trim().to_string();
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if self.page_size == Some(0) {
            return Err(ConfigError::InvalidPageSize);
        }

        if self.database.as_deref().is_some_and(|db| db.trim().is_empty()) {
            self.database = None;
        }

        Ok(())
    }

    /// Returns the configured database path, if any.
    ///
    /// `VARASTO_DB` takes precedence over the `database` field. `None` means the
    /// caller should fall back to the default location in the user data directory.
    pub fn get_db_path(&self) -> Result<Option<PathBuf>> {
        if let Ok(env_path) = std::env::var("VARASTO_DB") {
            return Ok(Some(resolve_path(&env_path)?));
        }
        match &self.database {
            Some(database) => Ok(Some(resolve_path(database)?)),
            None => Ok(None),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = self.to_toml_string()?;
        if let Some(parent) = config_path.parent() {
            ensure_dir_exists(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(
            config_path.display().to_string(),
        ));
    }

    Config::default().save()?;
    info!(
        "Default configuration file generated at: {}",
        config_path.display()
    );
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;
    use crate::test_utils::EnvGuard;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default();

        assert_eq!(config.host, "::1");
        assert_eq!(config.port, 0);
        assert!(!config.request_logging);
        assert_eq!(config.database, None);
        assert_eq!(config.page_size, None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = 8080\nrequest_logging = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.request_logging);
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_empty_host() {
        let mut config = Config {
            host: "  ".into(),
            ..Config::default()
        };
        assert!(matches!(config.resolve(), Err(ConfigError::EmptyHost)));
    }

    #[test]
    fn test_resolve_rejects_zero_page_size() {
        let mut config = Config {
            page_size: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidPageSize)
        ));
    }

    #[test]
    fn test_resolve_clears_blank_database() {
        let mut config = Config {
            database: Some(" ".into()),
            ..Config::default()
        };
        config.resolve().unwrap();
        assert_eq!(config.database, None);
    }

    #[test]
    #[serial]
    fn test_db_path_env_override() {
        let config = Config {
            database: Some("/srv/varasto/file.sqlite3".into()),
            ..Config::default()
        };

        let _env = EnvGuard::new(&[("VARASTO_DB", Some("/tmp/override.sqlite3"))]);
        assert_eq!(
            config.get_db_path().unwrap(),
            Some(PathBuf::from("/tmp/override.sqlite3"))
        );
    }

    #[test]
    #[serial]
    fn test_db_path_from_config() {
        let _env = EnvGuard::new(&[("VARASTO_DB", None)]);
        let config = Config {
            database: Some("/srv/varasto/file.sqlite3".into()),
            ..Config::default()
        };
        assert_eq!(
            config.get_db_path().unwrap(),
            Some(PathBuf::from("/srv/varasto/file.sqlite3"))
        );
        assert_eq!(Config::default().get_db_path().unwrap(), None);
    }

    #[test]
    #[serial]
    fn test_generate_default_config_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        set_config_path(path.to_str().unwrap()).unwrap();

        let written = generate_default_config().unwrap();
        assert_eq!(written, path);
        assert_eq!(Config::new().unwrap(), Config::default());

        assert!(matches!(
            generate_default_config(),
            Err(ConfigError::ConfigAlreadyExists(_))
        ));
    }
}
