//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use std::path::{Path, PathBuf};

/// File name searched for in the standard locations
pub const CONFIG_FILE_NAME: &str = "streamlyne.toml";

/// Loaded configuration plus the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings were read from, if any
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the standard locations, or defaults.
    ///
    /// An explicit path that does not exist is an error; a missing file in the
    /// standard locations silently falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let report = schema.validate();
        if !report.is_valid() {
            return Err(Error::new(ErrorCode::ConfigValidationError, report.summary())
                .with_context(config_path.as_ref().map_or_else(
                    || "built-in defaults".to_string(),
                    |p| p.display().to_string(),
                )));
        }

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Resolve a path from the configuration against the config file's directory.
    ///
    /// Absolute paths and paths loaded without a config file are returned as is.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.path.as_deref().and_then(Path::parent) {
            Some(base) if !base.as_os_str().is_empty() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(CONFIG_FILE_NAME),
        Path::new(".config").join(CONFIG_FILE_NAME),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("streamlyne").join(CONFIG_FILE_NAME));
    }

    candidates.into_iter().find(|candidate| candidate.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))
}
