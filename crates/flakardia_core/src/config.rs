//! Per-user application settings.
//!
//! Settings live in a JSON file under the platform config directory. Debug
//! runs use a separate file so experiments never touch the real library
//! choice.

use crate::logging::{parse_log_level, LogLevel};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "flakardia";
const CONFIG_FILE: &str = "config.json";
const DEBUG_CONFIG_FILE: &str = "config-debug.json";

/// Which settings node the process uses and how chatty it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebugMode {
    #[default]
    NoDebug,
    Debug,
    Verbose,
}

impl DebugMode {
    pub fn is_debug_enabled(self) -> bool {
        !matches!(self, Self::NoDebug)
    }

    /// Log level implied by the mode when the config does not set one.
    pub fn default_log_level(self) -> LogLevel {
        match self {
            Self::NoDebug => LogLevel::default_for_build(),
            Self::Debug => LogLevel::Debug,
            Self::Verbose => LogLevel::Trace,
        }
    }
}

/// Persisted settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AppConfig {
    /// Root directory of the active flashcard library.
    pub library_path: Option<PathBuf>,
    /// Overrides the mode's default log level.
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Effective log level; an unparsable value falls back to the mode default.
    pub fn effective_log_level(&self, mode: DebugMode) -> LogLevel {
        match self.log_level.as_deref().map(parse_log_level) {
            Some(Ok(level)) => level,
            Some(Err(err)) => {
                warn!("event=config_read module=config status=fallback reason={err}");
                mode.default_log_level()
            }
            None => mode.default_log_level(),
        }
    }
}

/// Configuration load/save failures.
#[derive(Debug)]
pub enum ConfigError {
    NoConfigDir,
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "could not determine the user config directory"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoConfigDir => None,
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Reads and writes [`AppConfig`] for one debug mode.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
    mode: DebugMode,
}

impl ConfigStore {
    /// Store in the platform config directory, e.g. `~/.config/flakardia`.
    pub fn for_user(mode: DebugMode) -> Result<Self, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::in_dir(base.join(APP_DIR_NAME), mode))
    }

    pub fn in_dir(dir: impl Into<PathBuf>, mode: DebugMode) -> Self {
        Self {
            dir: dir.into(),
            mode,
        }
    }

    pub fn file_path(&self) -> PathBuf {
        let name = if self.mode.is_debug_enabled() {
            DEBUG_CONFIG_FILE
        } else {
            CONFIG_FILE
        };
        self.dir.join(name)
    }

    /// Loads settings; a missing file yields defaults.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let path = self.file_path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        serde_json::from_str(&json).map_err(|source| ConfigError::Json { path, source })
    }

    /// Saves settings atomically.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let path = self.file_path();
        let json = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomically(&self.dir, &path, &json).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            "event=config_save module=config status=ok debug={}",
            self.mode.is_debug_enabled()
        );
        Ok(())
    }

    pub fn library_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        Ok(self.load()?.library_path)
    }

    pub fn set_library_path(&self, library_path: &Path) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.library_path = Some(library_path.to_path_buf());
        self.save(&config)
    }
}

fn write_atomically(dir: &Path, target: &Path, content: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut temp = tempfile::Builder::new()
        .prefix("config")
        .suffix(".json")
        .tempfile_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.persist(target).map_err(|err| err.error)?;
    Ok(())
}
