//! Configuration for the NEON_CORE boot screen.
//!
//! Read from `~/.neon/config.toml`. A missing file is not an error; every
//! field is optional and falls back to the built-in boot timing.
//!
//! ```toml
//! [app]
//! high_contrast = false
//! ascii_only = false
//!
//! [boot]
//! char_delay_ms = 10
//! reveal_pause_ms = 500
//! reduced_motion = false
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Typewriter cadence the boot sequence uses unless configured otherwise.
pub const DEFAULT_CHAR_DELAY_MS: u64 = 10;
/// Pause between the last boot line and the reveal.
pub const DEFAULT_REVEAL_PAUSE_MS: u64 = 500;

const MAX_CHAR_DELAY_MS: u64 = 1_000;
const MAX_REVEAL_PAUSE_MS: u64 = 60_000;

const CHAR_DELAY_ENV: &str = "NEON_CHAR_DELAY_MS";
const REDUCED_MOTION_ENV: &str = "NEON_REDUCED_MOTION";

#[derive(Debug, Default, Deserialize)]
pub struct NeonConfig {
    pub app: Option<AppConfig>,
    pub boot: Option<BootConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Use ASCII-only glyphs for the logo and cursor.
    #[serde(default)]
    pub ascii_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct BootConfig {
    pub char_delay_ms: Option<u64>,
    pub reveal_pause_ms: Option<u64>,
    /// Type each line instantly.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config at {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path,
        }
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".neon").join("config.toml"))
}

impl NeonConfig {
    /// Load the user config. `Ok(None)` when there is no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let config: Self = match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    fn validate(&self) -> Result<(), String> {
        let Some(boot) = &self.boot else {
            return Ok(());
        };
        if let Some(ms) = boot.char_delay_ms
            && ms > MAX_CHAR_DELAY_MS
        {
            return Err(format!(
                "boot.char_delay_ms = {ms} exceeds {MAX_CHAR_DELAY_MS}"
            ));
        }
        if let Some(ms) = boot.reveal_pause_ms
            && ms > MAX_REVEAL_PAUSE_MS
        {
            return Err(format!(
                "boot.reveal_pause_ms = {ms} exceeds {MAX_REVEAL_PAUSE_MS}"
            ));
        }
        Ok(())
    }
}

/// Boot timing after applying the config file and environment overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootSettings {
    pub char_delay: Duration,
    pub reveal_pause: Duration,
    pub reduced_motion: bool,
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(DEFAULT_CHAR_DELAY_MS),
            reveal_pause: Duration::from_millis(DEFAULT_REVEAL_PAUSE_MS),
            reduced_motion: false,
        }
    }
}

impl BootSettings {
    /// Resolve settings from the process environment.
    #[must_use]
    pub fn from_config(config: Option<&NeonConfig>) -> Self {
        Self::resolve(config, |key| env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup.
    ///
    /// Precedence: environment, then config file, then defaults. Reduced
    /// motion (from either source) forces a zero char delay.
    pub fn resolve<F>(config: Option<&NeonConfig>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let boot = config.and_then(|cfg| cfg.boot.as_ref());
        let mut settings = Self::default();

        if let Some(ms) = boot.and_then(|b| b.char_delay_ms) {
            settings.char_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = boot.and_then(|b| b.reveal_pause_ms) {
            settings.reveal_pause = Duration::from_millis(ms);
        }

        if let Some(raw) = env(CHAR_DELAY_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms <= MAX_CHAR_DELAY_MS => {
                    settings.char_delay = Duration::from_millis(ms);
                }
                _ => tracing::warn!("Ignoring invalid {CHAR_DELAY_ENV}={raw:?}"),
            }
        }

        let reduced_motion = match env(REDUCED_MOTION_ENV) {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring invalid {REDUCED_MOTION_ENV}={raw:?}");
                boot.is_some_and(|b| b.reduced_motion)
            }),
            None => boot.is_some_and(|b| b.reduced_motion),
        };
        if reduced_motion {
            settings.char_delay = Duration::ZERO;
            settings.reduced_motion = true;
        }

        settings
    }
}

/// Presentation options read from `[app]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiSettings {
    pub high_contrast: bool,
    pub ascii_only: bool,
}

impl UiSettings {
    #[must_use]
    pub fn from_config(config: Option<&NeonConfig>) -> Self {
        config
            .and_then(|cfg| cfg.app.as_ref())
            .map(|app| Self {
                high_contrast: app.high_contrast,
                ascii_only: app.ascii_only,
            })
            .unwrap_or_default()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
