//! Settings and persisted preferences.
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional TOML file, the `QUIZ_SERVER` environment variable and the
//! command line. Preferences are user toggles saved between runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ClientError;
use crate::protocol::DEFAULT_SERVER;

pub const SERVER_ENV: &str = "QUIZ_SERVER";
const DEFAULT_LOG_FILE: &str = "quiz-room.log";
const DEFAULT_PREFS_FILE: &str = "quiz-room.prefs.toml";
const MIN_TICK_MS: u64 = 16;
/// Countdowns must not lag more than a quarter second.
const MAX_TICK_MS: u64 = 250;

/// Runtime settings of the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the quiz server.
    pub server: String,
    /// Where tracing output goes; the terminal belongs to the UI.
    pub log_file: PathBuf,
    /// Where preferences such as the mute flag are kept.
    pub prefs_file: PathBuf,
    /// Redraw interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            prefs_file: PathBuf::from(DEFAULT_PREFS_FILE),
            tick_ms: MAX_TICK_MS,
        }
    }
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub log_file: Option<PathBuf>,
    pub prefs_file: Option<PathBuf>,
}

impl Settings {
    /// Parse a settings file.
    pub fn from_toml(text: &str) -> Result<Self, ClientError> {
        Ok(toml::from_str(text)?)
    }

    /// Build settings from every layer.
    pub fn load(
        file: Option<&Path>,
        env_server: Option<String>,
        overrides: Overrides,
    ) -> Result<Self, ClientError> {
        let mut settings = match file {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ClientError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        if let Some(server) = env_server.filter(|s| !s.trim().is_empty()) {
            settings.server = server;
        }
        if let Some(server) = overrides.server {
            settings.server = server;
        }
        if let Some(log_file) = overrides.log_file {
            settings.log_file = log_file;
        }
        if let Some(prefs_file) = overrides.prefs_file {
            settings.prefs_file = prefs_file;
        }
        settings.server = settings.server.trim_end_matches('/').to_string();
        settings.tick_ms = settings.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS);

        Ok(settings)
    }
}

/// User preferences persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub sound_muted: bool,
}

impl Preferences {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences yet");
                Ok(Self::default())
            }
            Err(source) => Err(ClientError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        let text = toml::to_string(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
