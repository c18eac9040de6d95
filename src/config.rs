//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$CHATSHELL_CONFIG` (environment variable)
//! 2. `~/.config/chatshell/config.toml` (Linux/macOS)
//!    `%APPDATA%\chatshell\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! ```toml
//! [archive]
//! path = "/home/felipe/exports/inbox/easydoora_1294078478650384"
//!
//! [identity]
//! owner = "Felipe"
//!
//! [identity.aliases]
//! Felipe = ["Felipe Canales H.", "Felipe Canales H.ð"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::archive::indexer::Zone;
use crate::error::{ChatError, Result};
use crate::model::identity::Identity;
use crate::text::repair::RepairMode;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Where the archive lives and how to read it.
    pub archive: ArchiveConfig,
    /// Display and paging settings.
    pub display: DisplayConfig,
    /// Archive owner and sender aliases.
    pub identity: IdentityConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for archive snapshots and logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Time zone for message dates: "local", "utc" or an offset like "-03:00".
    pub timezone: String,
    /// UI language ("en", "es"). Defaults to the system locale.
    pub language: Option<String>,
}

/// Archive location and decoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Archive directory used when none is given on the command line.
    pub path: Option<PathBuf>,
    /// Photo folder, relative to the archive directory.
    pub photos_dir: PathBuf,
    /// Video folder, relative to the archive directory.
    pub videos_dir: PathBuf,
    /// Audio folder, relative to the archive directory.
    pub audio_dir: PathBuf,
    /// Text repair: "latin1", "windows-1252" or "off".
    pub repair_encoding: String,
}

/// Display and paging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Color theme: "dark" or "light".
    pub theme: String,
    /// Messages per page.
    pub page_size: usize,
    /// `strftime` format for the time shown next to each message.
    pub time_format: String,
}

/// Who owns the archive and which spellings belong to whom.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Canonical name of the archive owner; their messages go on the right.
    pub owner: Option<String>,
    /// Canonical name → every spelling found in exports.
    pub aliases: BTreeMap<String, Vec<String>>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
            timezone: "local".to_string(),
            language: None,
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: None,
            photos_dir: PathBuf::from("photos"),
            videos_dir: PathBuf::from("videos"),
            audio_dir: PathBuf::from("audio"),
            repair_encoding: "latin1".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            page_size: 10,
            time_format: "%H:%M".to_string(),
        }
    }
}

// ── Typed accessors ─────────────────────────────────────────────

impl GeneralConfig {
    /// Parsed time zone.
    pub fn zone(&self) -> Result<Zone> {
        self.timezone.parse()
    }
}

impl ArchiveConfig {
    /// Parsed text repair mode.
    pub fn repair_mode(&self) -> Result<RepairMode> {
        self.repair_encoding
            .parse::<RepairMode>()
            .map_err(ChatError::InvalidConfig)
    }
}

impl IdentityConfig {
    /// Build the alias table used for rendering.
    pub fn identity(&self) -> Identity {
        Identity::new(self.owner.clone(), &self.aliases)
    }
}

impl Config {
    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.display.page_size == 0 {
            return Err(ChatError::InvalidConfig(
                "display.page_size must be at least 1".to_string(),
            ));
        }
        self.general.zone()?;
        self.archive.repair_mode()?;
        Ok(())
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            return load_config_from(&path);
        }
    }
    Config::default()
}

/// Load configuration from an explicit file, falling back to defaults.
pub fn load_config_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "Loaded config");
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse config, using defaults"
                );
                Config::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read config file, using defaults"
            );
            Config::default()
        }
    }
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    // 1. Environment variable override
    if let Ok(env_path) = std::env::var("CHATSHELL_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    // 2. Standard config directory
    dirs::config_dir().map(|d| d.join("chatshell").join("config.toml"))
}

/// Return the cache directory for archive snapshots, logs, etc.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatshell")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("chatshell.log")
}
