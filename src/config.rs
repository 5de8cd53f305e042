//! Configuration loading.
//!
//! The bot reads `~/.coverbot/config.toml` (or `$COVERBOT_CONFIG`). Every
//! section is optional. Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Telegram settings.
    pub telegram: TelegramConfig,

    /// Upload limits.
    pub limits: LimitsConfig,

    /// `ffmpeg` parameters.
    pub media: MediaConfig,

    /// Where files, the database and logs live.
    pub storage: StorageConfig,
}

/// Telegram bot settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Environment variable name holding the bot token.
    pub bot_token_env: String,

    /// Signature appended to captions of returned files, e.g. `@CoverBot`.
    pub bot_username: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token_env: "COVERBOT_TELEGRAM_TOKEN".to_owned(),
            bot_username: String::new(),
        }
    }
}

/// Limits on incoming media.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Longest accepted media, in seconds.
    pub max_duration_secs: u32,

    /// Largest accepted media, in bytes.
    pub max_file_size_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: default_max_duration_secs(),
            max_file_size_bytes: default_max_file_size_bytes(),
        }
    }
}

impl LimitsConfig {
    /// Whether a file must be refused.
    ///
    /// A file is refused only when it is both too long (at or over the
    /// duration limit) and too large (over the size limit); long but small
    /// files (low bitrate podcasts) and short but large ones pass.
    pub fn rejects(&self, duration_secs: u32, size_bytes: u64) -> bool {
        duration_secs >= self.max_duration_secs && size_bytes > self.max_file_size_bytes
    }
}

/// Transcoding parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaConfig {
    /// `ffmpeg` binary name or path.
    pub ffmpeg_path: String,

    /// Length of generated GIFs, in seconds.
    pub gif_seconds: u32,

    /// Frame rate of generated GIFs.
    pub gif_fps: u32,

    /// Width of generated GIFs; height follows the aspect ratio.
    pub gif_width: u32,

    /// Side of the square circular video note, in pixels.
    pub video_note_size: u32,

    /// Longest circular video note Telegram accepts, in seconds.
    pub video_note_max_secs: u32,

    /// Opus bitrate for voice messages made from music.
    pub voice_bitrate: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_owned(),
            gif_seconds: 3,
            gif_fps: 30,
            gif_width: 320,
            video_note_size: 512,
            video_note_max_secs: 60,
            voice_bitrate: "64k".to_owned(),
        }
    }
}

/// Filesystem locations. Unset paths resolve under the config directory.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Per-user download directories live here.
    pub downloads_dir: Option<PathBuf>,

    /// SQLite database file.
    pub database: Option<PathBuf>,

    /// Rotated log files.
    pub logs_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Downloads directory, defaulting to `<base>/downloads`.
    pub fn downloads_dir(&self, base: &Path) -> PathBuf {
        self.downloads_dir
            .clone()
            .unwrap_or_else(|| base.join("downloads"))
    }

    /// Database path, defaulting to `<base>/coverbot.db`.
    pub fn database(&self, base: &Path) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| base.join("coverbot.db"))
    }

    /// Logs directory, defaulting to `<base>/logs`.
    pub fn logs_dir(&self, base: &Path) -> PathBuf {
        self.logs_dir.clone().unwrap_or_else(|| base.join("logs"))
    }
}

fn default_max_duration_secs() -> u32 {
    3600
}
fn default_max_file_size_bytes() -> u64 {
    48_000_000
}

impl Config {
    /// Load configuration with precedence env vars > file > defaults.
    ///
    /// A `.env` file in the working directory is honoured. A missing
    /// config file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or the home directory cannot be determined.
    pub fn load() -> Result<Self> {
        // Absence of .env is normal.
        let _ = dotenvy::dotenv();
        let env = |key: &str| std::env::var(key).ok();
        let path = config_path_with(env)?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(env);
        Ok(config)
    }

    /// Load from one TOML file, without env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("invalid config at {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config at {}: {e}",
                path.display()
            )),
        }
    }

    /// Parse a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML or mistyped values.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply `COVERBOT_*` overrides from a resolver.
    ///
    /// Takes a resolver so tests never touch the process environment.
    /// Unparseable numbers are logged and ignored.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("COVERBOT_BOT_USERNAME") {
            self.telegram.bot_username = v;
        }
        if let Some(v) = env("COVERBOT_FFMPEG") {
            self.media.ffmpeg_path = v;
        }
        if let Some(v) = env("COVERBOT_DOWNLOADS_DIR") {
            self.storage.downloads_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = env("COVERBOT_DATABASE") {
            self.storage.database = Some(PathBuf::from(v));
        }
        if let Some(v) = env("COVERBOT_LOGS_DIR") {
            self.storage.logs_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = env("COVERBOT_MAX_DURATION_SECS") {
            match v.parse() {
                Ok(n) => self.limits.max_duration_secs = n,
                Err(_) => tracing::warn!(
                    var = "COVERBOT_MAX_DURATION_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("COVERBOT_MAX_FILE_SIZE") {
            match v.parse() {
                Ok(n) => self.limits.max_file_size_bytes = n,
                Err(_) => tracing::warn!(
                    var = "COVERBOT_MAX_FILE_SIZE",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }

    /// Read the bot token from the variable named by `bot_token_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or empty.
    pub fn bot_token(&self) -> Result<String> {
        let name = &self.telegram.bot_token_env;
        match std::env::var(name) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => anyhow::bail!("bot token not set: export {name}"),
        }
    }
}

/// Resolve the config directory (`~/.coverbot/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".coverbot"))
}

/// Resolve the config file path: `$COVERBOT_CONFIG` or `~/.coverbot/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(p) = env("COVERBOT_CONFIG") {
        return Ok(PathBuf::from(p));
    }
    Ok(config_dir()?.join("config.toml"))
}
