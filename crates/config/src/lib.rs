//! mapdef Configuration Management
//!
//! Loads the map loader's settings file and the message catalog used to
//! localize map titles.

mod messages;

pub use messages::MessageCatalog;

use mapdef_core::{to_bool, to_int};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config at line {line}: {message}")]
    Invalid { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<ConfigError> for mapdef_core::CoreError {
    fn from(err: ConfigError) -> Self {
        mapdef_core::CoreError::Config(err.to_string())
    }
}

/// Loader configuration from `mapdef.txt`
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Directory map files are resolved against (from "maps_dir" option)
    pub maps_dir: PathBuf,
    /// Language code for map titles (from "language" option)
    pub language: String,
    /// Message catalog file (from "strings_file" option)
    pub strings_file: Option<PathBuf>,
    /// Maximum number of maps kept in the cache (from "cache_max_maps" option)
    pub cache_max_maps: usize,
    /// Cache TTL in seconds, 0 = never expire (from "cache_ttl_secs" option)
    pub cache_ttl_secs: u64,
    /// Treat advisory diagnostics as failures (from "strict" option)
    pub strict: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            maps_dir: PathBuf::from("maps"),
            language: "en".into(),
            strings_file: None,
            cache_max_maps: 32,
            cache_ttl_secs: 0,
            strict: false,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a settings file
    ///
    /// Relative paths inside the file are resolved against the file's
    /// directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;

        if let Some(base) = path.parent() {
            if config.maps_dir.is_relative() {
                config.maps_dir = base.join(&config.maps_dir);
            }
            if let Some(strings) = config.strings_file.as_mut() {
                if strings.is_relative() {
                    *strings = base.join(&*strings);
                }
            }
        }

        Ok(config)
    }

    /// Load the message catalog named by `strings_file`, if any
    pub fn load_messages(&self) -> Result<MessageCatalog> {
        match &self.strings_file {
            Some(path) => MessageCatalog::load_from_file(path),
            None => Ok(MessageCatalog::default()),
        }
    }

    /// Parse settings file content
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(eq_pos) = line.find('=') else {
                return Err(ConfigError::Invalid {
                    line: index + 1,
                    message: format!("expected 'key = value', got '{}'", line),
                });
            };

            let key = line[..eq_pos].trim();
            let value = line[eq_pos + 1..].trim();
            config.parse_option(key, value);
        }

        Ok(config)
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key {
            "maps_dir" => self.maps_dir = PathBuf::from(value),
            "language" => self.language = value.into(),
            "strings_file" => {
                self.strings_file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "cache_max_maps" => {
                self.cache_max_maps = to_int(value, 32).max(1) as usize;
            }
            "cache_ttl_secs" => {
                self.cache_ttl_secs = to_int(value, 0).max(0) as u64;
            }
            "strict" => self.strict = to_bool(value),
            _ => {
                tracing::warn!("Unknown config option: {} = {}", key, value);
            }
        }
    }

    /// Log the active configuration
    pub fn display(&self) {
        tracing::info!("Loader configuration:");
        tracing::info!("  Maps directory: {}", self.maps_dir.display());
        tracing::info!("  Language: {}", self.language);
        match &self.strings_file {
            Some(path) => tracing::info!("  Strings: {}", path.display()),
            None => tracing::info!("  Strings: (none)"),
        }
        tracing::info!(
            "  Cache: {} maps, ttl {}s",
            self.cache_max_maps,
            self.cache_ttl_secs
        );
        tracing::info!("  Strict: {}", self.strict);
    }
}
