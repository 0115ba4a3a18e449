//! Configuration file parser for ~/.config/feedreader/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`, which carries the built-in feed list. Unknown keys are
//! accepted but logged as warnings.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::registry::{FeedDescriptor, FeedRegistry, RegistryError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry index loaded by `App::init`.
    pub initial_feed: usize,

    /// Maximum number of entries rendered per feed (0 = unlimited).
    pub max_entries_per_feed: usize,

    /// Per-request timeout for feed fetches, in seconds.
    pub request_timeout_secs: u64,

    /// Allow feed URLs on localhost and private networks.
    pub allow_private_hosts: bool,

    /// Feeds shown in the menu, in order. Replaces the built-in list when set.
    pub feeds: Vec<FeedDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_feed: 0,
            max_entries_per_feed: 0,
            request_timeout_secs: 30,
            allow_private_hosts: false,
            feeds: default_feeds(),
        }
    }
}

fn default_feeds() -> Vec<FeedDescriptor> {
    vec![
        FeedDescriptor::new("Udacity Blog", "http://blog.udacity.com/feed"),
        FeedDescriptor::new("CSS Tricks", "http://feeds.feedburner.com/CssTricks"),
        FeedDescriptor::new("HTML5 Rocks", "http://feeds.feedburner.com/html5rocks"),
        FeedDescriptor::new(
            "Linear Digressions",
            "http://feeds.feedburner.com/udacity-linear-digressions",
        ),
    ]
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "initial_feed",
        "max_entries_per_feed",
        "request_timeout_secs",
        "allow_private_hosts",
        "feeds",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            feeds = config.feeds.len(),
            initial_feed = config.initial_feed,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validates the configured feeds into a registry.
    pub fn registry(&self) -> Result<FeedRegistry, RegistryError> {
        FeedRegistry::new(self.feeds.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// `None` when unlimited.
    pub fn entry_limit(&self) -> Option<usize> {
        (self.max_entries_per_feed > 0).then_some(self.max_entries_per_feed)
    }
}

// ============================================================================
// Tests
// ============================================================================
