//! Configuration management for ragchat.
//!
//! Handles persistence and loading of the backend location, request limits
//! and layout preferences.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `backend_url`
pub const BACKEND_URL_ENV: &str = "RAGCHAT_BACKEND_URL";

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the question-answering backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Upper bound on a single answer request, in seconds (5-3600)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Seconds between background health checks (5-3600)
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,

    /// Whether conversations are saved between runs
    #[serde(default = "default_persist_conversations")]
    pub persist_conversations: bool,

    /// Layout configuration
    #[serde(default)]
    pub layout: LayoutConfig,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    600
}

fn default_health_check_interval_secs() -> u64 {
    30
}

fn default_persist_conversations() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            health_check_interval_secs: default_health_check_interval_secs(),
            persist_conversations: default_persist_conversations(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;

        Ok(config_dir.join("ragchat").join("config.json"))
    }

    /// Clamp out-of-range values
    pub fn validate(&mut self) {
        self.request_timeout_secs = self.request_timeout_secs.clamp(5, 3600);
        self.health_check_interval_secs = self.health_check_interval_secs.clamp(5, 3600);
        self.layout.validate();
    }

    /// Replace `backend_url` with a non-blank override (usually from the environment)
    pub fn apply_backend_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
    }

    /// Per-request timeout for answer requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pause between background health checks
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_secs(self.health_check_interval_secs)
    }
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Sidebar width as percentage (10-50%)
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_pct: u8,

    /// Sidebar position (left or right)
    #[serde(default)]
    pub sidebar_position: SidebarPosition,
}

fn default_sidebar_width() -> u8 {
    25
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sidebar_width_pct: default_sidebar_width(),
            sidebar_position: SidebarPosition::Left,
        }
    }
}

impl LayoutConfig {
    /// Validate and clamp sidebar width to valid range (10-50%)
    pub fn validate(&mut self) {
        self.sidebar_width_pct = self.sidebar_width_pct.clamp(10, 50);
    }
}

/// Sidebar position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    #[default]
    Left,
    Right,
}

impl SidebarPosition {
    /// Toggle between left and right
    pub fn toggle(&self) -> Self {
        match self {
            SidebarPosition::Left => SidebarPosition::Right,
            SidebarPosition::Right => SidebarPosition::Left,
        }
    }
}
