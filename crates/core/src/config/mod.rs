//! Configuration for uv-autoenv
//!
//! Loaded from a TOML file, by default `$XDG_CONFIG_HOME/uv-autoenv/config.toml`.
//! A missing file yields the defaults.
//!
//! ```toml
//! marker = ".venv"
//!
//! [hooks]
//! on_activate = ["echo activated"]
//! on_deactivate = ["echo deactivated"]
//! ```

use crate::search::{AncestorSearch, DEFAULT_MARKER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV_VAR: &str = "UV_AUTOENV_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Name of the environment marker directory
    pub marker: String,

    /// Shell commands run after transitions
    pub hooks: HookCommands,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            hooks: HookCommands::default(),
        }
    }
}

/// Shell command lines registered as hooks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct HookCommands {
    /// Commands run after activation, in order
    pub on_activate: Vec<String>,
    /// Commands run after deactivation, in order
    pub on_deactivate: Vec<String>,
}

impl Config {
    /// Default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("uv-autoenv").join("config.toml"))
    }

    /// Resolve the configuration path, honoring `UV_AUTOENV_CONFIG`
    pub fn resolve_path() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// Load from the resolved path, falling back to defaults when absent
    pub fn load_default() -> Result<Self> {
        match Self::resolve_path() {
            Some(path) => Self::load_or_default(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`, returning defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                debug!(path = %path.display(), "Loading configuration");
                Self::parse(&contents, path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(Error::io(e, Some(path.to_path_buf()), "read configuration")),
        }
    }

    /// Parse TOML contents; `origin` is used in error messages
    pub fn parse(contents: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| {
            Error::configuration_with_help(
                format!("Failed to parse {}: {}", origin.display(), e.message()),
                "See the configuration section of the README for valid keys",
            )
        })?;
        // Reject bad markers at load time rather than on first use
        config.search()?;
        Ok(config)
    }

    /// Replace the marker when an override is given
    #[must_use]
    pub fn with_marker_override(mut self, marker: Option<String>) -> Self {
        if let Some(marker) = marker {
            self.marker = marker;
        }
        self
    }

    /// Build the ancestor search for the configured marker
    pub fn search(&self) -> Result<AncestorSearch> {
        AncestorSearch::new(self.marker.clone())
    }
}
