//! Core configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! recent_limit = 5
//! close_deactivates_active = false
//!
//! [ui]
//! show_file_manager = false
//! ```

use std::fs;
use std::path::Path;

use doco_model::UiFlag;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of opened documents shown in the "recently opened" view.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Length of the recency window shown to the user.
    pub recent_limit: usize,
    /// Whether closing the active document also clears activation.
    pub close_deactivates_active: bool,
    pub ui: UiDefaults,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            close_deactivates_active: false,
            ui: UiDefaults::default(),
        }
    }
}

/// Initial values of the UI flags, restored on logout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiDefaults {
    pub show_file_manager: bool,
}

impl UiDefaults {
    pub fn value(&self, flag: UiFlag) -> bool {
        match flag {
            UiFlag::ShowFileManager => self.show_file_manager,
        }
    }
}

impl CoreConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|source| ConfigError::Toml { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded core config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "recent_limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
