use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Named UI visibility flags.
///
/// The set is closed: names outside it are rejected rather than created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UiFlag {
    #[serde(rename = "showFileManager")]
    ShowFileManager,
}

impl UiFlag {
    /// Get all flags in display order
    pub fn all() -> &'static [UiFlag] {
        &[Self::ShowFileManager]
    }

    /// Wire name used by the presentation layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShowFileManager => "showFileManager",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ShowFileManager => "File manager panel",
        }
    }
}

impl FromStr for UiFlag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| ModelError::UnknownFlag(s.to_string()))
    }
}

impl fmt::Display for UiFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
