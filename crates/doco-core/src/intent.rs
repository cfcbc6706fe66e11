use std::fmt;

use doco_model::{Document, DocumentId};
use serde::{Deserialize, Serialize};

/// A named state-mutation request from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Intent {
    CheckAuth,
    Activate { id: DocumentId },
    Deactivate,
    Open { id: DocumentId },
    Close { id: DocumentId },
    Remove { id: DocumentId },
    ToggleFlag { name: String },
    SetFlag { name: String, value: bool },
    AddDocument { document: Document },
    Logout,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckAuth => "check_auth",
            Self::Activate { .. } => "activate",
            Self::Deactivate => "deactivate",
            Self::Open { .. } => "open",
            Self::Close { .. } => "close",
            Self::Remove { .. } => "remove",
            Self::ToggleFlag { .. } => "toggle_flag",
            Self::SetFlag { .. } => "set_flag",
            Self::AddDocument { .. } => "add_document",
            Self::Logout => "logout",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activate { id } | Self::Open { id } | Self::Close { id } | Self::Remove { id } => {
                write!(f, "{}({id})", self.name())
            }
            Self::ToggleFlag { name } => write!(f, "{}({name})", self.name()),
            Self::SetFlag { name, value } => write!(f, "{}({name}={value})", self.name()),
            Self::AddDocument { document } => write!(f, "{}({})", self.name(), document.id),
            Self::CheckAuth | Self::Deactivate | Self::Logout => f.write_str(self.name()),
        }
    }
}
