use serde::{Deserialize, Serialize};

use crate::UserId;

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
        }
    }
}

/// Authentication status of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "user", rename_all = "snake_case")]
pub enum AuthStatus {
    /// A check is outstanding (also the state before the first check).
    #[default]
    Loading,
    Authenticated(User),
    Anonymous,
}

impl AuthStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Loading | Self::Anonymous => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Authenticated(_) => "authenticated",
            Self::Anonymous => "anonymous",
        }
    }
}
