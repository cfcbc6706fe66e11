//! Intent scripts.
//!
//! A script describes what the external collaborators answer (session user
//! or failure, document listing) and the intents the presentation layer
//! issues, in order:
//!
//! ```toml
//! [session]
//! user = { id = "ada", name = "Ada" }
//!
//! [[documents]]
//! id = "report"
//! name = "Annual report.pdf"
//! metadata = { pages = "12" }
//!
//! [[intents]]
//! action = "check_auth"
//!
//! [[intents]]
//! action = "activate"
//! id = "report"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use doco_core::{Intent, StaticAuthProvider, StaticDocumentSource};
use doco_model::{Document, User};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub session: SessionFixture,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub intents: Vec<Intent>,
}

/// What the auth provider answers. No user and no failure means anonymous.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionFixture {
    pub user: Option<User>,
    /// Makes every check fail with this message; takes precedence over `user`.
    pub failure: Option<String>,
}

impl SessionFixture {
    pub fn provider(&self) -> StaticAuthProvider {
        match (&self.failure, &self.user) {
            (Some(message), _) => StaticAuthProvider::failing(message.clone()),
            (None, Some(user)) => StaticAuthProvider::authenticated(user.clone()),
            (None, None) => StaticAuthProvider::anonymous(),
        }
    }
}

impl Script {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse intent script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read intent script {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("load intent script {}", path.display()))
    }

    pub fn document_source(&self) -> StaticDocumentSource {
        StaticDocumentSource::new(self.documents.clone())
    }
}
