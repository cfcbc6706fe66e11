//! Immutable view model handed to presentation components.

use doco_model::{AuthStatus, Document, DocumentId, User};
use serde::Serialize;

use crate::view::UiState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Increases with every published snapshot.
    pub revision: u64,
    pub status: AuthStatus,
    /// Message of the last failed session check, if the session is anonymous
    /// because of it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_failure: Option<String>,
    pub documents: Vec<Document>,
    /// Every opened id, most recent first.
    pub opened_documents: Vec<DocumentId>,
    /// The bounded recency window, resolved.
    pub recent_documents: Vec<Document>,
    pub active_document: Option<DocumentId>,
    pub ui: UiState,
}

/// What the presentation layer draws for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    /// Session check outstanding.
    Loading,
    Login { failure: Option<&'a str> },
    Workspace {
        file_manager: bool,
        content: Content<'a>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    Viewer(&'a Document),
    /// No active document. An empty `recent` means the welcome view offers
    /// to open the file manager instead.
    Welcome { recent: Vec<&'a Document> },
}

impl Snapshot {
    pub fn user(&self) -> Option<&User> {
        self.status.user()
    }

    pub fn find_document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn active(&self) -> Option<&Document> {
        self.active_document
            .as_ref()
            .and_then(|id| self.find_document(id))
    }

    /// Active but closed: still rendered, but absent from the opened list.
    pub fn is_active_unlisted(&self) -> bool {
        self.active_document
            .as_ref()
            .is_some_and(|id| !self.opened_documents.contains(id))
    }

    pub fn screen(&self) -> Screen<'_> {
        match &self.status {
            AuthStatus::Loading => Screen::Loading,
            AuthStatus::Anonymous => Screen::Login {
                failure: self.auth_failure.as_deref(),
            },
            AuthStatus::Authenticated(_) => {
                let content = match self.active() {
                    Some(document) => Content::Viewer(document),
                    None => Content::Welcome {
                        recent: self
                            .recent_documents
                            .iter()
                            .filter(|d| self.find_document(&d.id).is_some())
                            .collect(),
                    },
                };
                Screen::Workspace {
                    file_manager: self.ui.show_file_manager(),
                    content,
                }
            }
        }
    }
}
