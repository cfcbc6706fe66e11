//! Document listing at session start.

use async_trait::async_trait;
use doco_model::{Document, User};

use crate::error::SourceError;

/// External collaborator providing the initial document set for a user.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn list_documents(&self, user: &User) -> Result<Vec<Document>, SourceError>;
}

/// Source that hands every user the same documents.
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentSource {
    documents: Vec<Document>,
}

impl StaticDocumentSource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    async fn list_documents(&self, _user: &User) -> Result<Vec<Document>, SourceError> {
        Ok(self.documents.clone())
    }
}
