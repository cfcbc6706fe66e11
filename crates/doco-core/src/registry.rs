//! Known documents and the recency-ordered list of opened ids.
//!
//! Invariant: every id in `opened` resolves to a document in `documents`,
//! and `opened` holds no duplicates.

use doco_model::{Document, DocumentId};

use crate::error::StateError;

/// Result of removing a document from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedDocument {
    pub document: Document,
    /// Whether the id was pruned from the opened list.
    pub was_opened: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRegistry {
    /// Display order is insertion order.
    documents: Vec<Document>,
    /// Most recently opened first.
    opened: Vec<DocumentId>,
}

impl DocumentRegistry {
    /// Build a registry from a listing. Later duplicates replace earlier ones.
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut registry = Self::default();
        for document in documents {
            registry.insert(document);
        }
        registry
    }

    pub fn list_documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn find_by_id(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Opened ids, most recent first. Not capped.
    pub fn opened(&self) -> &[DocumentId] {
        &self.opened
    }

    /// The first `limit` opened ids.
    pub fn recent_ids(&self, limit: usize) -> &[DocumentId] {
        &self.opened[..self.opened.len().min(limit)]
    }

    /// The recency window resolved to documents.
    pub fn recent(&self, limit: usize) -> Vec<&Document> {
        self.recent_ids(limit)
            .iter()
            .filter_map(|id| self.find_by_id(id))
            .collect()
    }

    /// Move `id` to the front of the opened list, inserting it if absent.
    pub fn open(&mut self, id: &DocumentId) -> Result<(), StateError> {
        if !self.contains(id) {
            return Err(StateError::NotFound(id.clone()));
        }
        self.opened.retain(|opened| opened != id);
        self.opened.insert(0, id.clone());
        Ok(())
    }

    /// Drop `id` from the opened list. Returns whether it was present.
    pub fn close(&mut self, id: &DocumentId) -> bool {
        let before = self.opened.len();
        self.opened.retain(|opened| opened != id);
        self.opened.len() != before
    }

    /// Delete a document and prune it from the opened list.
    pub fn remove(&mut self, id: &DocumentId) -> Result<RemovedDocument, StateError> {
        let idx = self
            .documents
            .iter()
            .position(|d| &d.id == id)
            .ok_or_else(|| StateError::NotFound(id.clone()))?;
        let document = self.documents.remove(idx);
        let was_opened = self.close(id);
        Ok(RemovedDocument {
            document,
            was_opened,
        })
    }

    /// Add a document, or update name and metadata of an existing id in place.
    ///
    /// Returns `true` if the id was new.
    pub fn insert(&mut self, document: Document) -> bool {
        if let Some(existing) = self.documents.iter_mut().find(|d| d.id == document.id) {
            *existing = document;
            false
        } else {
            self.documents.push(document);
            true
        }
    }

    /// Replace the known set with a fresh listing.
    ///
    /// Opened ids that no longer resolve are pruned; relative order of the
    /// survivors is kept. Returns the ids of documents that disappeared.
    pub fn replace_all(&mut self, documents: impl IntoIterator<Item = Document>) -> Vec<DocumentId> {
        let fresh = Self::new(documents);
        let dropped: Vec<DocumentId> = self
            .documents
            .iter()
            .filter(|d| !fresh.contains(&d.id))
            .map(|d| d.id.clone())
            .collect();
        self.documents = fresh.documents;
        let documents = &self.documents;
        self.opened
            .retain(|id| documents.iter().any(|d| &d.id == id));
        dropped
    }
}
