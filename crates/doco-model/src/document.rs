use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::DocumentId;

/// A document known to the registry.
///
/// Metadata is free-form and kept in key order so it displays stably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style metadata insert.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
