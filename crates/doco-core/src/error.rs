#![deny(unsafe_code)]

use std::path::PathBuf;

use doco_model::DocumentId;

/// Rejection reasons for intents issued by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("unknown UI flag: {0}")]
    UnknownFlag(String),

    #[error("session not ready: authentication check in progress")]
    SessionNotReady,

    #[error("no authenticated session")]
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("document listing failed: {message}")]
    Listing { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {source}")]
    Toml {
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}
