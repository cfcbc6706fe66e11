use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid document id: {0:?}")]
    InvalidDocumentId(String),
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
    #[error("unknown UI flag: {0}")]
    UnknownFlag(String),
}

/// Failure reported by an authentication provider.
///
/// Never returned from an intent; the session resolves to anonymous and the
/// message is kept as a status value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authentication failed: {message}")]
pub struct AuthFailure {
    pub message: String,
}

impl AuthFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
