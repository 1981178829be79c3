//! Error types for the key/value server.

use thiserror::Error;

/// Errors returned by [`KvClient`](crate::clients::KvClient).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum KvError {
    /// The requested key is not present.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Keys must be non-empty.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<gen_actor::ActorError> for KvError {
    fn from(e: gen_actor::ActorError) -> Self {
        KvError::ActorCommunicationError(e.to_string())
    }
}
