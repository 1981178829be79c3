//! # Actor Errors
//!
//! A single error enum covers the whole crate. The variants fall into two groups:
//!
//! - **Definition errors** are reported while an actor type is being defined,
//!   before any actor starts: [`DuplicateOperation`](ActorError::DuplicateOperation),
//!   [`ArityMismatch`](ActorError::ArityMismatch).
//! - **Runtime errors** are returned to the immediate caller of `start`, `send`,
//!   `call` or `cast`.
//!
//! [`UnhandledMessage`](ActorError::UnhandledMessage) is both: the caller gets it
//! as the reply, and the actor terminates because nothing could answer the call.

/// Errors that can occur within the actor runtime and binder.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Duplicate operation: {name}/{arity}")]
    DuplicateOperation { name: String, arity: usize },

    #[error("Operation {name} declares {declared} parameters but its handler takes {expected}")]
    ArityMismatch {
        name: String,
        declared: usize,
        expected: usize,
    },

    #[error("Cannot start actor: name {name:?} is already registered")]
    StartError { name: String },

    #[error("No initial state for actor type {actor_type}")]
    MissingInitialState { actor_type: String },

    #[error("Actor unavailable")]
    ActorUnavailable,

    #[error("Mailbox full")]
    MailboxFull,

    #[error("Unhandled message: {operation}/{arity}")]
    UnhandledMessage { operation: String, arity: usize },

    #[error("Call handler for {operation} returned no reply")]
    InvalidOutcomeShape { operation: String },

    #[error("Argument {index} of {operation} has an unexpected type")]
    ArgumentMismatch { operation: String, index: usize },

    #[error("Reply to {operation} has an unexpected type")]
    ReplyTypeMismatch { operation: String },

    #[error("Call to {operation} timed out")]
    Timeout { operation: String },
}
