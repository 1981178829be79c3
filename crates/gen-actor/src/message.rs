//! # Messages
//!
//! A [`Message`] is what travels through a mailbox: an operation tag, an ordered
//! argument list, and a delivery mode. Call messages also carry a correlation
//! token and the one-shot slot their single reply goes into.
//!
//! The mode and the correlation are one field internally, so a Call without a
//! reply slot (or a Cast with one) cannot be built.

use crate::args::{Args, Payload};
use crate::error::ActorError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tracing::debug;

/// One-shot channel end a reply is delivered through.
pub type Response = oneshot::Sender<Result<Payload, ActorError>>;

static NEXT_CORRELATION: AtomicU64 = AtomicU64::new(1);

/// Delivery mode of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Call,
    Cast,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Call => f.write_str("call"),
            Mode::Cast => f.write_str("cast"),
        }
    }
}

/// Pairs a Call message with its waiter.
pub(crate) struct Correlation {
    pub(crate) token: u64,
    respond_to: Response,
}

impl Correlation {
    /// Delivers the single reply. A waiter that stopped listening (cancelled
    /// call) is not an error; the reply is dropped.
    pub(crate) fn deliver(self, result: Result<Payload, ActorError>) {
        if self.respond_to.send(result).is_err() {
            debug!(correlation = self.token, "Caller gone, reply discarded");
        }
    }
}

pub(crate) enum Delivery {
    Call(Correlation),
    Cast,
}

impl Delivery {
    pub(crate) fn mode(&self) -> Mode {
        match self {
            Delivery::Call(_) => Mode::Call,
            Delivery::Cast => Mode::Cast,
        }
    }
}

/// A tagged request for one operation on one actor.
pub struct Message {
    operation: String,
    args: Args,
    delivery: Delivery,
}

impl Message {
    /// Builds a Cast message.
    pub fn cast(operation: impl Into<String>, args: Args) -> Self {
        Self {
            operation: operation.into(),
            args,
            delivery: Delivery::Cast,
        }
    }

    /// Builds a Call message with a fresh correlation token, plus the
    /// [`PendingReply`] that resolves once the actor answers.
    pub fn call(operation: impl Into<String>, args: Args) -> (Self, PendingReply) {
        let operation = operation.into();
        let token = NEXT_CORRELATION.fetch_add(1, Ordering::Relaxed);
        let (respond_to, response) = oneshot::channel();
        let pending = PendingReply {
            token,
            operation: operation.clone(),
            response,
        };
        let message = Self {
            operation,
            args,
            delivery: Delivery::Call(Correlation { token, respond_to }),
        };
        (message, pending)
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn mode(&self) -> Mode {
        self.delivery.mode()
    }

    /// Present iff this is a Call.
    pub fn correlation(&self) -> Option<u64> {
        match &self.delivery {
            Delivery::Call(correlation) => Some(correlation.token),
            Delivery::Cast => None,
        }
    }

    pub(crate) fn into_parts(self) -> (String, Args, Delivery) {
        (self.operation, self.args, self.delivery)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("operation", &self.operation)
            .field("arity", &self.args.len())
            .field("mode", &self.mode())
            .field("correlation", &self.correlation())
            .finish()
    }
}

/// Waiter side of a Call.
///
/// Dropping it cancels the wait; the actor still handles the message and its
/// reply is discarded.
#[derive(Debug)]
pub struct PendingReply {
    token: u64,
    operation: String,
    response: oneshot::Receiver<Result<Payload, ActorError>>,
}

impl PendingReply {
    pub fn correlation(&self) -> u64 {
        self.token
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Waits, without a timeout, for the correlated reply.
    ///
    /// Fails with [`ActorError::ActorUnavailable`] if the actor terminates (or the
    /// message is dropped) before replying.
    pub async fn wait(self) -> Result<Payload, ActorError> {
        self.response
            .await
            .map_err(|_| ActorError::ActorUnavailable)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_messages_get_unique_tokens() {
        let (first, first_pending) = Message::call("get", Args::new());
        let (second, _) = Message::call("get", Args::new());
        assert_eq!(first.mode(), Mode::Call);
        assert_eq!(first.correlation(), Some(first_pending.correlation()));
        assert_ne!(first.correlation(), second.correlation());
    }

    #[test]
    fn cast_messages_have_no_correlation() {
        let message = Message::cast("put", crate::args!["a".to_string(), 1i64]);
        assert_eq!(message.mode(), Mode::Cast);
        assert_eq!(message.arity(), 2);
        assert_eq!(message.correlation(), None);
    }

    #[tokio::test]
    async fn dropped_message_fails_the_waiter() {
        let (message, pending) = Message::call("get", Args::new());
        drop(message);
        assert!(matches!(pending.wait().await, Err(ActorError::ActorUnavailable)));
    }

    #[tokio::test]
    async fn reply_reaches_the_waiter() {
        let (message, pending) = Message::call("get", Args::new());
        let (_, _, delivery) = message.into_parts();
        let Delivery::Call(correlation) = delivery else {
            panic!("expected a call");
        };
        correlation.deliver(Ok(Box::new(42i64)));
        let value = pending.wait().await.unwrap();
        assert_eq!(*value.downcast::<i64>().unwrap(), 42);
    }
}
