//! # Mock Actors & Testing Guide
//!
//! [`MockActor<S>`] hands out a real [`ActorHandle<S>`], but no actor loop sits
//! behind it. Each message that arrives is matched against a queue of scripted
//! expectations instead. Use it for fast, deterministic tests of code that
//! *talks to* an actor (typed clients, orchestration) without defining or
//! starting the actor type.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockActor | Real Actor |
//! |---------|-----------|------------|
//! | **State** | None (scripted replies) | Real state transitions |
//! | **Error Injection** | Easy (`return_err`) | Needs a specific state |
//! | **Use Case** | Testing callers | Testing the actor type itself |
//!
//! ## Example
//!
//! ```rust
//! use gen_actor::mock::MockActor;
//! use gen_actor::{args, ActorError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockActor::<Vec<String>>::new();
//!     mock.expect_call("len").return_ok(3usize);
//!     mock.expect_cast("push");
//!     mock.expect_call("pop").return_err(ActorError::ActorUnavailable);
//!
//!     let handle = mock.handle();
//!     let len = handle.call("len", args![]).await.unwrap();
//!     assert_eq!(*len.downcast::<usize>().unwrap(), 3);
//!     handle.cast("push", args!["x".to_string()]).unwrap();
//!     assert!(handle.call("pop", args![]).await.is_err());
//!
//!     mock.verify().await;
//! }
//! ```
//!
//! Expectations are consumed in order. A message that does not match the next
//! expectation (wrong operation, wrong mode, or nothing left) panics the mock's
//! task, which makes the pending call fail with [`ActorError::ActorUnavailable`]
//! and the handle report [`ExitReason::Aborted`].

use crate::actor::ExitReason;
use crate::args::Payload;
use crate::error::ActorError;
use crate::handle::{self, ActorHandle, ActorId, Envelope, MailboxConfig};
use crate::message::Delivery;
use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// Upper bound [`MockActor::verify`] waits for outstanding expectations.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

enum Expectation {
    Call {
        operation: String,
        response: Result<Payload, ActorError>,
    },
    Cast {
        operation: String,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A scripted stand-in for an actor with state `S`.
pub struct MockActor<S> {
    handle: ActorHandle<S>,
    expectations: Expectations,
    progress: Arc<Notify>,
    _task: tokio::task::JoinHandle<()>,
}

impl<S: 'static> Default for MockActor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> MockActor<S> {
    /// Creates a mock with no expectations. Needs a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = handle::mailbox(MailboxConfig::Unbounded);
        let (exit_sender, exit_receiver) = watch::channel(None);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let script = expectations.clone();
        let progress = Arc::new(Notify::new());
        let handled = progress.clone();

        let task = tokio::spawn(async move {
            let reason = loop {
                let Some(envelope) = receiver.recv().await else {
                    break ExitReason::Normal;
                };
                let Envelope::Message(message) = envelope else {
                    break ExitReason::Stopped;
                };

                let expectation = script.lock().unwrap().pop_front();
                let (operation, _args, delivery) = message.into_parts();
                match (delivery, expectation) {
                    (
                        Delivery::Call(correlation),
                        Some(Expectation::Call {
                            operation: expected,
                            response,
                        }),
                    ) if expected == operation => correlation.deliver(response),
                    (Delivery::Cast, Some(Expectation::Cast { operation: expected }))
                        if expected == operation => {}
                    _ => panic!("Unexpected {operation} request or expectation mismatch"),
                }
                handled.notify_waiters();
            };
            drop(receiver);
            exit_sender.send_replace(Some(reason));
        });

        Self {
            handle: ActorHandle::new(ActorId::next(), Arc::from("mock"), sender, exit_receiver),
            expectations,
            progress,
            _task: task,
        }
    }

    /// Returns a handle for use in tests.
    pub fn handle(&self) -> ActorHandle<S> {
        self.handle.clone()
    }

    /// Expects a Call of `operation`.
    pub fn expect_call(&mut self, operation: impl Into<String>) -> CallExpectationBuilder {
        CallExpectationBuilder {
            operation: operation.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a Cast of `operation`.
    pub fn expect_cast(&mut self, operation: impl Into<String>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Cast {
                operation: operation.into(),
            });
    }

    /// Verifies that all expectations were met.
    ///
    /// Casts are asynchronous, so this waits for the mock to handle what is
    /// still queued. Panics if expectations remain after a few seconds.
    pub async fn verify(&self) {
        let drained = async {
            loop {
                // Registered before the check so a wakeup in between is not lost.
                let handled = self.progress.notified();
                if self.expectations.lock().unwrap().is_empty() {
                    return;
                }
                handled.await;
            }
        };
        if tokio::time::timeout(VERIFY_TIMEOUT, drained).await.is_err() {
            let remaining = self.expectations.lock().unwrap().len();
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder for Call expectations.
pub struct CallExpectationBuilder {
    operation: String,
    expectations: Expectations,
}

impl CallExpectationBuilder {
    /// Sets the expectation to reply with `value`.
    pub fn return_ok<V: Any + Send>(self, value: V) {
        self.push(Ok(Box::new(value)));
    }

    /// Sets the expectation to fail the call with `error`.
    pub fn return_err(self, error: ActorError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Payload, ActorError>) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Call {
                operation: self.operation,
                response,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[tokio::test]
    async fn scripted_replies_in_order() {
        let mut mock = MockActor::<()>::new();
        mock.expect_call("first").return_ok(1u8);
        mock.expect_call("second").return_ok("two");

        let handle = mock.handle();
        let first = handle.call("first", args![]).await.unwrap();
        let second = handle.call("second", args![1i32]).await.unwrap();
        assert_eq!(*first.downcast::<u8>().unwrap(), 1);
        assert_eq!(*second.downcast::<&str>().unwrap(), "two");
        mock.verify().await;
    }

    #[tokio::test]
    async fn injected_error_reaches_caller() {
        let mut mock = MockActor::<()>::new();
        mock.expect_call("get").return_err(ActorError::MailboxFull);

        let result = mock.handle().call("get", args![]).await;
        assert!(matches!(result, Err(ActorError::MailboxFull)));
    }

    #[tokio::test]
    async fn mismatch_fails_the_call() {
        let mut mock = MockActor::<()>::new();
        mock.expect_call("get").return_ok(0u8);

        let handle = mock.handle();
        let result = handle.call("put", args![]).await;
        assert!(matches!(result, Err(ActorError::ActorUnavailable)));
        assert_eq!(handle.terminated().await, ExitReason::Aborted);
    }

    #[tokio::test]
    async fn verify_waits_for_late_messages() {
        let mut mock = MockActor::<()>::new();
        mock.expect_cast("tick");

        let handle = mock.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            handle.cast("tick", args![]).unwrap();
        });
        mock.verify().await;
    }

    #[tokio::test]
    async fn stop_ends_the_mock() {
        let mock = MockActor::<()>::new();
        let handle = mock.handle();
        handle.stop().await.unwrap();
        assert_eq!(handle.terminated().await, ExitReason::Stopped);
        assert!(!handle.is_alive());
    }
}
