//! # Actor Loop
//!
//! This module is the server side of an actor: the task that owns the state and
//! the receiving end of the mailbox, and processes messages one at a time.
//!
//! **Concurrency model**: every actor runs its own loop in its own Tokio task.
//! A message is handled to completion (body run, state directive applied, reply
//! delivered) before the next one is popped. The state is never shared, so it
//! needs no lock.
//!
//! ## Handling one message
//!
//! 1. Look up `(operation, arity, mode)` in the type's dispatch table.
//! 2. Run the body with the arguments and a shared reference to the state.
//! 3. Apply the state directive: `Unchanged` keeps the state bound at entry,
//!    `Replace(s)` stores `s`.
//! 4. For a Call, deliver the reply to the correlated waiter.
//!
//! ## Failure handling
//!
//! | Situation | Call | Cast |
//! |-----------|------|------|
//! | No dispatch entry | caller gets `UnhandledMessage`, actor terminates | dropped |
//! | Argument of the wrong type | caller gets `ArgumentMismatch` | dropped |
//! | Body returns `NoReply` | caller gets `InvalidOutcomeShape`, state kept | directive applied |
//! | Body panics | actor terminates, callers get `ActorUnavailable` | same |

use crate::error::ActorError;
use crate::handle::{ActorId, Envelope, MailboxReceiver};
use crate::message::{Delivery, Message};
use crate::operation::{DispatchKey, DispatchTable};
use crate::outcome::Outcome;
use crate::system::RegistryLease;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Why an actor's loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Every handle was dropped.
    Normal,
    /// [`ActorHandle::stop`](crate::ActorHandle::stop) was processed.
    Stopped,
    /// A Call arrived that no operation matched.
    UnhandledMessage { operation: String, arity: usize },
    /// A handler body panicked.
    Panicked { operation: String },
    /// The task ended without reporting a reason (e.g. the runtime shut down).
    Aborted,
}

pub(crate) struct ActorLoop<S> {
    id: ActorId,
    label: Arc<str>,
    state: S,
    table: Arc<DispatchTable<S>>,
    receiver: MailboxReceiver,
    exit: watch::Sender<Option<ExitReason>>,
    lease: Option<RegistryLease>,
}

impl<S: Send + 'static> ActorLoop<S> {
    pub(crate) fn new(
        id: ActorId,
        label: Arc<str>,
        state: S,
        table: Arc<DispatchTable<S>>,
        receiver: MailboxReceiver,
        exit: watch::Sender<Option<ExitReason>>,
        lease: Option<RegistryLease>,
    ) -> Self {
        Self {
            id,
            label,
            state,
            table,
            receiver,
            exit,
            lease,
        }
    }

    /// Runs until the mailbox closes, a stop request arrives, or a failure
    /// escalates.
    pub(crate) async fn run(mut self) {
        info!(actor = %self.label, id = %self.id, "Actor started");

        let reason = loop {
            let Some(envelope) = self.receiver.recv().await else {
                break ExitReason::Normal;
            };
            match envelope {
                Envelope::Stop => break ExitReason::Stopped,
                Envelope::Message(message) => {
                    if let Some(reason) = self.dispatch(message) {
                        break reason;
                    }
                }
            }
        };

        let ActorLoop {
            id,
            label,
            receiver,
            exit,
            lease,
            ..
        } = self;

        // Queued calls fail with ActorUnavailable once their reply slots drop.
        drop(receiver);
        if let Some(lease) = lease {
            lease.release(id);
        }

        match &reason {
            ExitReason::Normal | ExitReason::Stopped => {
                info!(actor = %label, %id, ?reason, "Shutdown")
            }
            _ => error!(actor = %label, %id, ?reason, "Terminated"),
        }
        exit.send_replace(Some(reason));
    }

    /// Handles one message. Returns an exit reason when the actor must stop.
    fn dispatch(&mut self, message: Message) -> Option<ExitReason> {
        let (operation, args, delivery) = message.into_parts();
        let key = DispatchKey {
            operation,
            arity: args.len(),
            mode: delivery.mode(),
        };

        let table = Arc::clone(&self.table);
        let Some(entry) = table.get(&key) else {
            return self.unhandled(key, delivery);
        };

        debug!(
            actor = %self.label,
            operation = %key.operation,
            arity = key.arity,
            mode = %key.mode,
            state = entry.state_binding(),
            "Handling"
        );

        let body = entry.body();
        let state = &self.state;
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| body(args, state))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!(actor = %self.label, operation = %key.operation, error = %e, "Rejected");
                if let Delivery::Call(correlation) = delivery {
                    correlation.deliver(Err(e));
                }
                return None;
            }
            Err(_) => {
                error!(actor = %self.label, operation = %key.operation, "Handler panicked");
                return Some(ExitReason::Panicked {
                    operation: key.operation,
                });
            }
        };

        match (delivery, outcome) {
            (Delivery::Call(correlation), Outcome::Reply(value, directive)) => {
                directive.apply(&mut self.state);
                correlation.deliver(Ok(value));
            }
            (Delivery::Call(correlation), Outcome::NoReply(_)) => {
                warn!(actor = %self.label, operation = %key.operation, "Call handler returned no reply");
                correlation.deliver(Err(ActorError::InvalidOutcomeShape {
                    operation: key.operation,
                }));
            }
            (Delivery::Cast, Outcome::Reply(_, directive) | Outcome::NoReply(directive)) => {
                directive.apply(&mut self.state);
            }
        }
        None
    }

    fn unhandled(&self, key: DispatchKey, delivery: Delivery) -> Option<ExitReason> {
        match delivery {
            Delivery::Call(correlation) => {
                error!(
                    actor = %self.label,
                    operation = %key.operation,
                    arity = key.arity,
                    "Unhandled call"
                );
                correlation.deliver(Err(ActorError::UnhandledMessage {
                    operation: key.operation.clone(),
                    arity: key.arity,
                }));
                Some(ExitReason::UnhandledMessage {
                    operation: key.operation,
                    arity: key.arity,
                })
            }
            Delivery::Cast => {
                warn!(
                    actor = %self.label,
                    operation = %key.operation,
                    arity = key.arity,
                    "Unhandled cast dropped"
                );
                None
            }
        }
    }
}
