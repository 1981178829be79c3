//! # Actor Handles
//!
//! An [`ActorHandle`] is the caller side of one running actor. It holds the
//! sending end of the actor's mailbox and a watch on its exit reason. Handles are
//! cheap to clone and can be shared across tasks.
//!
//! Three delivery primitives:
//!
//! | Method | Suspends? | Result |
//! |--------|-----------|--------|
//! | [`send`](ActorHandle::send) | no | enqueued or error |
//! | [`cast`](ActorHandle::cast) | no | enqueued or error |
//! | [`call`](ActorHandle::call) | until the reply arrives | the reply value |
//!
//! `call` has no timeout. It fails with [`ActorError::ActorUnavailable`] instead
//! of hanging when the actor terminates before replying.

use crate::actor::ExitReason;
use crate::args::{Args, Payload};
use crate::error::ActorError;
use crate::message::Message;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one started actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Mailbox capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailboxConfig {
    #[default]
    Unbounded,
    /// At most this many queued messages. A depth of 0 is treated as 1.
    Bounded(usize),
}

/// What travels through a mailbox.
pub(crate) enum Envelope {
    Message(Message),
    Stop,
}

#[derive(Clone)]
pub(crate) enum MailboxSender {
    Bounded(mpsc::Sender<Envelope>),
    Unbounded(mpsc::UnboundedSender<Envelope>),
}

pub(crate) enum MailboxReceiver {
    Bounded(mpsc::Receiver<Envelope>),
    Unbounded(mpsc::UnboundedReceiver<Envelope>),
}

pub(crate) fn mailbox(config: MailboxConfig) -> (MailboxSender, MailboxReceiver) {
    match config {
        MailboxConfig::Unbounded => {
            let (sender, receiver) = mpsc::unbounded_channel();
            (
                MailboxSender::Unbounded(sender),
                MailboxReceiver::Unbounded(receiver),
            )
        }
        MailboxConfig::Bounded(depth) => {
            let (sender, receiver) = mpsc::channel(depth.max(1));
            (
                MailboxSender::Bounded(sender),
                MailboxReceiver::Bounded(receiver),
            )
        }
    }
}

impl MailboxSender {
    /// Enqueues without waiting.
    fn try_enqueue(&self, envelope: Envelope) -> Result<(), ActorError> {
        match self {
            MailboxSender::Bounded(sender) => sender.try_send(envelope).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => ActorError::MailboxFull,
                mpsc::error::TrySendError::Closed(_) => ActorError::ActorUnavailable,
            }),
            MailboxSender::Unbounded(sender) => sender
                .send(envelope)
                .map_err(|_| ActorError::ActorUnavailable),
        }
    }

    /// Enqueues, waiting for capacity on a bounded mailbox.
    async fn enqueue(&self, envelope: Envelope) -> Result<(), ActorError> {
        match self {
            MailboxSender::Bounded(sender) => sender
                .send(envelope)
                .await
                .map_err(|_| ActorError::ActorUnavailable),
            MailboxSender::Unbounded(sender) => sender
                .send(envelope)
                .map_err(|_| ActorError::ActorUnavailable),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            MailboxSender::Bounded(sender) => sender.is_closed(),
            MailboxSender::Unbounded(sender) => sender.is_closed(),
        }
    }
}

impl MailboxReceiver {
    pub(crate) async fn recv(&mut self) -> Option<Envelope> {
        match self {
            MailboxReceiver::Bounded(receiver) => receiver.recv().await,
            MailboxReceiver::Unbounded(receiver) => receiver.recv().await,
        }
    }
}

/// Caller-side reference to a running actor whose state has type `S`.
pub struct ActorHandle<S> {
    id: ActorId,
    label: Arc<str>,
    mailbox: MailboxSender,
    exit: watch::Receiver<Option<ExitReason>>,
    _state: PhantomData<fn() -> S>,
}

impl<S> Clone for ActorHandle<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: Arc::clone(&self.label),
            mailbox: self.mailbox.clone(),
            exit: self.exit.clone(),
            _state: PhantomData,
        }
    }
}

impl<S> fmt::Debug for ActorHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorHandle")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<S> ActorHandle<S> {
    pub(crate) fn new(
        id: ActorId,
        label: Arc<str>,
        mailbox: MailboxSender,
        exit: watch::Receiver<Option<ExitReason>>,
    ) -> Self {
        Self {
            id,
            label,
            mailbox,
            exit,
            _state: PhantomData,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Registered name, or the actor type name for anonymous actors.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// False once the actor's loop has exited.
    pub fn is_alive(&self) -> bool {
        !self.mailbox.is_closed()
    }

    /// Exit reason, if the actor has terminated.
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit.borrow().clone()
    }

    /// Enqueues `message` at the tail of the mailbox without waiting.
    ///
    /// If this fails for a Call message, its [`PendingReply`](crate::PendingReply)
    /// resolves to [`ActorError::ActorUnavailable`].
    pub fn send(&self, message: Message) -> Result<(), ActorError> {
        self.mailbox.try_enqueue(Envelope::Message(message))
    }

    /// Sends a Call and waits, without a timeout, for the correlated reply.
    ///
    /// Dropping the returned future cancels the wait; the reply, when it comes,
    /// is discarded.
    pub async fn call(
        &self,
        operation: impl Into<String>,
        args: Args,
    ) -> Result<Payload, ActorError> {
        let (message, pending) = Message::call(operation, args);
        debug!(
            actor = %self.label,
            id = %self.id,
            operation = pending.operation(),
            correlation = pending.correlation(),
            "Call"
        );
        self.mailbox.enqueue(Envelope::Message(message)).await?;
        pending.wait().await
    }

    /// Like [`call`](Self::call), failing with [`ActorError::Timeout`] after
    /// `timeout`.
    pub async fn call_timeout(
        &self,
        operation: impl Into<String>,
        args: Args,
        timeout: Duration,
    ) -> Result<Payload, ActorError> {
        let operation = operation.into();
        match tokio::time::timeout(timeout, self.call(operation.clone(), args)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(actor = %self.label, id = %self.id, %operation, ?timeout, "Call timed out");
                Err(ActorError::Timeout { operation })
            }
        }
    }

    /// Enqueues a Cast and returns immediately.
    pub fn cast(&self, operation: impl Into<String>, args: Args) -> Result<(), ActorError> {
        let message = Message::cast(operation, args);
        debug!(actor = %self.label, id = %self.id, operation = message.operation(), "Cast");
        self.send(message)
    }

    /// Asks the actor to stop after the messages already queued.
    pub async fn stop(&self) -> Result<(), ActorError> {
        self.mailbox.enqueue(Envelope::Stop).await
    }

    /// Resolves with the exit reason once the actor has terminated.
    pub async fn terminated(&self) -> ExitReason {
        let mut exit = self.exit.clone();
        let reason = match exit.wait_for(Option::is_some).await {
            Ok(reason) => reason.clone(),
            // Sender dropped without a reason: the task never finished its loop.
            Err(_) => self.exit.borrow().clone(),
        };
        reason.unwrap_or(ExitReason::Aborted)
    }
}
