//! # Actor System
//!
//! [`ActorSystem`] starts actors and owns the name registry. It is cheap to
//! clone; clones share one registry.
//!
//! ## Registration
//!
//! An actor can be started:
//!
//! - **anonymously** (the default): reachable only through the returned handle,
//! - **under an explicit name** with [`StartOptions::name`],
//! - **under its type's default name** with [`StartOptions::register_default`],
//!   which is [`derive_name`](crate::derive_name) applied to the type's
//!   qualified name.
//!
//! A name held by a live actor cannot be taken again: `start` fails with
//! [`ActorError::StartError`]. A terminated actor releases its name.
//!
//! The registry keeps a handle to every registered actor, so a registered actor
//! runs until it is stopped (see [`ActorSystem::shutdown`]), even when every
//! other handle is dropped.

use crate::actor::{ActorLoop, ExitReason};
use crate::error::ActorError;
use crate::handle::{self, ActorHandle, ActorId, MailboxConfig};
use crate::operation::ActorType;
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info};

/// How a started actor is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Registration {
    #[default]
    Anonymous,
    /// The actor type's derived default name.
    DefaultName,
    Named(String),
}

/// Options accepted by [`ActorSystem::start`].
#[derive(Debug)]
pub struct StartOptions<S> {
    initial_state: Option<S>,
    registration: Registration,
    mailbox: MailboxConfig,
}

impl<S> Default for StartOptions<S> {
    fn default() -> Self {
        Self {
            initial_state: None,
            registration: Registration::Anonymous,
            mailbox: MailboxConfig::Unbounded,
        }
    }
}

impl<S> StartOptions<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state. Without it the type's configured default is used.
    pub fn state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Registers the actor under `name`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.registration = Registration::Named(name.into());
        self
    }

    /// Registers the actor under its type's derived default name.
    pub fn register_default(mut self) -> Self {
        self.registration = Registration::DefaultName;
        self
    }

    /// Caps the mailbox at `depth` queued messages.
    pub fn bounded(mut self, depth: usize) -> Self {
        self.mailbox = MailboxConfig::Bounded(depth);
        self
    }
}

/// Type-erased view of a registered handle.
#[async_trait]
pub(crate) trait ErasedHandle: Send + Sync {
    fn id(&self) -> ActorId;

    fn is_alive(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    async fn stop_and_wait(&self) -> ExitReason;
}

#[async_trait]
impl<S: 'static> ErasedHandle for ActorHandle<S> {
    fn id(&self) -> ActorId {
        ActorHandle::id(self)
    }

    fn is_alive(&self) -> bool {
        ActorHandle::is_alive(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn stop_and_wait(&self) -> ExitReason {
        // An actor that is already gone still reports its exit reason.
        let _ = self.stop().await;
        self.terminated().await
    }
}

#[derive(Clone, Default)]
struct Registry {
    entries: Arc<Mutex<HashMap<String, Arc<dyn ErasedHandle>>>>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn ErasedHandle>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self, name: &str, handle: Arc<dyn ErasedHandle>) -> Result<(), ActorError> {
        let mut entries = self.lock();
        if entries.get(name).is_some_and(|existing| existing.is_alive()) {
            return Err(ActorError::StartError {
                name: name.to_owned(),
            });
        }
        entries.insert(name.to_owned(), handle);
        Ok(())
    }

    fn release(&self, name: &str, id: ActorId) {
        let mut entries = self.lock();
        if entries.get(name).is_some_and(|entry| entry.id() == id) {
            entries.remove(name);
            debug!(name, %id, "Unregistered");
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn ErasedHandle>> {
        self.lock().values().cloned().collect()
    }
}

/// A registered name, released by the actor loop when it exits.
pub(crate) struct RegistryLease {
    registry: Registry,
    name: String,
}

impl RegistryLease {
    pub(crate) fn release(self, id: ActorId) {
        self.registry.release(&self.name, id);
    }
}

/// Starts actors and resolves registered names.
#[derive(Clone, Default)]
pub struct ActorSystem {
    registry: Registry,
}

impl ActorSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an actor of type `kind` on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`ActorError::StartError`] if the requested name is held by a live actor.
    /// - [`ActorError::MissingInitialState`] if no state was supplied and the type
    ///   has no default.
    pub fn start<S: Send + 'static>(
        &self,
        kind: &ActorType<S>,
        options: StartOptions<S>,
    ) -> Result<ActorHandle<S>, ActorError> {
        let StartOptions {
            initial_state,
            registration,
            mailbox,
        } = options;

        let state = initial_state
            .or_else(|| kind.default_state())
            .ok_or_else(|| ActorError::MissingInitialState {
                actor_type: kind.name().to_owned(),
            })?;

        let name = match registration {
            Registration::Anonymous => None,
            Registration::DefaultName => Some(kind.default_registration_name()),
            Registration::Named(name) => Some(name),
        };

        let id = ActorId::next();
        let label: Arc<str> = Arc::from(name.as_deref().unwrap_or(kind.name()));
        let (sender, receiver) = handle::mailbox(mailbox);
        let (exit_sender, exit_receiver) = watch::channel(None);
        let handle = ActorHandle::new(id, Arc::clone(&label), sender, exit_receiver);

        let lease = match name {
            Some(name) => {
                self.registry.claim(&name, Arc::new(handle.clone()))?;
                Some(RegistryLease {
                    registry: self.registry.clone(),
                    name,
                })
            }
            None => None,
        };

        info!(actor = %label, %id, actor_type = kind.name(), ?mailbox, "Starting");
        let actor = ActorLoop::new(id, label, state, kind.table(), receiver, exit_sender, lease);
        tokio::spawn(actor.run());
        Ok(handle)
    }

    /// Looks up a live actor registered under `name`.
    ///
    /// Returns `None` if nothing live is registered there, or if the actor there
    /// has a different state type.
    pub fn whereis<S: 'static>(&self, name: &str) -> Option<ActorHandle<S>> {
        let entries = self.registry.lock();
        entries
            .get(name)
            .filter(|entry| entry.is_alive())
            .and_then(|entry| entry.as_any().downcast_ref::<ActorHandle<S>>())
            .cloned()
    }

    /// Names currently held by live actors, sorted.
    pub fn registered(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .lock()
            .iter()
            .filter(|(_, entry)| entry.is_alive())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Stops every registered actor and waits for each to terminate.
    pub async fn shutdown(&self) {
        let handles = self.registry.snapshot();
        info!(actors = handles.len(), "Shutting down registered actors");
        for handle in handles {
            let reason = handle.stop_and_wait().await;
            debug!(id = %handle.id(), ?reason, "Stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{ActorDefinition, OperationDescriptor};
    use crate::outcome::reply;

    fn echo() -> ActorType<String> {
        let mut definition = ActorDefinition::<String>::new("Echo.Server");
        definition
            .register_call::<(), String>(OperationDescriptor::new(
                "echo",
                &[],
                |(): (), state: &String| reply(state.clone()),
            ))
            .unwrap();
        definition.default_state("hello".to_string()).finish()
    }

    #[tokio::test]
    async fn named_start_registers_and_conflicts() {
        let system = ActorSystem::new();
        let kind = echo();
        let first = system
            .start(&kind, StartOptions::new().name("echo"))
            .unwrap();

        let err = system
            .start(&kind, StartOptions::new().name("echo"))
            .unwrap_err();
        assert!(matches!(err, ActorError::StartError { ref name } if name == "echo"));

        let found = system.whereis::<String>("echo").unwrap();
        assert_eq!(found.id(), first.id());
        assert!(system.whereis::<u64>("echo").is_none());
    }

    #[tokio::test]
    async fn default_registration_uses_derived_name() {
        let system = ActorSystem::new();
        system
            .start(&echo(), StartOptions::new().register_default())
            .unwrap();
        assert_eq!(system.registered(), vec!["echo_server".to_string()]);
    }

    #[tokio::test]
    async fn name_is_released_after_stop() {
        let system = ActorSystem::new();
        let kind = echo();
        let handle = system
            .start(&kind, StartOptions::new().name("echo"))
            .unwrap();
        handle.stop().await.unwrap();
        assert_eq!(handle.terminated().await, ExitReason::Stopped);

        assert!(system.whereis::<String>("echo").is_none());
        system
            .start(&kind, StartOptions::new().name("echo"))
            .unwrap();
    }

    #[tokio::test]
    async fn exited_actor_is_hidden_before_its_name_is_released() {
        let system = ActorSystem::new();
        let (sender, receiver) = handle::mailbox(MailboxConfig::Unbounded);
        let (_exit_sender, exit_receiver) = watch::channel(None);
        let exited =
            ActorHandle::<String>::new(ActorId::next(), Arc::from("gone"), sender, exit_receiver);
        system
            .registry
            .claim("gone", Arc::new(exited.clone()))
            .unwrap();
        system
            .start(&echo(), StartOptions::new().name("echo"))
            .unwrap();
        assert_eq!(system.registered(), vec!["echo".to_string(), "gone".to_string()]);

        // Mailbox closed, lease not yet released.
        drop(receiver);
        assert!(!exited.is_alive());
        assert!(system.whereis::<String>("gone").is_none());
        assert_eq!(system.registered(), vec!["echo".to_string()]);
    }

    #[tokio::test]
    async fn missing_state_is_reported() {
        let kind = ActorDefinition::<u8>::new("Stateless").finish();
        let err = ActorSystem::new()
            .start(&kind, StartOptions::new())
            .unwrap_err();
        assert!(matches!(err, ActorError::MissingInitialState { .. }));
    }

    #[tokio::test]
    async fn shutdown_stops_registered_actors() {
        let system = ActorSystem::new();
        let handle = system
            .start(&echo(), StartOptions::new().name("a"))
            .unwrap();
        system.shutdown().await;
        assert_eq!(handle.exit_reason(), Some(ExitReason::Stopped));
        assert!(!handle.is_alive());
        assert!(system.registered().is_empty());
    }
}
