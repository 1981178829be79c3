//! # Operation Registry
//!
//! An actor type is a state type plus a table of operations. Each operation is
//! declared once with an [`OperationDescriptor`] and registered as either a Call
//! or a Cast. Registration does two things:
//!
//! 1. It adds a **dispatch entry** to the type's table, keyed by
//!    `(name, arity, mode)`. The actor loop looks messages up in this table.
//! 2. It returns a typed **stub** ([`CallStub`] or [`CastStub`]) that callers use
//!    to build and send the matching message.
//!
//! ```rust
//! use gen_actor::{reply, reply_with, ActorDefinition, ActorSystem, OperationDescriptor, StartOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gen_actor::ActorError> {
//!     let mut definition = ActorDefinition::<i64>::new("Counter");
//!     let add = definition.register_call::<(i64,), i64>(OperationDescriptor::new(
//!         "add",
//!         &["amount"],
//!         |(amount,): (i64,), total: &i64| reply_with(total + amount, total + amount),
//!     ))?;
//!     let value = definition.register_call::<(), i64>(OperationDescriptor::new(
//!         "value",
//!         &[],
//!         |(): (), total: &i64| reply(*total),
//!     ))?;
//!     let counter = definition.default_state(0).finish();
//!
//!     let system = ActorSystem::new();
//!     let handle = system.start(&counter, StartOptions::new())?;
//!     assert_eq!(add.call(&handle, (5,)).await?, 5);
//!     assert_eq!(value.call(&handle, ()).await?, 5);
//!     Ok(())
//! }
//! ```
//!
//! Names must be unique per arity within one type, across both modes. A second
//! `increment/1` fails with [`ActorError::DuplicateOperation`] at registration.

use crate::args::{Args, FromArgs, IntoArgs};
use crate::error::ActorError;
use crate::handle::ActorHandle;
use crate::message::Mode;
use crate::naming::derive_name_from_path;
use crate::outcome::Outcome;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Binding name used when a descriptor does not name its state.
pub const HIDDEN_STATE_BINDING: &str = "__state";

/// Type-erased handler body.
pub type Body<S> = Arc<dyn Fn(Args, &S) -> Result<Outcome<S>, ActorError> + Send + Sync>;

/// Declaration of one operation: its name, its parameters, the name the current
/// state is bound to, and the body that runs inside the actor.
pub struct OperationDescriptor<S> {
    name: String,
    parameters: Vec<String>,
    state_binding: String,
    arity: usize,
    body: Body<S>,
}

impl<S: 'static> OperationDescriptor<S> {
    /// Declares an operation whose body takes its arguments as the tuple `A`.
    ///
    /// `parameters` names the tuple positions; its length is checked against
    /// `A` when the descriptor is registered.
    pub fn new<A, F>(name: impl Into<String>, parameters: &[&str], handler: F) -> Self
    where
        A: FromArgs + 'static,
        F: Fn(A, &S) -> Outcome<S> + Send + Sync + 'static,
    {
        let name = name.into();
        let operation = name.clone();
        let body: Body<S> = Arc::new(move |args: Args, state: &S| {
            let args = A::from_args(args).map_err(|index| ActorError::ArgumentMismatch {
                operation: operation.clone(),
                index,
            })?;
            Ok(handler(args, state))
        });

        Self {
            name,
            parameters: parameters.iter().map(|p| (*p).to_owned()).collect(),
            state_binding: HIDDEN_STATE_BINDING.to_owned(),
            arity: A::ARITY,
            body,
        }
    }
}

impl<S> OperationDescriptor<S> {
    /// Names the binding the current state is passed under. Shows up in traces.
    pub fn bind_state(mut self, name: impl Into<String>) -> Self {
        self.state_binding = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn state_binding(&self) -> &str {
        &self.state_binding
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn body(&self) -> &Body<S> {
        &self.body
    }

    fn check_arity(&self) -> Result<(), ActorError> {
        if self.parameters.len() != self.arity {
            return Err(ActorError::ArityMismatch {
                name: self.name.clone(),
                declared: self.parameters.len(),
                expected: self.arity,
            });
        }
        Ok(())
    }
}

impl<S> Clone for OperationDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            state_binding: self.state_binding.clone(),
            arity: self.arity,
            body: Arc::clone(&self.body),
        }
    }
}

impl<S> fmt::Debug for OperationDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("state_binding", &self.state_binding)
            .finish()
    }
}

/// Lookup key of the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct DispatchKey {
    pub(crate) operation: String,
    pub(crate) arity: usize,
    pub(crate) mode: Mode,
}

/// Compiled operations of one actor type. Immutable once the type is finished.
pub(crate) struct DispatchTable<S> {
    entries: HashMap<DispatchKey, OperationDescriptor<S>>,
}

impl<S> DispatchTable<S> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &DispatchKey) -> Option<&OperationDescriptor<S>> {
        self.entries.get(key)
    }

    fn insert(&mut self, mode: Mode, descriptor: OperationDescriptor<S>) -> Result<(), ActorError> {
        descriptor.check_arity()?;

        let taken = [Mode::Call, Mode::Cast].into_iter().any(|mode| {
            self.entries.contains_key(&DispatchKey {
                operation: descriptor.name.clone(),
                arity: descriptor.arity,
                mode,
            })
        });
        if taken {
            return Err(ActorError::DuplicateOperation {
                name: descriptor.name.clone(),
                arity: descriptor.arity,
            });
        }

        debug!(
            operation = %descriptor.name,
            arity = descriptor.arity,
            %mode,
            state = %descriptor.state_binding,
            "Registered"
        );
        let key = DispatchKey {
            operation: descriptor.name.clone(),
            arity: descriptor.arity,
            mode,
        };
        self.entries.insert(key, descriptor);
        Ok(())
    }
}

type StateFactory<S> = Arc<dyn Fn() -> S + Send + Sync>;

/// Builder for an actor type. Register operations, then [`finish`](Self::finish).
pub struct ActorDefinition<S> {
    name: String,
    default_state: Option<StateFactory<S>>,
    table: DispatchTable<S>,
}

impl<S: Send + 'static> ActorDefinition<S> {
    /// Starts defining a type. `qualified_name` is used in traces and to derive
    /// the default registration name.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            name: qualified_name.into(),
            default_state: None,
            table: DispatchTable::new(),
        }
    }

    /// State used by `start` when no initial state is supplied.
    pub fn default_state(mut self, state: S) -> Self
    where
        S: Clone + Sync,
    {
        self.default_state = Some(Arc::new(move || state.clone()));
        self
    }

    /// Like [`default_state`](Self::default_state), computing the state per start.
    pub fn default_state_with(mut self, factory: impl Fn() -> S + Send + Sync + 'static) -> Self {
        self.default_state = Some(Arc::new(factory));
        self
    }

    /// Registers a Call operation and returns its stub.
    ///
    /// The body must answer with [`reply`](crate::reply) or
    /// [`reply_with`](crate::reply_with). A `NoReply` outcome is reported to the
    /// caller as [`ActorError::InvalidOutcomeShape`].
    pub fn register_call<A, R>(
        &mut self,
        descriptor: OperationDescriptor<S>,
    ) -> Result<CallStub<S, A, R>, ActorError>
    where
        A: IntoArgs,
        R: Any + Send,
    {
        check_stub_arity::<A, S>(&descriptor)?;
        let operation: Arc<str> = Arc::from(descriptor.name());
        self.table.insert(Mode::Call, descriptor)?;
        Ok(CallStub {
            operation,
            _marker: PhantomData,
        })
    }

    /// Registers a Cast operation and returns its stub.
    ///
    /// A `Reply` outcome from a cast body is accepted; the value is discarded.
    pub fn register_cast<A>(
        &mut self,
        descriptor: OperationDescriptor<S>,
    ) -> Result<CastStub<S, A>, ActorError>
    where
        A: IntoArgs,
    {
        check_stub_arity::<A, S>(&descriptor)?;
        let operation: Arc<str> = Arc::from(descriptor.name());
        self.table.insert(Mode::Cast, descriptor)?;
        Ok(CastStub {
            operation,
            _marker: PhantomData,
        })
    }

    /// Freezes the table.
    pub fn finish(self) -> ActorType<S> {
        ActorType {
            inner: Arc::new(ActorTypeInner {
                name: self.name,
                default_state: self.default_state,
                table: Arc::new(self.table),
            }),
        }
    }
}

fn check_stub_arity<A: IntoArgs, S>(descriptor: &OperationDescriptor<S>) -> Result<(), ActorError> {
    if A::ARITY != descriptor.arity() {
        return Err(ActorError::ArityMismatch {
            name: descriptor.name().to_owned(),
            declared: A::ARITY,
            expected: descriptor.arity(),
        });
    }
    Ok(())
}

/// One entry of [`ActorTypeConfig::operations`].
pub enum Operation<S> {
    Call(OperationDescriptor<S>),
    Cast(OperationDescriptor<S>),
}

/// Data-driven form of an actor type definition.
pub struct ActorTypeConfig<S> {
    pub name: String,
    pub initial_state: Option<S>,
    pub operations: Vec<Operation<S>>,
}

impl<S> ActorTypeConfig<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_state: None,
            operations: Vec::new(),
        }
    }

    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn call(mut self, descriptor: OperationDescriptor<S>) -> Self {
        self.operations.push(Operation::Call(descriptor));
        self
    }

    pub fn cast(mut self, descriptor: OperationDescriptor<S>) -> Self {
        self.operations.push(Operation::Cast(descriptor));
        self
    }
}

/// Builds an actor type from a config in one step.
///
/// Fails on the first conflicting or malformed operation. Callers reach these
/// operations through [`ActorHandle::call`] / [`ActorHandle::cast`] or through
/// stubs made with [`CallStub::new`] / [`CastStub::new`].
pub fn define_actor_type<S>(config: ActorTypeConfig<S>) -> Result<ActorType<S>, ActorError>
where
    S: Clone + Send + Sync + 'static,
{
    let mut definition = ActorDefinition::new(config.name);
    if let Some(state) = config.initial_state {
        definition = definition.default_state(state);
    }
    for operation in config.operations {
        match operation {
            Operation::Call(descriptor) => definition.table.insert(Mode::Call, descriptor)?,
            Operation::Cast(descriptor) => definition.table.insert(Mode::Cast, descriptor)?,
        }
    }
    Ok(definition.finish())
}

struct ActorTypeInner<S> {
    name: String,
    default_state: Option<StateFactory<S>>,
    table: Arc<DispatchTable<S>>,
}

/// A finished actor type: shared, immutable, cheap to clone.
pub struct ActorType<S> {
    inner: Arc<ActorTypeInner<S>>,
}

impl<S> Clone for ActorType<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> ActorType<S> {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Name an actor of this type registers under when started with
    /// [`StartOptions::register_default`](crate::StartOptions::register_default).
    pub fn default_registration_name(&self) -> String {
        derive_name_from_path(&self.inner.name)
    }

    pub fn has_operation(&self, name: &str, arity: usize, mode: Mode) -> bool {
        self.inner
            .table
            .get(&DispatchKey {
                operation: name.to_owned(),
                arity,
                mode,
            })
            .is_some()
    }

    pub(crate) fn default_state(&self) -> Option<S> {
        self.inner.default_state.as_ref().map(|factory| factory())
    }

    pub(crate) fn table(&self) -> Arc<DispatchTable<S>> {
        Arc::clone(&self.inner.table)
    }
}

impl<S> fmt::Debug for ActorType<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorType")
            .field("name", &self.inner.name)
            .field("operations", &self.inner.table.entries.len())
            .finish()
    }
}

/// Caller-side stub of a Call operation on actors with state `S`.
pub struct CallStub<S, A, R> {
    operation: Arc<str>,
    _marker: PhantomData<fn(&S, A) -> R>,
}

impl<S, A, R> CallStub<S, A, R>
where
    A: IntoArgs,
    R: Any + Send,
{
    /// A stub for an operation registered elsewhere, e.g. through
    /// [`define_actor_type`].
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Arc::from(operation.into()),
            _marker: PhantomData,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Sends the call and waits for the reply.
    pub async fn call(&self, handle: &ActorHandle<S>, args: A) -> Result<R, ActorError> {
        let reply = handle.call(self.operation.as_ref(), args.into_args()).await?;
        self.downcast(reply)
    }

    /// Like [`call`](Self::call), giving up after `timeout`.
    pub async fn call_timeout(
        &self,
        handle: &ActorHandle<S>,
        args: A,
        timeout: std::time::Duration,
    ) -> Result<R, ActorError> {
        let reply = handle
            .call_timeout(self.operation.as_ref(), args.into_args(), timeout)
            .await?;
        self.downcast(reply)
    }

    fn downcast(&self, reply: crate::args::Payload) -> Result<R, ActorError> {
        reply
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|_| ActorError::ReplyTypeMismatch {
                operation: self.operation.to_string(),
            })
    }
}

impl<S, A, R> Clone for CallStub<S, A, R> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            _marker: PhantomData,
        }
    }
}

impl<S, A, R> fmt::Debug for CallStub<S, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallStub").field(&self.operation).finish()
    }
}

/// Caller-side stub of a Cast operation on actors with state `S`.
pub struct CastStub<S, A> {
    operation: Arc<str>,
    _marker: PhantomData<fn(&S, A)>,
}

impl<S, A: IntoArgs> CastStub<S, A> {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Arc::from(operation.into()),
            _marker: PhantomData,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Enqueues the cast and returns without waiting for it to be handled.
    pub fn cast(&self, handle: &ActorHandle<S>, args: A) -> Result<(), ActorError> {
        handle.cast(self.operation.as_ref(), args.into_args())
    }
}

impl<S, A> Clone for CastStub<S, A> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            _marker: PhantomData,
        }
    }
}

impl<S, A> fmt::Debug for CastStub<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CastStub").field(&self.operation).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{no_reply, reply};

    fn increment() -> OperationDescriptor<i64> {
        OperationDescriptor::new("increment", &["by"], |(by,): (i64,), n: &i64| {
            reply(*n + by)
        })
    }

    #[test]
    fn duplicate_name_and_arity_is_rejected() {
        let mut definition = ActorDefinition::<i64>::new("Counter");
        definition
            .register_call::<(i64,), i64>(increment())
            .unwrap();
        let err = definition
            .register_call::<(i64,), i64>(increment())
            .unwrap_err();
        assert!(matches!(
            err,
            ActorError::DuplicateOperation { ref name, arity: 1 } if name == "increment"
        ));
    }

    #[test]
    fn call_and_cast_share_the_name_space() {
        let mut definition = ActorDefinition::<i64>::new("Counter");
        definition.register_cast::<(i64,)>(increment()).unwrap();
        let err = definition
            .register_call::<(i64,), i64>(increment())
            .unwrap_err();
        assert!(matches!(err, ActorError::DuplicateOperation { .. }));
    }

    #[test]
    fn same_name_different_arity_is_allowed() {
        let mut definition = ActorDefinition::<i64>::new("Counter");
        definition
            .register_call::<(i64,), i64>(increment())
            .unwrap();
        definition
            .register_call::<(), i64>(OperationDescriptor::new(
                "increment",
                &[],
                |(): (), n: &i64| reply(*n + 1),
            ))
            .unwrap();
        let counter = definition.finish();
        assert!(counter.has_operation("increment", 0, Mode::Call));
        assert!(counter.has_operation("increment", 1, Mode::Call));
        assert!(!counter.has_operation("increment", 1, Mode::Cast));
    }

    #[test]
    fn parameter_names_must_match_arity() {
        let mut definition = ActorDefinition::<i64>::new("Counter");
        let descriptor =
            OperationDescriptor::new("reset", &["to", "extra"], |(_to,): (i64,), _: &i64| {
                no_reply()
            });
        let err = definition.register_cast::<(i64,)>(descriptor).unwrap_err();
        assert!(matches!(
            err,
            ActorError::ArityMismatch {
                declared: 2,
                expected: 1,
                ..
            }
        ));
    }

    #[test]
    fn stub_arity_must_match_descriptor() {
        let mut definition = ActorDefinition::<i64>::new("Counter");
        let err = definition
            .register_call::<(i64, i64), i64>(increment())
            .unwrap_err();
        assert!(matches!(err, ActorError::ArityMismatch { .. }));
    }

    #[test]
    fn config_form_reports_duplicates() {
        let config = ActorTypeConfig::new("Counter")
            .initial_state(0i64)
            .call(increment())
            .call(increment());
        let err = define_actor_type(config).unwrap_err();
        assert!(matches!(err, ActorError::DuplicateOperation { .. }));
    }

    #[test]
    fn descriptor_defaults_to_hidden_state_binding() {
        let descriptor = increment();
        assert_eq!(descriptor.state_binding(), HIDDEN_STATE_BINDING);
        assert_eq!(descriptor.bind_state("count").state_binding(), "count");
    }

    #[test]
    fn default_registration_name_is_derived() {
        let kind = ActorDefinition::<i64>::new("Kv.Server").finish();
        assert_eq!(kind.default_registration_name(), "kv_server");
        assert_eq!(kind.default_state(), None);
    }
}
