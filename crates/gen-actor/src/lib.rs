//! # Gen Actor
//!
//! A single-process actor runtime in the style of a generic server. Each actor
//! owns one private state value and processes a mailbox of messages strictly
//! one at a time. Callers talk to it in two ways:
//!
//! - **Call**: send a request and wait for the correlated reply.
//! - **Cast**: enqueue a notification and return immediately.
//!
//! Behavior is declared with [`OperationDescriptor`]s that are registered on an
//! [`ActorDefinition`]. Every body returns an [`Outcome`] built with one of four
//! builders:
//!
//! | Builder | Reply | New state |
//! |---------|-------|-----------|
//! | [`reply(v)`](reply) | `v` | unchanged |
//! | [`reply_with(v, s)`](reply_with) | `v` | `s` |
//! | [`no_reply()`](no_reply) | none | unchanged |
//! | [`no_reply_with(s)`](no_reply_with) | none | `s` |
//!
//! "Unchanged" is a marker distinct from every state value, so an actor whose
//! state is `None`, `0` or an empty map can still have it replaced explicitly.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//! - [gen_server behaviour](https://www.erlang.org/doc/apps/stdlib/gen_server.html) - The call/cast protocol this runtime follows
//!
//! ## Example
//!
//! ```rust
//! use gen_actor::{
//!     no_reply_with, reply, ActorDefinition, ActorSystem, OperationDescriptor, StartOptions,
//! };
//! use std::collections::HashMap;
//!
//! type Store = HashMap<String, i64>;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gen_actor::ActorError> {
//!     let mut kv = ActorDefinition::<Store>::new("Kv.Server");
//!     let put = kv.register_cast::<(String, i64)>(
//!         OperationDescriptor::new("put", &["key", "value"], |(key, value): (String, i64), store: &Store| {
//!             let mut store = store.clone();
//!             store.insert(key, value);
//!             no_reply_with(store)
//!         })
//!         .bind_state("store"),
//!     )?;
//!     let get = kv.register_call::<(String,), Option<i64>>(OperationDescriptor::new(
//!         "get",
//!         &["key"],
//!         |(key,): (String,), store: &Store| reply(store.get(&key).copied()),
//!     ))?;
//!     let kv = kv.default_state(Store::new()).finish();
//!
//!     let system = ActorSystem::new();
//!     let server = system.start(&kv, StartOptions::new().register_default())?;
//!     put.cast(&server, ("a".to_string(), 1))?;
//!     assert_eq!(get.call(&server, ("a".to_string(),)).await?, Some(1));
//!     assert_eq!(get.call(&server, ("b".to_string(),)).await?, None);
//!     assert_eq!(system.registered(), vec!["kv_server".to_string()]);
//!
//!     system.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** in arrival order (no locks needed)
//! - Messages from one sender arrive in the order they were sent
//! - Multiple actors run in **parallel**
//!
//! ## Failures
//!
//! Failures surface as [`ActorError`]s to the caller that caused them. A Call
//! that matches no operation, or a handler that panics, terminates the actor;
//! the reason is available through [`ActorHandle::terminated`]. See the
//! [`actor`] module for the full table.
//!
//! ## Testing
//!
//! [`mock::MockActor`] hands out a real [`ActorHandle`] whose messages are
//! answered from a script. It lets you test typed clients without defining or
//! starting the actor they talk to.

pub mod actor;
pub mod args;
pub mod client;
pub mod error;
pub mod handle;
pub mod message;
pub mod mock;
pub mod naming;
pub mod operation;
pub mod outcome;
pub mod system;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ExitReason;
pub use args::{Args, FromArgs, IntoArgs, Payload};
pub use client::ActorClient;
pub use error::ActorError;
pub use handle::{ActorHandle, ActorId, MailboxConfig};
pub use message::{Message, Mode, PendingReply};
pub use naming::{derive_name, derive_name_from_path};
pub use operation::{
    define_actor_type, ActorDefinition, ActorType, ActorTypeConfig, CallStub, CastStub, Operation,
    OperationDescriptor, HIDDEN_STATE_BINDING,
};
pub use outcome::{no_reply, no_reply_with, reply, reply_with, Outcome, StateDirective, Unchanged};
pub use system::{ActorSystem, Registration, StartOptions};
