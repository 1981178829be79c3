//! # Key/Value Server
//!
//! An actor that owns a [`Store`] and serves reads and writes to it.
//!
//! ## Operations
//!
//! | Operation | Mode | Reply | State |
//! |-----------|------|-------|-------|
//! | `put/2` (key, value) | call | previous value | key set |
//! | `get/1` (key) | call | `Option<i64>` | unchanged |
//! | `len/0` | call | `usize` | unchanged |
//! | `snapshot/0` | call | the whole [`Store`] | unchanged |
//! | `delete/1` (key) | cast | | key removed |
//! | `clear/0` | cast | | empty |
//!
//! ## Usage
//!
//! ```rust
//! use gen_actor::{ActorSystem, StartOptions};
//! use kv_sample::clients::KvClient;
//! use kv_sample::kv_server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (kind, operations) = kv_server::define()?;
//!     let handle = ActorSystem::new().start(&kind, StartOptions::new())?;
//!     let client = KvClient::new(handle, operations);
//!
//!     client.put("a", 1).await?;
//!     assert_eq!(client.get("a").await?, Some(1));
//!     assert_eq!(client.get("b").await?, None);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::*;

use crate::model::Store;
use gen_actor::{
    no_reply, no_reply_with, reply, reply_with, ActorDefinition, ActorError, ActorType, CallStub,
    CastStub, OperationDescriptor,
};

/// Qualified name of the server type. Registers as `kv_server`.
pub const KV_SERVER: &str = "KvServer";

/// Caller-side stubs for every operation of the server.
#[derive(Debug, Clone)]
pub struct KvOperations {
    pub put: CallStub<Store, (String, i64), Option<i64>>,
    pub get: CallStub<Store, (String,), Option<i64>>,
    pub len: CallStub<Store, (), usize>,
    pub snapshot: CallStub<Store, (), Store>,
    pub delete: CastStub<Store, (String,)>,
    pub clear: CastStub<Store, ()>,
}

/// Defines the server type, starting from an empty store.
pub fn define() -> Result<(ActorType<Store>, KvOperations), ActorError> {
    let mut definition = ActorDefinition::<Store>::new(KV_SERVER);

    let put = definition.register_call(
        OperationDescriptor::new(
            "put",
            &["key", "value"],
            |(key, value): (String, i64), store: &Store| {
                let previous = store.get(&key);
                if previous == Some(value) {
                    reply(previous)
                } else {
                    reply_with(previous, store.with(key, value))
                }
            },
        )
        .bind_state("store"),
    )?;

    let get = definition.register_call(
        OperationDescriptor::new("get", &["key"], |(key,): (String,), store: &Store| {
            reply(store.get(&key))
        })
        .bind_state("store"),
    )?;

    let len = definition.register_call(OperationDescriptor::new(
        "len",
        &[],
        |(): (), store: &Store| reply(store.len()),
    ))?;

    let snapshot = definition.register_call(OperationDescriptor::new(
        "snapshot",
        &[],
        |(): (), store: &Store| reply(store.clone()),
    ))?;

    let delete = definition.register_cast(
        OperationDescriptor::new("delete", &["key"], |(key,): (String,), store: &Store| {
            if store.contains_key(&key) {
                no_reply_with(store.without(&key))
            } else {
                no_reply()
            }
        })
        .bind_state("store"),
    )?;

    let clear = definition.register_cast(OperationDescriptor::new(
        "clear",
        &[],
        |(): (), _: &Store| no_reply_with(Store::new()),
    ))?;

    let kind = definition.default_state_with(Store::new).finish();
    Ok((
        kind,
        KvOperations {
            put,
            get,
            len,
            snapshot,
            delete,
            clear,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gen_actor::Mode;

    #[test]
    fn server_exposes_its_operations() {
        let (kind, operations) = define().unwrap();
        assert_eq!(kind.default_registration_name(), "kv_server");
        assert!(kind.has_operation("put", 2, Mode::Call));
        assert!(kind.has_operation("get", 1, Mode::Call));
        assert!(kind.has_operation("delete", 1, Mode::Cast));
        assert!(!kind.has_operation("get", 1, Mode::Cast));
        assert_eq!(operations.clear.operation(), "clear");
    }
}
