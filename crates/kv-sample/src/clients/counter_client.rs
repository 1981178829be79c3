//! # Counter Client
//!
//! Typed access to the [`counter`](crate::counter) actor. The counter is built
//! from a config, so the stubs here are made by operation name.

use crate::kv_server::KvError;
use async_trait::async_trait;
use gen_actor::{ActorClient, ActorError, ActorHandle, CallStub, CastStub};
use tracing::{debug, instrument};

/// Client for interacting with the counter actor.
#[derive(Debug, Clone)]
pub struct CounterClient {
    handle: ActorHandle<i64>,
    increment_by: CallStub<i64, (i64,), i64>,
    increment: CastStub<i64, ()>,
    value: CallStub<i64, (), i64>,
    reset: CastStub<i64, ()>,
}

impl CounterClient {
    pub fn new(handle: ActorHandle<i64>) -> Self {
        Self {
            handle,
            increment_by: CallStub::new("increment"),
            increment: CastStub::new("increment"),
            value: CallStub::new("value"),
            reset: CastStub::new("reset"),
        }
    }
}

#[async_trait]
impl ActorClient<i64> for CounterClient {
    type Error = KvError;

    fn handle(&self) -> &ActorHandle<i64> {
        &self.handle
    }

    fn map_error(e: ActorError) -> Self::Error {
        KvError::from(e)
    }
}

impl CounterClient {
    /// Adds `by` and returns the new count.
    #[instrument(skip(self))]
    pub async fn increment_by(&self, by: i64) -> Result<i64, KvError> {
        debug!("Sending request");
        self.increment_by
            .call(&self.handle, (by,))
            .await
            .map_err(Self::map_error)
    }

    /// Adds one without waiting.
    #[instrument(skip(self))]
    pub fn increment(&self) -> Result<(), KvError> {
        self.increment
            .cast(&self.handle, ())
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn value(&self) -> Result<i64, KvError> {
        debug!("Sending request");
        self.value
            .call(&self.handle, ())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<(), KvError> {
        self.reset.cast(&self.handle, ()).map_err(Self::map_error)
    }
}
