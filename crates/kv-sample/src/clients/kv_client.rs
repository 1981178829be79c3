//! # KV Client
//!
//! Provides a high-level API for interacting with the key/value server.
//! It wraps an `ActorHandle<Store>` plus the server's stubs and exposes
//! domain-specific methods.

use crate::kv_server::{KvError, KvOperations};
use crate::model::Store;
use async_trait::async_trait;
use gen_actor::{ActorClient, ActorError, ActorHandle};
use tracing::{debug, instrument};

/// Client for interacting with the key/value server.
#[derive(Debug, Clone)]
pub struct KvClient {
    handle: ActorHandle<Store>,
    operations: KvOperations,
}

impl KvClient {
    pub fn new(handle: ActorHandle<Store>, operations: KvOperations) -> Self {
        Self { handle, operations }
    }
}

#[async_trait]
impl ActorClient<Store> for KvClient {
    type Error = KvError;

    fn handle(&self) -> &ActorHandle<Store> {
        &self.handle
    }

    fn map_error(e: ActorError) -> Self::Error {
        KvError::from(e)
    }
}

fn check_key(key: &str) -> Result<(), KvError> {
    if key.is_empty() {
        return Err(KvError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

impl KvClient {
    /// Sets `key` and returns the value it replaced.
    #[instrument(skip(self))]
    pub async fn put(&self, key: &str, value: i64) -> Result<Option<i64>, KvError> {
        check_key(key)?;
        debug!("Sending request");
        self.operations
            .put
            .call(&self.handle, (key.to_owned(), value))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<i64>, KvError> {
        debug!("Sending request");
        self.operations
            .get
            .call(&self.handle, (key.to_owned(),))
            .await
            .map_err(Self::map_error)
    }

    /// Like [`get`](Self::get), failing with [`KvError::NotFound`] for a
    /// missing key.
    #[instrument(skip(self))]
    pub async fn require(&self, key: &str) -> Result<i64, KvError> {
        self.get(key)
            .await?
            .ok_or_else(|| KvError::NotFound(key.to_owned()))
    }

    #[instrument(skip(self))]
    pub async fn len(&self) -> Result<usize, KvError> {
        debug!("Sending request");
        self.operations
            .len
            .call(&self.handle, ())
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Store, KvError> {
        debug!("Sending request");
        self.operations
            .snapshot
            .call(&self.handle, ())
            .await
            .map_err(Self::map_error)
    }

    /// Removes `key`. Returns once the request is queued.
    #[instrument(skip(self))]
    pub fn delete(&self, key: &str) -> Result<(), KvError> {
        debug!("Sending notification");
        self.operations
            .delete
            .cast(&self.handle, (key.to_owned(),))
            .map_err(Self::map_error)
    }

    /// Removes every key. Returns once the request is queued.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), KvError> {
        debug!("Sending notification");
        self.operations
            .clear
            .cast(&self.handle, ())
            .map_err(Self::map_error)
    }
}
