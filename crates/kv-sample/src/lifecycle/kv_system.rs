use crate::clients::{CounterClient, KvClient};
use crate::kv_server::{self, KvError};
use crate::{counter, model::Store};
use gen_actor::{ActorHandle, ActorSystem, StartOptions};
use tracing::info;

/// Name the counter is registered under.
pub const COUNTER_NAME: &str = "counter";

/// The running sample: a key/value server and a counter.
///
/// - The server is registered under its derived default name, `kv_server`.
/// - The counter is registered as [`COUNTER_NAME`].
pub struct KvSystem {
    /// Client for the key/value server.
    pub kv_client: KvClient,

    /// Client for the counter.
    pub counter_client: CounterClient,

    system: ActorSystem,
}

impl KvSystem {
    /// Defines and starts both actors on the current Tokio runtime.
    pub fn new() -> Result<Self, KvError> {
        Self::with_system(ActorSystem::new())
    }

    /// Like [`new`](Self::new), on an existing actor system.
    pub fn with_system(system: ActorSystem) -> Result<Self, KvError> {
        let (kv_kind, operations) = kv_server::define()?;
        let kv_handle: ActorHandle<Store> =
            system.start(&kv_kind, StartOptions::new().register_default())?;

        let counter_kind = counter::define()?;
        let counter_handle = system.start(&counter_kind, StartOptions::new().name(COUNTER_NAME))?;

        info!(registered = ?system.registered(), "System started");
        Ok(Self {
            kv_client: KvClient::new(kv_handle, operations),
            counter_client: CounterClient::new(counter_handle),
            system,
        })
    }

    /// The actor system the sample runs on.
    pub fn system(&self) -> &ActorSystem {
        &self.system
    }

    /// Stops every registered actor and waits for them to exit.
    pub async fn shutdown(self) {
        info!("Shutting down system...");
        self.system.shutdown().await;
        info!("System shutdown complete.");
    }
}
