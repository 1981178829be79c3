//! # KV Sample
//!
//! Starts the [`KvSystem`], runs a few calls and casts against the key/value
//! server and the counter, then shuts down.
//!
//! ```bash
//! RUST_LOG=info cargo run -p kv-sample
//! RUST_LOG=debug cargo run -p kv-sample   # every message
//! ```

use gen_actor::tracing::setup_tracing;
use gen_actor::ActorClient;
use kv_sample::lifecycle::KvSystem;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting key/value sample");
    let system = KvSystem::new().map_err(|e| e.to_string())?;
    info!(registered = ?system.system().registered(), "Actors registered");

    let kv = &system.kv_client;
    let span = tracing::info_span!("kv_writes");
    async {
        kv.put("a", 1).await?;
        kv.put("b", 2).await?;
        let previous = kv.put("a", 10).await?;
        info!(?previous, "Overwrote a");
        kv.delete("b")
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    let a = kv.get("a").await.map_err(|e| e.to_string())?;
    let b = kv.get("b").await.map_err(|e| e.to_string())?;
    info!(?a, ?b, "Read back");

    match kv.require("missing").await {
        Ok(value) => info!(value, "Unexpected value"),
        Err(e) => error!(error = %e, "Lookup failed"),
    }

    let counter = &system.counter_client;
    counter.increment().map_err(|e| e.to_string())?;
    let count = counter.increment_by(5).await.map_err(|e| e.to_string())?;
    info!(count, alive = counter.is_alive(), "Counter updated");

    let snapshot = kv.snapshot().await.map_err(|e| e.to_string())?;
    info!(entries = snapshot.len(), keys = ?snapshot.keys().collect::<Vec<_>>(), "Final store");

    // Shutdown system gracefully
    system.shutdown().await;

    info!("Application completed successfully");
    Ok(())
}
