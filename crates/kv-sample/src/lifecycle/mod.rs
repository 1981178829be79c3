//! # System Lifecycle
//!
//! [`KvSystem`] starts the sample actors on one [`ActorSystem`](gen_actor::ActorSystem),
//! registers them by name, hands out typed clients, and stops everything on
//! [`shutdown`](KvSystem::shutdown).
//!
//! ```rust
//! use kv_sample::lifecycle::KvSystem;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kv_sample::kv_server::KvError> {
//!     let system = KvSystem::new()?;
//!     system.kv_client.put("a", 1).await?;
//!     assert_eq!(system.counter_client.increment_by(2).await?, 2);
//!     system.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Graceful Shutdown
//!
//! Registered actors stay alive while the registry holds them, so dropping the
//! clients is not enough. `shutdown` sends each registered actor a stop request
//! (queued behind its pending messages) and waits until every one has exited.
//!
//! ## Observability
//!
//! Call [`setup_tracing`](gen_actor::tracing::setup_tracing) once at startup;
//! see [`gen_actor::tracing`] for the emitted events.

pub mod kv_system;

pub use kv_system::*;
