//! # ActorClient Trait
//!
//! Typed client wrappers usually hold one [`ActorHandle`] plus the stubs of the
//! operations they expose. This trait gives them lifecycle methods (`stop`,
//! `is_alive`) for free and funnels framework errors through one mapping.

use crate::actor::ExitReason;
use crate::error::ActorError;
use crate::handle::ActorHandle;
use async_trait::async_trait;

/// Trait for domain-specific clients wrapping an [`ActorHandle`].
///
/// # Example
///
/// ```rust
/// use gen_actor::{ActorClient, ActorError, ActorHandle};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("counter error: {0}")]
/// struct CounterError(String);
///
/// struct CounterClient {
///     handle: ActorHandle<u64>,
/// }
///
/// impl ActorClient<u64> for CounterClient {
///     type Error = CounterError;
///
///     fn handle(&self) -> &ActorHandle<u64> {
///         &self.handle
///     }
///
///     fn map_error(e: ActorError) -> Self::Error {
///         CounterError(e.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait ActorClient<S: 'static>: Send + Sync {
    /// The client-specific error type.
    type Error: Send + Sync;

    /// Access the wrapped handle.
    fn handle(&self) -> &ActorHandle<S>;

    /// Map framework errors to the client error type.
    fn map_error(e: ActorError) -> Self::Error;

    fn is_alive(&self) -> bool {
        self.handle().is_alive()
    }

    /// Stops the actor after its queued messages and waits for it to exit.
    #[tracing::instrument(skip(self))]
    async fn stop(&self) -> Result<ExitReason, Self::Error> {
        tracing::debug!("Sending stop");
        self.handle().stop().await.map_err(Self::map_error)?;
        Ok(self.handle().terminated().await)
    }
}
