//! Typed clients for the sample actors.

pub mod counter_client;
pub mod kv_client;

pub use counter_client::CounterClient;
pub use kv_client::KvClient;
