//! # KV Sample Library
//!
//! A key/value server and a counter built on `gen-actor`. This library exposes
//! the sample's modules for the demo binary and for integration testing.

pub mod clients;
pub mod counter;
pub mod kv_server;
pub mod lifecycle;
pub mod model;
