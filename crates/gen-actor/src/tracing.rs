//! # Observability & Tracing
//!
//! The runtime logs through `tracing` with structured fields. [`setup_tracing`]
//! installs a compact subscriber for binaries and demos.
//!
//! ## What Gets Traced
//!
//! | Level | Event | Fields |
//! |-------|-------|--------|
//! | `info` | actor start, shutdown | `actor`, `id`, `reason` |
//! | `debug` | each call/cast sent, each message handled | `operation`, `arity`, `mode`, `correlation`, `state` |
//! | `warn` | unhandled cast dropped, rejected arguments, call body without reply, call timeout | `operation`, `error` |
//! | `error` | unhandled call, handler panic, abnormal termination | `operation`, `reason` |
//!
//! `actor` is the registered name, or the actor type name for anonymous actors.
//!
//! ## Usage
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Every message
//! RUST_LOG=debug cargo run
//!
//! # Runtime internals only
//! RUST_LOG=gen_actor=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug`, a call shows up as a send on the caller side followed
//! by the handling on the actor side, linked by the correlation token:
//!
//! ```text
//! DEBUG Call actor=kv_server id=<1> operation="put" correlation=7
//! DEBUG Handling actor=kv_server operation=put arity=2 mode=call state=store
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Calling it again (for example from several tests) keeps the first
/// subscriber.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
