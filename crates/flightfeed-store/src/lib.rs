//! # Flightfeed Store
//!
//! TTL key-value storage engine backing the flight cache.
//!
//! The engine is deliberately small: values are opaque strings, every entry
//! carries its own expiry, and removal happens exclusively through TTL.
//! There is no delete operation and no persistence contract — the store is a
//! cache, not a system of record.
//!
//! ## Backends
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`MemoryStore`] | In-process store for tests and single-node deployments |
//! | [`RedisStore`] | RESP2 client for Redis-compatible servers |
//!
//! Both implement the [`FlightStore`] trait, which makes the explicit
//! `open`/`close` lifecycle part of the contract: callers must await a
//! successful `open` before issuing reads or writes.

pub mod error;
pub mod memory;
pub mod redis;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use store::{FlightStore, StoreFuture};
