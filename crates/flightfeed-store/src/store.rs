//! Store contract shared by all backends.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::StoreError;

/// Boxed future type returned by [`FlightStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// TTL key-value store contract.
///
/// All operations except `open` require a prior successful `open`; backends
/// return [`StoreError::NotOpen`] otherwise. Writes are total: a `put` to an
/// existing key replaces both value and expiry. Reads never observe expired
/// entries, but `scan` and `get` are not mutually transactional — a key
/// returned by `scan` may already be gone by the time it is fetched.
pub trait FlightStore: Send + Sync {
    /// Establish the backend connection or state.
    fn open(&self) -> StoreFuture<'_, ()>;

    /// Release the backend connection. Idempotent.
    fn close(&self) -> StoreFuture<'_, ()>;

    /// Upsert `value` at `key`, expiring `ttl` from now.
    fn put<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()>;

    /// Fetch the live value at `key`, or `None` when absent or expired.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Enumerate live keys starting with `prefix`. No ordering guarantee.
    fn scan<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Vec<String>>;
}
