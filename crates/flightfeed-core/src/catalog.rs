//! Flight-level view over the TTL store.

use std::sync::Arc;
use std::time::Duration;

use flightfeed_store::{FlightStore, StoreError};

use crate::domain::Flight;

/// Key prefix scoping this system's entries within a shared store.
pub const DEFAULT_NAMESPACE: &str = "flights";

/// Identity-keyed TTL cache of flights.
///
/// Keys are `namespace:identifier`, values the JSON-serialized flight.
/// Re-inserting the same flight overwrites value and expiry (last write
/// wins); removal happens only through TTL expiry.
#[derive(Clone)]
pub struct FlightCatalog {
    store: Arc<dyn FlightStore>,
    namespace: String,
    ttl: Duration,
}

impl FlightCatalog {
    pub fn new(store: Arc<dyn FlightStore>, ttl: Duration) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE, ttl)
    }

    pub fn with_namespace(
        store: Arc<dyn FlightStore>,
        namespace: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Upsert one flight at its identity key, expiring `ttl` from now.
    pub async fn put_flight(&self, flight: &Flight) -> Result<(), StoreError> {
        let key = format!("{}:{}", self.namespace, flight.identifier());
        let value = serde_json::to_string(flight)
            .map_err(|error| StoreError::Protocol(format!("encode flight: {error}")))?;
        self.store.put(&key, &value, self.ttl).await
    }

    /// All currently-live flights under the namespace, in no particular
    /// order.
    ///
    /// An entry that expires between key enumeration and the read is
    /// silently skipped; an entry that no longer decodes is skipped with a
    /// warning. Store failures surface as errors rather than an empty
    /// catalog.
    pub async fn list_all(&self) -> Result<Vec<Flight>, StoreError> {
        let prefix = format!("{}:", self.namespace);
        let keys = self.store.scan(&prefix).await?;

        let mut flights = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<Flight>(&raw) {
                Ok(flight) => flights.push(flight),
                Err(error) => {
                    tracing::warn!(%key, %error, "skipping undecodable cache entry");
                }
            }
        }
        Ok(flights)
    }
}
