//! # Flightfeed Core
//!
//! Fetch scheduling, deduplication, and the cache catalog for the flightfeed
//! aggregation service.
//!
//! ## Overview
//!
//! The service polls a configured set of flight-offer sources on a fixed
//! cadence, retries transient failures with exponential backoff without
//! blocking other sources, and keeps every distinct itinerary in exactly one
//! TTL-bounded cache slot.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Identity-keyed TTL cache of flights over the store |
//! | [`domain`] | Flight and slice models |
//! | [`error`] | Validation and fetch error types |
//! | [`identity`] | Composite flight identity for deduplication |
//! | [`retry`] | Retry policy with exponential backoff |
//! | [`scheduler`] | Reset-then-register task scheduling and worker pool |
//! | [`source`] | Source registry |
//! | [`task`] | Task model with deterministic identities |
//! | [`throttle`] | Global throughput cap |
//! | [`transport`] | HTTP transport seam |
//! | [`worker`] | Fetch pipeline: fetch, validate, parse, identify, store |
//!
//! ## Data flow
//!
//! ```text
//! ┌────────────┐   occurrences   ┌──────────────┐
//! │ Scheduler  │────────────────▶│ FetchWorker  │
//! │ (tickers)  │                 │ (pool)       │
//! └────────────┘                 └──────┬───────┘
//!                                       │ identity keys
//!                                       ▼
//! ┌────────────┐    list_all     ┌──────────────┐
//! │ Query      │◀────────────────│ FlightCatalog│
//! │ endpoint   │                 │ (TTL store)  │
//! └────────────┘                 └──────────────┘
//! ```

pub mod catalog;
pub mod domain;
pub mod error;
pub mod identity;
pub mod retry;
pub mod scheduler;
pub mod source;
pub mod task;
pub mod throttle;
pub mod transport;
pub mod worker;

pub use catalog::{FlightCatalog, DEFAULT_NAMESPACE};
pub use domain::{Flight, Slice};
pub use error::{FetchError, ValidationError};
pub use identity::{flight_identifier, slice_identifier};
pub use retry::{Backoff, RetryPolicy};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use source::FlightSource;
pub use task::{Task, TaskKind};
pub use throttle::ThroughputGate;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use worker::{FetchWorker, DEFAULT_FETCH_TIMEOUT};
