use std::time::Duration;

use clap::Parser;

use flightfeed_core::{FlightSource, RetryPolicy, SchedulerConfig, ValidationError};

/// Default source registry; override with `--sources` / `FLIGHT_SOURCES`.
pub const DEFAULT_SOURCES: &str = "source1=https://coding-challenge.powerus.de/flight/source1,\
                                   source2=https://coding-challenge.powerus.de/flight/source2";

#[derive(Debug, Parser)]
#[command(name = "flightfeed")]
#[command(about = "Flight-offer aggregation service", long_about = None)]
pub struct Cli {
    /// Query endpoint bind port
    #[arg(long, env = "PORT")]
    pub port: u16,

    /// Flight store host
    #[arg(long, env = "STORE_HOST", required_unless_present = "memory_store")]
    pub store_host: Option<String>,

    /// Flight store port
    #[arg(long, env = "STORE_PORT", required_unless_present = "memory_store")]
    pub store_port: Option<u16>,

    /// Use an in-process store instead of an external one
    #[arg(long, env = "MEMORY_STORE")]
    pub memory_store: bool,

    /// Cache entry lifetime in seconds
    #[arg(long, env = "FLIGHTS_CACHE_TTL_S", default_value_t = 3_600)]
    pub cache_ttl_s: u64,

    /// Recurring fetch cadence in milliseconds
    #[arg(long, env = "SOURCES_FETCH_INTERVAL_MS", default_value_t = 60_000)]
    pub fetch_interval_ms: u64,

    /// Cap on task starts per second, across all sources
    #[arg(long, env = "JOB_LIMIT_PER_SECOND", default_value_t = 10)]
    pub jobs_per_second: u32,

    /// Fetch attempts before an occurrence fails permanently
    #[arg(long, env = "SOURCES_FETCH_ATTEMPTS", default_value_t = 3)]
    pub fetch_attempts: u32,

    /// Exponential backoff base in milliseconds
    #[arg(long, env = "SOURCES_FETCH_BACKOFF_MS", default_value_t = 1_000)]
    pub fetch_backoff_ms: u64,

    /// Per-request network timeout in milliseconds
    #[arg(long, env = "SOURCES_FETCH_TIMEOUT_MS", default_value_t = 5_000)]
    pub fetch_timeout_ms: u64,

    /// Fetch worker pool size
    #[arg(long, env = "SOURCES_FETCH_CONCURRENCY", default_value_t = 4)]
    pub fetch_concurrency: usize,

    /// Comma-separated source list (`name=url` specs or bare URLs)
    #[arg(long, env = "FLIGHT_SOURCES", default_value = DEFAULT_SOURCES)]
    pub sources: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn sources(&self) -> Result<Vec<FlightSource>, ValidationError> {
        FlightSource::parse_list(&self.sources)
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            fetch_interval: Duration::from_millis(self.fetch_interval_ms),
            jobs_per_second: self.jobs_per_second,
            workers: self.fetch_concurrency,
            retry: RetryPolicy::new(
                self.fetch_attempts,
                Duration::from_millis(self.fetch_backoff_ms),
            ),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_s)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
