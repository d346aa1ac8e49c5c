//! Fetch execution: one task occurrence, one source round-trip.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::catalog::FlightCatalog;
use crate::domain::{Flight, Slice};
use crate::error::FetchError;
use crate::task::Task;
use crate::transport::HttpTransport;

/// Default per-request network timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Deserialize)]
struct SourcePayload {
    flights: Vec<RawFlight>,
}

#[derive(Debug, Deserialize)]
struct RawFlight {
    slices: Vec<Slice>,
}

/// Executes fetch tasks as explicit stages: fetch, validate, parse,
/// identify, store.
///
/// Ingestion is all-or-nothing per response: a body that fails schema
/// validation, or contains any invalid flight, writes nothing.
pub struct FetchWorker {
    transport: Arc<dyn HttpTransport>,
    catalog: FlightCatalog,
    timeout: Duration,
}

impl FetchWorker {
    pub fn new(transport: Arc<dyn HttpTransport>, catalog: FlightCatalog) -> Self {
        Self::with_timeout(transport, catalog, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(
        transport: Arc<dyn HttpTransport>,
        catalog: FlightCatalog,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            catalog,
            timeout,
        }
    }

    /// Run one attempt for `task`, returning the number of flights ingested.
    pub async fn execute(&self, task: &Task) -> Result<usize, FetchError> {
        let response = self
            .transport
            .get(&task.source.url, self.timeout)
            .await
            .map_err(|error| FetchError::Network(error.to_string()))?;

        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }

        let flights = parse_flights(&response.body)?;
        for flight in &flights {
            self.catalog.put_flight(flight).await?;
        }

        tracing::debug!(
            task = %task.id,
            source = %task.source.name,
            count = flights.len(),
            "ingested flights"
        );
        Ok(flights.len())
    }
}

fn parse_flights(body: &str) -> Result<Vec<Flight>, FetchError> {
    let payload: SourcePayload =
        serde_json::from_str(body).map_err(|error| FetchError::Malformed(error.to_string()))?;

    payload
        .flights
        .into_iter()
        .map(|raw| Flight::new(raw.slices).map_err(|error| FetchError::Malformed(error.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BODY: &str = r#"{
        "flights": [{
            "slices": [{
                "origin_name": "Schoenefeld",
                "destination_name": "Stansted",
                "departure_date_time_utc": "2019-08-08T04:30:00Z",
                "arrival_date_time_utc": "2019-08-08T06:25:00Z",
                "flight_number": "144",
                "duration": 115
            }]
        }]
    }"#;

    #[test]
    fn parses_a_wellformed_payload() {
        let flights = parse_flights(VALID_BODY).expect("valid payload");
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].slices()[0].flight_number, "144");
    }

    #[test]
    fn missing_flights_field_is_malformed() {
        let error = parse_flights(r#"{"data": []}"#).expect_err("schema mismatch");
        assert!(matches!(error, FetchError::Malformed(_)));
    }

    #[test]
    fn wrongly_typed_flights_field_is_malformed() {
        let error = parse_flights(r#"{"flights": 7}"#).expect_err("schema mismatch");
        assert!(matches!(error, FetchError::Malformed(_)));
    }

    #[test]
    fn a_single_invalid_flight_rejects_the_whole_response() {
        let body = r#"{"flights": [{"slices": []}]}"#;
        let error = parse_flights(body).expect_err("empty itinerary");
        assert!(matches!(error, FetchError::Malformed(_)));
    }

    #[test]
    fn an_empty_flight_list_is_valid() {
        assert!(parse_flights(r#"{"flights": []}"#).expect("valid").is_empty());
    }
}
