//! Canonical flight-offer model.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ValidationError;
use crate::identity::flight_identifier;

/// One itinerary leg. All fields are required; timestamps are UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub origin_name: String,
    pub destination_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_date_time_utc: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_date_time_utc: OffsetDateTime,
    pub flight_number: String,
    /// Leg duration in minutes.
    pub duration: u32,
}

impl Slice {
    pub fn new(
        origin_name: impl Into<String>,
        destination_name: impl Into<String>,
        departure_date_time_utc: OffsetDateTime,
        arrival_date_time_utc: OffsetDateTime,
        flight_number: impl Into<String>,
        duration: u32,
    ) -> Result<Self, ValidationError> {
        let slice = Self {
            origin_name: validate_non_empty("origin_name", origin_name.into())?,
            destination_name: validate_non_empty("destination_name", destination_name.into())?,
            departure_date_time_utc,
            arrival_date_time_utc,
            flight_number: validate_non_empty("flight_number", flight_number.into())?,
            duration,
        };
        Ok(slice)
    }
}

/// An itinerary: a non-empty, ordered sequence of slices.
///
/// Order is semantically meaningful (outbound before return) and
/// participates in identity. Immutable once constructed; the non-empty
/// invariant also holds for values deserialized from the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FlightRecord")]
pub struct Flight {
    slices: Vec<Slice>,
}

impl Flight {
    pub fn new(slices: Vec<Slice>) -> Result<Self, ValidationError> {
        if slices.is_empty() {
            return Err(ValidationError::EmptyItinerary);
        }
        Ok(Self { slices })
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Stable composite identity; see [`flight_identifier`].
    pub fn identifier(&self) -> String {
        flight_identifier(self)
    }
}

#[derive(Debug, Deserialize)]
struct FlightRecord {
    slices: Vec<Slice>,
}

impl TryFrom<FlightRecord> for Flight {
    type Error = ValidationError;

    fn try_from(record: FlightRecord) -> Result<Self, Self::Error> {
        Flight::new(record.slices)
    }
}

fn validate_non_empty(
    field: &'static str,
    value: String,
) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample_slice() -> Slice {
        Slice::new(
            "Schoenefeld",
            "Stansted",
            datetime!(2021-01-01 10:00:00 UTC),
            datetime!(2021-01-01 11:00:00 UTC),
            "LH123",
            60,
        )
        .expect("valid slice")
    }

    #[test]
    fn flight_requires_at_least_one_slice() {
        let error = Flight::new(Vec::new()).expect_err("empty itinerary");
        assert_eq!(error, ValidationError::EmptyItinerary);

        let flight = Flight::new(vec![sample_slice()]).expect("valid flight");
        assert_eq!(flight.slices().len(), 1);
    }

    #[test]
    fn slice_rejects_blank_fields() {
        let error = Slice::new(
            "",
            "Stansted",
            datetime!(2021-01-01 10:00:00 UTC),
            datetime!(2021-01-01 11:00:00 UTC),
            "LH123",
            60,
        )
        .expect_err("blank origin");
        assert_eq!(
            error,
            ValidationError::EmptyField {
                field: "origin_name"
            }
        );
    }

    #[test]
    fn deserialization_enforces_the_non_empty_invariant() {
        let error = serde_json::from_str::<Flight>(r#"{"slices":[]}"#)
            .expect_err("empty slices must not deserialize");
        assert!(error.to_string().contains("at least one slice"));
    }

    #[test]
    fn wire_format_roundtrips_rfc3339_timestamps() {
        let payload = r#"{
            "slices": [{
                "origin_name": "Schoenefeld",
                "destination_name": "Stansted",
                "departure_date_time_utc": "2019-08-08T04:30:00.000Z",
                "arrival_date_time_utc": "2019-08-08T06:25:00.000Z",
                "flight_number": "144",
                "duration": 115
            }]
        }"#;

        let flight: Flight = serde_json::from_str(payload).expect("parse");
        assert_eq!(flight.slices()[0].flight_number, "144");
        assert_eq!(flight.slices()[0].duration, 115);

        let json = serde_json::to_string(&flight).expect("serialize");
        let reparsed: Flight = serde_json::from_str(&json).expect("reparse");
        assert_eq!(flight, reparsed);
    }
}
