//! Composite flight identity used for deduplication.
//!
//! The identifier is the sole deduplication mechanism: flights from
//! different sources or fetch cycles that describe the same itinerary
//! collapse to one cache slot. Correctness assumes timestamps are already
//! UTC; non-UTC inputs may under-deduplicate.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Flight, Slice};

/// `{flight_number}-{arrival}-{departure}` with RFC 3339 timestamps.
pub fn slice_identifier(slice: &Slice) -> String {
    format!(
        "{}-{}-{}",
        slice.flight_number,
        format_utc(slice.arrival_date_time_utc),
        format_utc(slice.departure_date_time_utc)
    )
}

/// Slice identifiers joined with `_`, in itinerary order.
///
/// Total and order-sensitive: reversing the slices changes the result.
pub fn flight_identifier(flight: &Flight) -> String {
    flight
        .slices()
        .iter()
        .map(slice_identifier)
        .collect::<Vec<_>>()
        .join("_")
}

fn format_utc(ts: OffsetDateTime) -> String {
    // Timestamps enter the system through RFC 3339 parsing, so formatting
    // cannot fail for any value actually held; the fallback keeps the
    // function total regardless.
    ts.format(&Rfc3339)
        .unwrap_or_else(|_| ts.unix_timestamp().to_string())
}
