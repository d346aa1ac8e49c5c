//! Source registry: the configured list of flight-offer endpoints.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One external flight-offer endpoint.
///
/// The registry is an ordered list of these; list position is what makes
/// task identities stable across scheduler restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSource {
    pub name: String,
    pub url: String,
}

impl FlightSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Parse a comma-separated list of `name=url` specs.
    ///
    /// A bare URL is accepted and named after its position (`source1`,
    /// `source2`, …).
    pub fn parse_list(spec: &str) -> Result<Vec<FlightSource>, ValidationError> {
        let mut sources = Vec::new();
        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let source = match item.split_once('=') {
                Some((name, url)) => {
                    if name.trim().is_empty() || url.trim().is_empty() {
                        return Err(ValidationError::InvalidSource(item.to_owned()));
                    }
                    FlightSource::new(name.trim(), url.trim())
                }
                None => FlightSource::new(format!("source{}", sources.len() + 1), item),
            };
            sources.push(source);
        }
        if sources.is_empty() {
            return Err(ValidationError::InvalidSource(spec.to_owned()));
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_bare_specs() {
        let sources = FlightSource::parse_list(
            "alpha=https://example.test/a, https://example.test/b",
        )
        .expect("valid spec");

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0], FlightSource::new("alpha", "https://example.test/a"));
        assert_eq!(sources[1], FlightSource::new("source2", "https://example.test/b"));
    }

    #[test]
    fn rejects_empty_and_malformed_specs() {
        assert!(FlightSource::parse_list("").is_err());
        assert!(FlightSource::parse_list(" , ").is_err());
        assert!(FlightSource::parse_list("=https://example.test").is_err());
        assert!(FlightSource::parse_list("alpha=").is_err());
    }
}
