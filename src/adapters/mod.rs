// Adapters layer: concrete implementations for the outside world.
// Source decoders translate each provider's schema, http fetches the raw bytes.

pub mod flight_to_book;
pub mod flights;
pub mod http;

pub use flight_to_book::FlightToBookDecoder;
pub use flights::FlightsDecoder;
pub use http::HttpFetcher;

use crate::domain::model::Source;
use crate::utils::error::{FlightError, Result};
use crate::utils::validation;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Pulls the record array out of a payload. Providers serve either a bare
/// array or an object holding the array under `key`.
pub(crate) fn decode_records<T: DeserializeOwned>(
    source: Source,
    bytes: &[u8],
    key: &str,
) -> Result<Vec<T>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| FlightError::decode(source.as_str(), format!("invalid JSON: {}", e)))?;

    let items = match value {
        array @ Value::Array(_) => array,
        Value::Object(mut obj) => obj.remove(key).ok_or_else(|| {
            FlightError::decode(source.as_str(), format!("missing '{}' array", key))
        })?,
        other => {
            return Err(FlightError::decode(
                source.as_str(),
                format!("expected an array of records, got {}", json_kind(&other)),
            ))
        }
    };

    serde_json::from_value(items).map_err(|e| FlightError::decode(source.as_str(), e.to_string()))
}

pub(crate) fn parse_timestamp(source: Source, field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            FlightError::decode(
                source.as_str(),
                format!("parse {} '{}': {}", field, value, e),
            )
        })
}

pub(crate) fn require_identity(source: Source, field: &str, value: &str) -> Result<()> {
    validation::validate_non_empty_string(field, value)
        .map_err(|_| FlightError::decode(source.as_str(), format!("{} cannot be empty", field)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
