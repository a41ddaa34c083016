use crate::adapters::{decode_records, parse_timestamp, require_identity};
use crate::domain::model::{Flight, Flights, Segment, Source, Total};
use crate::domain::ports::SourceDecoder;
use crate::utils::error::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawBooking {
    reference: String,
    status: String,
    traveler: RawTraveler,
    segments: Vec<RawSegment>,
    total: RawTotal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTraveler {
    first_name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    flight: RawLeg,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    number: String,
    from: String,
    to: String,
    depart: String,
    arrive: String,
}

#[derive(Debug, Deserialize)]
struct RawTotal {
    amount: f64,
    currency: String,
}

/// Nested traveler/segments/total schema served by the `flight_to_book` provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightToBookDecoder;

impl FlightToBookDecoder {
    pub fn new() -> Self {
        Self
    }

    fn passenger_name(traveler: &RawTraveler) -> String {
        format!("{} {}", traveler.first_name, traveler.last_name)
            .trim()
            .to_string()
    }
}

impl SourceDecoder for FlightToBookDecoder {
    fn source(&self) -> Source {
        Source::FlightToBook
    }

    fn decode(&self, bytes: &[u8]) -> Result<Flights> {
        let source = self.source();
        let raw: Vec<RawBooking> = decode_records(source, bytes, "flight_to_book")?;

        let mut out = Vec::with_capacity(raw.len());
        for booking in raw {
            require_identity(source, "reference", &booking.reference)?;

            let mut segments = Vec::with_capacity(booking.segments.len());
            for s in booking.segments {
                let depart = parse_timestamp(source, "depart", &s.flight.depart)?;
                let arrive = parse_timestamp(source, "arrive", &s.flight.arrive)?;
                segments.push(Segment::new(
                    s.flight.number,
                    s.flight.from,
                    s.flight.to,
                    depart,
                    arrive,
                ));
            }

            let passenger = Self::passenger_name(&booking.traveler);
            out.push(Flight::new(
                booking.reference,
                booking.status,
                passenger,
                segments,
                Total::new(booking.total.amount, booking.total.currency),
                source,
            ));
        }

        tracing::debug!("Decoded {} records from {}", out.len(), source);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FlightError;

    fn payload() -> serde_json::Value {
        serde_json::json!([
            {
                "reference": "BK-1",
                "status": "ticketed",
                "traveler": {"firstName": "Ana", "lastName": "Lopez"},
                "segments": [
                    {"flight": {"number": "IB1", "from": "MAD", "to": "LHR",
                                "depart": "2025-03-01T06:00:00Z", "arrive": "2025-03-01T08:00:00Z"}},
                    {"flight": {"number": "BA2", "from": "LHR", "to": "JFK",
                                "depart": "2025-03-01T10:00:00Z", "arrive": "2025-03-01T18:00:00Z"}}
                ],
                "total": {"amount": 820.5, "currency": "EUR"}
            },
            {
                "reference": "BK-2",
                "status": "pending",
                "traveler": {"firstName": "", "lastName": "Cher "},
                "segments": [],
                "total": {"amount": 99.0, "currency": "EUR"}
            }
        ])
    }

    #[test]
    fn test_decode_nested_records() {
        let bytes = serde_json::to_vec(&payload()).unwrap();
        let flights = FlightToBookDecoder::new().decode(&bytes).unwrap();

        assert_eq!(flights.len(), 2);

        let first = &flights[0];
        assert_eq!(first.id(), "BK-1");
        assert_eq!(first.passenger_name(), "Ana Lopez");
        assert_eq!(first.source(), Source::FlightToBook);
        assert_eq!(first.segments().len(), 2);
        assert_eq!(first.segments()[0].flight_number(), "IB1");
        assert_eq!(first.segments()[1].arrival(), "JFK");
        assert_eq!(first.total().amount(), 820.5);
        assert_eq!(first.total().currency(), "EUR");

        assert!(flights[1].segments().is_empty());
    }

    #[test]
    fn test_passenger_name_is_trimmed() {
        let bytes = serde_json::to_vec(&payload()).unwrap();
        let flights = FlightToBookDecoder::new().decode(&bytes).unwrap();

        assert_eq!(flights[1].passenger_name(), "Cher");
    }

    #[test]
    fn test_decode_wrapped_payload() {
        let bytes =
            serde_json::to_vec(&serde_json::json!({ "flight_to_book": payload() })).unwrap();
        assert_eq!(FlightToBookDecoder::new().decode(&bytes).unwrap().len(), 2);
    }

    #[test]
    fn test_bad_segment_timestamp_fails_whole_payload() {
        let mut value = payload();
        value[0]["segments"][1]["flight"]["depart"] = serde_json::json!("not-a-time");
        let bytes = serde_json::to_vec(&value).unwrap();

        let err = FlightToBookDecoder::new().decode(&bytes).unwrap_err();
        match err {
            FlightError::Decode { source_name, message } => {
                assert_eq!(source_name, "flight_to_book");
                assert!(message.contains("depart"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_traveler_rejected() {
        let mut value = payload();
        value[0].as_object_mut().unwrap().remove("traveler");
        let bytes = serde_json::to_vec(&value).unwrap();

        let err = FlightToBookDecoder::new().decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("traveler"));
    }

    #[test]
    fn test_malformed_json() {
        let err = FlightToBookDecoder::new().decode(b"[{\"reference\":").unwrap_err();
        assert!(matches!(err, FlightError::Decode { .. }));
    }
}
