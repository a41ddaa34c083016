use crate::adapters::{decode_records, parse_timestamp, require_identity};
use crate::domain::model::{Flight, Flights, Segment, Source, Total};
use crate::domain::ports::SourceDecoder;
use crate::utils::error::Result;
use serde::Deserialize;

/// Flat one-leg-per-record schema served by the `flights` provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlight {
    booking_id: String,
    status: String,
    passenger_name: String,
    flight_number: String,
    departure_airport: String,
    arrival_airport: String,
    departure_time: String,
    arrival_time: String,
    price: f64,
    currency: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlightsDecoder;

impl FlightsDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl SourceDecoder for FlightsDecoder {
    fn source(&self) -> Source {
        Source::Flights
    }

    fn decode(&self, bytes: &[u8]) -> Result<Flights> {
        let source = self.source();
        let raw: Vec<RawFlight> = decode_records(source, bytes, "flights")?;

        let mut out = Vec::with_capacity(raw.len());
        for f in raw {
            require_identity(source, "bookingId", &f.booking_id)?;
            let depart = parse_timestamp(source, "departureTime", &f.departure_time)?;
            let arrive = parse_timestamp(source, "arrivalTime", &f.arrival_time)?;

            let segment = Segment::new(
                f.flight_number,
                f.departure_airport,
                f.arrival_airport,
                depart,
                arrive,
            );

            // 乘客姓名原樣保留
            out.push(Flight::new(
                f.booking_id,
                f.status,
                f.passenger_name,
                vec![segment],
                Total::new(f.price, f.currency),
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
                "bookingId": "1",
                "status": "confirmed",
                "passengerName": " John Doe",
                "flightNumber": "AA100",
                "departureAirport": "JFK",
                "arrivalAirport": "LAX",
                "departureTime": "2025-03-01T08:00:00Z",
                "arrivalTime": "2025-03-01T13:00:00Z",
                "price": 500.0,
                "currency": "USD"
            },
            {
                "bookingId": "2",
                "status": "cancelled",
                "passengerName": "Jane Smith",
                "flightNumber": "UA200",
                "departureAirport": "JFK",
                "arrivalAirport": "SFO",
                "departureTime": "2025-03-02T09:30:00-05:00",
                "arrivalTime": "2025-03-02T12:45:00-08:00",
                "price": 300,
                "currency": "USD"
            }
        ])
    }

    #[test]
    fn test_decode_flat_records() {
        let bytes = serde_json::to_vec(&payload()).unwrap();
        let flights = FlightsDecoder::new().decode(&bytes).unwrap();

        assert_eq!(flights.len(), 2);

        let first = &flights[0];
        assert_eq!(first.id(), "1");
        assert_eq!(first.status(), "confirmed");
        assert_eq!(first.passenger_name(), " John Doe");
        assert_eq!(first.source(), Source::Flights);
        assert_eq!(first.segments().len(), 1);
        assert_eq!(first.segments()[0].flight_number(), "AA100");
        assert_eq!(first.segments()[0].departure(), "JFK");
        assert_eq!(first.segments()[0].arrival(), "LAX");
        assert_eq!(first.total().amount(), 500.0);
        assert_eq!(first.total().currency(), "USD");

        let second = &flights[1];
        assert_eq!(second.total().amount(), 300.0);
        assert_eq!(
            second.segments()[0].arrive_time().to_rfc3339(),
            "2025-03-02T20:45:00+00:00"
        );
    }

    #[test]
    fn test_decode_wrapped_payload() {
        let bytes = serde_json::to_vec(&serde_json::json!({ "flights": payload() })).unwrap();
        let flights = FlightsDecoder::new().decode(&bytes).unwrap();
        assert_eq!(flights.len(), 2);
    }

    #[test]
    fn test_one_bad_timestamp_fails_whole_payload() {
        let mut value = payload();
        value[1]["arrivalTime"] = serde_json::json!("02/03/2025 12:45");
        let bytes = serde_json::to_vec(&value).unwrap();

        let err = FlightsDecoder::new().decode(&bytes).unwrap_err();

        match err {
            FlightError::Decode { source_name, message } => {
                assert_eq!(source_name, "flights");
                assert!(message.contains("arrivalTime"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let mut value = payload();
        value[0].as_object_mut().unwrap().remove("price");
        let bytes = serde_json::to_vec(&value).unwrap();

        let err = FlightsDecoder::new().decode(&bytes).unwrap_err();
        assert!(matches!(err, FlightError::Decode { .. }));
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_empty_booking_id_rejected() {
        let mut value = payload();
        value[0]["bookingId"] = serde_json::json!("");
        let bytes = serde_json::to_vec(&value).unwrap();

        assert!(FlightsDecoder::new().decode(&bytes).unwrap_err().is_hard());
    }

    #[test]
    fn test_empty_array() {
        assert!(FlightsDecoder::new().decode(b"[]").unwrap().is_empty());
    }
}
