use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream provider an itinerary was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Flights,
    FlightToBook,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Flights => "flights",
            Source::FlightToBook => "flight_to_book",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Total {
    amount: f64,
    currency: String,
}

impl Total {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// One flown leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "flightNumber")]
    flight_number: String,
    #[serde(rename = "from")]
    departure: String,
    #[serde(rename = "to")]
    arrival: String,
    #[serde(rename = "depart")]
    depart_time: DateTime<Utc>,
    #[serde(rename = "arrive")]
    arrive_time: DateTime<Utc>,
}

impl Segment {
    pub fn new(
        flight_number: impl Into<String>,
        departure: impl Into<String>,
        arrival: impl Into<String>,
        depart_time: DateTime<Utc>,
        arrive_time: DateTime<Utc>,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            departure: departure.into(),
            arrival: arrival.into(),
            depart_time,
            arrive_time,
        }
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn departure(&self) -> &str {
        &self.departure
    }

    pub fn arrival(&self) -> &str {
        &self.arrival
    }

    pub fn depart_time(&self) -> DateTime<Utc> {
        self.depart_time
    }

    pub fn arrive_time(&self) -> DateTime<Utc> {
        self.arrive_time
    }
}

/// A passenger itinerary, possibly multi-leg.
///
/// `id` is only unique within `source`; the pair is the real identity.
/// Segments are kept in travel order, so the first segment carries the
/// effective departure and the last one the effective arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    id: String,
    status: String,
    #[serde(rename = "passengerName")]
    passenger_name: String,
    segments: Vec<Segment>,
    total: Total,
    source: Source,
}

impl Flight {
    pub fn new(
        id: impl Into<String>,
        status: impl Into<String>,
        passenger_name: impl Into<String>,
        segments: Vec<Segment>,
        total: Total,
        source: Source,
    ) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            passenger_name: passenger_name.into(),
            segments,
            total,
            source,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn passenger_name(&self) -> &str {
        &self.passenger_name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total(&self) -> &Total {
        &self.total
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn has_flight_number(&self, number: &str) -> bool {
        self.segments.iter().any(|s| s.flight_number() == number)
    }

    pub fn flies_between(&self, departure: &str, arrival: &str) -> bool {
        self.segments
            .iter()
            .any(|s| s.departure() == departure && s.arrival() == arrival)
    }
}

pub type Flights = Vec<Flight>;
