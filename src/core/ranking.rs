use crate::core::multi::MultiRepository;
use crate::domain::model::{Flight, Flights};
use crate::utils::error::{FlightError, Result};
use chrono::Duration;
use std::fmt;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Price,
    TravelTime,
    DepartureDate,
}

impl SortOrder {
    pub fn apply(self, flights: Flights) -> Flights {
        match self {
            SortOrder::Price => sort_by_price(flights),
            SortOrder::TravelTime => sort_by_travel_time(flights),
            SortOrder::DepartureDate => sort_by_departure_date(flights),
        }
    }
}

impl FromStr for SortOrder {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(SortOrder::Price),
            "time" | "timetravel" | "duration" => Ok(SortOrder::TravelTime),
            "departure" | "depart" | "departure_date" => Ok(SortOrder::DepartureDate),
            other => Err(FlightError::InvalidConfigValueError {
                field: "sort".to_string(),
                value: other.to_string(),
                reason: "Valid orders: price, time, departure".to_string(),
            }),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::Price => "price",
            SortOrder::TravelTime => "time",
            SortOrder::DepartureDate => "departure",
        };
        f.write_str(name)
    }
}

/// Time from the first departure to the last arrival. Layovers are not
/// subtracted; a flight without segments takes no time.
pub fn total_travel_time(flight: &Flight) -> Duration {
    match (flight.first_segment(), flight.last_segment()) {
        (Some(first), Some(last)) => last.arrive_time() - first.depart_time(),
        _ => Duration::zero(),
    }
}

/// Stable ascending order on the amount. `-0.0` and `0.0` are the same price.
pub fn sort_by_price(mut flights: Flights) -> Flights {
    // + 0.0 folds -0.0 into 0.0 before total_cmp
    flights.sort_by(|a, b| (a.total().amount() + 0.0).total_cmp(&(b.total().amount() + 0.0)));
    flights
}

pub fn sort_by_travel_time(mut flights: Flights) -> Flights {
    flights.sort_by_key(total_travel_time);
    flights
}

/// Orders flights by their first departure.
///
/// Flights without segments compare neither before nor after anything else,
/// so they hold their index; only the dated flights are rearranged among the
/// remaining positions.
pub fn sort_by_departure_date(flights: Flights) -> Flights {
    let slots: Vec<usize> = flights
        .iter()
        .enumerate()
        .filter(|(_, f)| f.first_segment().is_some())
        .map(|(i, _)| i)
        .collect();

    let mut dated: Vec<Flight> = slots.iter().map(|&i| flights[i].clone()).collect();
    dated.sort_by_key(|f| f.first_segment().map(|s| s.depart_time()));

    let mut out = flights;
    for (slot, flight) in slots.into_iter().zip(dated) {
        out[slot] = flight;
    }
    out
}

/// Named orderings over the merged result of a fan-out listing.
pub struct Ranking<'a> {
    repo: &'a MultiRepository,
}

impl<'a> Ranking<'a> {
    pub fn new(repo: &'a MultiRepository) -> Self {
        Self { repo }
    }

    pub async fn sorted(&self, cancel: &CancellationToken, order: SortOrder) -> Result<Flights> {
        let flights = self.repo.list(cancel).await?;
        tracing::debug!("Ranking {} flights by {}", flights.len(), order);
        Ok(order.apply(flights))
    }

    pub async fn by_price(&self, cancel: &CancellationToken) -> Result<Flights> {
        self.sorted(cancel, SortOrder::Price).await
    }

    pub async fn by_travel_time(&self, cancel: &CancellationToken) -> Result<Flights> {
        self.sorted(cancel, SortOrder::TravelTime).await
    }

    pub async fn by_departure_date(&self, cancel: &CancellationToken) -> Result<Flights> {
        self.sorted(cancel, SortOrder::DepartureDate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::SourceRepository;
    use crate::domain::model::{Segment, Source, Total};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn flight(id: &str, price: f64, legs: &[(DateTime<Utc>, DateTime<Utc>)]) -> Flight {
        sourced(Source::Flights, id, price, legs)
    }

    fn sourced(
        source: Source,
        id: &str,
        price: f64,
        legs: &[(DateTime<Utc>, DateTime<Utc>)],
    ) -> Flight {
        let segments = legs
            .iter()
            .enumerate()
            .map(|(i, (d, a))| Segment::new(format!("XX{}", i), "AAA", "BBB", *d, *a))
            .collect();
        Flight::new(id, "confirmed", "P", segments, Total::new(price, "USD"), source)
    }

    fn ids(flights: &[Flight]) -> Vec<&str> {
        flights.iter().map(|f| f.id()).collect()
    }

    #[test]
    fn test_total_travel_time_spans_first_departure_to_last_arrival() {
        let f = flight("1", 1.0, &[(at(1, 6), at(1, 8)), (at(1, 14), at(1, 20))]);
        assert_eq!(total_travel_time(&f), Duration::hours(14));

        let none = flight("2", 1.0, &[]);
        assert_eq!(total_travel_time(&none), Duration::zero());
    }

    #[test]
    fn test_sort_by_price_is_stable() {
        let flights = vec![
            flight("a", 500.0, &[]),
            flight("b", 300.0, &[]),
            flight("c", 500.0, &[]),
            flight("d", 120.5, &[]),
            flight("e", 300.0, &[]),
        ];

        let sorted = sort_by_price(flights);

        assert_eq!(ids(&sorted), vec!["d", "b", "e", "a", "c"]);
        assert!(sorted
            .windows(2)
            .all(|w| w[0].total().amount() <= w[1].total().amount()));
    }

    #[test]
    fn test_sort_by_price_treats_signed_zero_as_equal() {
        let flights = vec![
            flight("pos", 0.0, &[]),
            flight("neg", -0.0, &[]),
            flight("cheaper", -1.0, &[]),
        ];
        assert_eq!(flights[0].total().amount(), flights[1].total().amount());

        let sorted = sort_by_price(flights);

        assert_eq!(ids(&sorted), vec!["cheaper", "pos", "neg"]);
    }

    #[test]
    fn test_sort_by_travel_time() {
        let flights = vec![
            flight("long", 1.0, &[(at(1, 0), at(1, 12))]),
            flight("layover", 1.0, &[(at(1, 0), at(1, 1)), (at(1, 5), at(1, 7))]),
            flight("empty", 1.0, &[]),
            flight("short", 1.0, &[(at(2, 0), at(2, 6))]),
            flight("short-too", 1.0, &[(at(3, 0), at(3, 6))]),
        ];

        let sorted = sort_by_travel_time(flights);

        assert_eq!(ids(&sorted), vec!["empty", "short", "short-too", "layover", "long"]);
    }

    #[test]
    fn test_sort_by_departure_date_keeps_segmentless_in_place() {
        let flights = vec![
            flight("mar-3", 1.0, &[(at(3, 8), at(3, 9))]),
            flight("none-1", 1.0, &[]),
            flight("mar-1", 1.0, &[(at(1, 8), at(1, 9))]),
            flight("mar-2", 1.0, &[(at(2, 8), at(2, 9))]),
            flight("none-2", 1.0, &[]),
            flight("mar-1-too", 1.0, &[(at(1, 8), at(1, 10))]),
        ];

        let sorted = sort_by_departure_date(flights);

        assert_eq!(
            ids(&sorted),
            vec!["mar-1", "none-1", "mar-1-too", "mar-2", "none-2", "mar-3"]
        );
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("price".parse::<SortOrder>().unwrap(), SortOrder::Price);
        assert_eq!("TimeTravel".parse::<SortOrder>().unwrap(), SortOrder::TravelTime);
        assert_eq!("duration".parse::<SortOrder>().unwrap(), SortOrder::TravelTime);
        assert_eq!("departure_date".parse::<SortOrder>().unwrap(), SortOrder::DepartureDate);
        assert_eq!("depart".parse::<SortOrder>().unwrap(), SortOrder::DepartureDate);
        assert!("cheapest".parse::<SortOrder>().is_err());
    }

    #[tokio::test]
    async fn test_ranking_sorts_merged_listing() {
        let a = SourceRepository::new(Source::Flights, vec![flight("1", 500.0, &[(at(2, 8), at(2, 9))])]);
        let b = SourceRepository::new(
            Source::FlightToBook,
            vec![sourced(Source::FlightToBook, "2", 300.0, &[(at(1, 8), at(1, 9))])],
        );
        let multi = MultiRepository::new(Vec::new()).with_repository(a).with_repository(b);
        let cancel = CancellationToken::new();

        assert_eq!(ids(&multi.list(&cancel).await.unwrap()), vec!["1", "2"]);

        let ranking = Ranking::new(&multi);
        assert_eq!(ids(&ranking.by_price(&cancel).await.unwrap()), vec!["2", "1"]);
        assert_eq!(ids(&ranking.by_departure_date(&cancel).await.unwrap()), vec!["2", "1"]);
        assert_eq!(ids(&ranking.by_travel_time(&cancel).await.unwrap()), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_ranking_propagates_cancellation() {
        let multi = MultiRepository::new(Vec::new())
            .with_repository(SourceRepository::new(Source::Flights, Vec::new()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = Ranking::new(&multi).by_price(&cancel).await.unwrap_err();
        assert!(matches!(err, FlightError::Cancelled));
    }
}
