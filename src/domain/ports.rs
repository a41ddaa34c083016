use crate::domain::model::{Flight, Flights, Source};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Query surface shared by every flight store.
///
/// Single-result lookups report a miss as `FlightError::FlightNotFound`.
/// Multi-result lookups return an empty collection on a miss.
#[async_trait]
pub trait FlightsRepository: Send + Sync {
    async fn list(&self, cancel: &CancellationToken) -> Result<Flights>;

    async fn find_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Flight>;

    async fn find_by_number(&self, cancel: &CancellationToken, number: &str) -> Result<Flight>;

    async fn find_by_passenger(
        &self,
        cancel: &CancellationToken,
        passenger_name: &str,
    ) -> Result<Flights>;

    async fn find_by_destination(
        &self,
        cancel: &CancellationToken,
        departure: &str,
        arrival: &str,
    ) -> Result<Flights>;

    async fn find_by_price(&self, cancel: &CancellationToken, price: f64) -> Result<Flights>;
}

/// Fetches raw payload bytes from an upstream.
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>>;

    /// Status code of a GET without consuming the body. Only network
    /// failures and cancellation are errors.
    async fn status(&self, url: &str, cancel: &CancellationToken) -> Result<u16> {
        self.fetch(url, cancel).await.map(|_| 200)
    }
}

/// Translates one provider's payload into canonical flights.
pub trait SourceDecoder: Send + Sync {
    fn source(&self) -> Source;
    fn decode(&self, bytes: &[u8]) -> Result<Flights>;
}
