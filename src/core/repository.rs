use crate::domain::model::{Flight, Flights, Source};
use crate::domain::ports::{FlightsRepository, SourceDecoder};
use crate::utils::error::{FlightError, Result};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Read-only store over one provider's decoded payload.
#[derive(Debug, Clone)]
pub struct SourceRepository {
    source: Source,
    data: Flights,
}

impl SourceRepository {
    pub fn new(source: Source, data: Flights) -> Self {
        Self { source, data }
    }

    pub fn from_bytes<D: SourceDecoder + ?Sized>(decoder: &D, bytes: &[u8]) -> Result<Self> {
        let data = decoder.decode(bytes)?;
        Ok(Self::new(decoder.source(), data))
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ensure_active(cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(FlightError::Cancelled);
        }
        Ok(())
    }

    fn first_match<P: Fn(&Flight) -> bool>(&self, predicate: P) -> Result<Flight> {
        self.data
            .iter()
            .find(|f| predicate(f))
            .cloned()
            .ok_or(FlightError::FlightNotFound)
    }

    fn all_matches<P: Fn(&Flight) -> bool>(&self, predicate: P) -> Flights {
        self.data.iter().filter(|f| predicate(f)).cloned().collect()
    }
}

#[async_trait]
impl FlightsRepository for SourceRepository {
    async fn list(&self, cancel: &CancellationToken) -> Result<Flights> {
        Self::ensure_active(cancel)?;
        Ok(self.data.clone())
    }

    async fn find_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Flight> {
        Self::ensure_active(cancel)?;
        self.first_match(|f| f.id() == id)
    }

    async fn find_by_number(&self, cancel: &CancellationToken, number: &str) -> Result<Flight> {
        Self::ensure_active(cancel)?;
        self.first_match(|f| f.has_flight_number(number))
    }

    async fn find_by_passenger(
        &self,
        cancel: &CancellationToken,
        passenger_name: &str,
    ) -> Result<Flights> {
        Self::ensure_active(cancel)?;
        Ok(self.all_matches(|f| f.passenger_name() == passenger_name))
    }

    async fn find_by_destination(
        &self,
        cancel: &CancellationToken,
        departure: &str,
        arrival: &str,
    ) -> Result<Flights> {
        Self::ensure_active(cancel)?;
        Ok(self.all_matches(|f| f.flies_between(departure, arrival)))
    }

    async fn find_by_price(&self, cancel: &CancellationToken, price: f64) -> Result<Flights> {
        Self::ensure_active(cancel)?;
        // exact match, no tolerance
        Ok(self.all_matches(|f| f.total().amount() == price))
    }
}
