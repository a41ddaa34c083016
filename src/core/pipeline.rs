use crate::adapters::{FlightToBookDecoder, FlightsDecoder, HttpFetcher};
use crate::config::AppConfig;
use crate::core::multi::MultiRepository;
use crate::core::ranking::{Ranking, SortOrder};
use crate::core::repository::SourceRepository;
use crate::domain::model::{Flight, Flights};
use crate::domain::ports::{ByteFetcher, SourceDecoder};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Builds a fresh set of per-source repositories for one query.
///
/// Both providers are fetched first, then decoded; the first failure
/// aborts the build. Nothing survives between calls.
pub struct FlightPipeline {
    config: AppConfig,
    fetcher: Arc<dyn ByteFetcher>,
}

impl FlightPipeline {
    pub fn new(config: AppConfig, fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { config, fetcher }
    }

    pub fn from_config(config: AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout(), config.error_body_limit())?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn load(&self, cancel: &CancellationToken) -> Result<MultiRepository> {
        let started = Instant::now();

        let flights_bytes = self.fetcher.fetch(self.config.flights_url(), cancel).await?;
        let booking_bytes = self
            .fetcher
            .fetch(self.config.flight_to_book_url(), cancel)
            .await?;

        let flights_decoder = FlightsDecoder::new();
        let booking_decoder = FlightToBookDecoder::new();
        let a = SourceRepository::from_bytes(&flights_decoder, &flights_bytes)?;
        let b = SourceRepository::from_bytes(&booking_decoder, &booking_bytes)?;

        tracing::info!(
            "Loaded {} {} and {} {} records in {:?}",
            a.len(),
            flights_decoder.source(),
            b.len(),
            booking_decoder.source(),
            started.elapsed()
        );

        Ok(MultiRepository::new(Vec::new())
            .with_repository(a)
            .with_repository(b))
    }
}

/// Entry point for the boundary layer: every call runs its own pipeline.
pub struct FlightService {
    pipeline: FlightPipeline,
}

impl FlightService {
    pub fn new(pipeline: FlightPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn list(&self, cancel: &CancellationToken) -> Result<Flights> {
        self.pipeline.load(cancel).await?.list(cancel).await
    }

    pub async fn find_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Flight> {
        self.pipeline.load(cancel).await?.find_by_id(cancel, id).await
    }

    pub async fn find_by_number(&self, cancel: &CancellationToken, number: &str) -> Result<Flight> {
        self.pipeline
            .load(cancel)
            .await?
            .find_by_number(cancel, number)
            .await
    }

    pub async fn find_by_passenger(
        &self,
        cancel: &CancellationToken,
        passenger_name: &str,
    ) -> Result<Flights> {
        self.pipeline
            .load(cancel)
            .await?
            .find_by_passenger(cancel, passenger_name)
            .await
    }

    pub async fn find_by_destination(
        &self,
        cancel: &CancellationToken,
        departure: &str,
        arrival: &str,
    ) -> Result<Flights> {
        self.pipeline
            .load(cancel)
            .await?
            .find_by_destination(cancel, departure, arrival)
            .await
    }

    pub async fn find_by_price(&self, cancel: &CancellationToken, price: f64) -> Result<Flights> {
        self.pipeline
            .load(cancel)
            .await?
            .find_by_price(cancel, price)
            .await
    }

    pub async fn sorted(&self, cancel: &CancellationToken, order: SortOrder) -> Result<Flights> {
        let multi = self.pipeline.load(cancel).await?;
        Ranking::new(&multi).sorted(cancel, order).await
    }
}
