//! Fan-out over every registered source.
//!
//! Registration order is priority order. List and the multi-result queries
//! concatenate per-source results in that order; the single-result queries
//! stop at the first source with a hit. Decode and transport failures from
//! any source abort the call unchanged. A per-source "not found" is only a
//! soft miss and is turned into a terminal error once every source has been
//! visited.

use crate::domain::model::{Flight, Flights};
use crate::domain::ports::FlightsRepository;
use crate::utils::error::{FlightError, Result};
use std::future::Future;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

pub struct MultiRepository {
    repos: Vec<Box<dyn FlightsRepository>>,
}

impl MultiRepository {
    pub fn new(repos: Vec<Box<dyn FlightsRepository>>) -> Self {
        Self { repos }
    }

    pub fn with_repository<R: FlightsRepository + 'static>(mut self, repo: R) -> Self {
        self.repos.push(Box::new(repo));
        self
    }

    pub fn source_count(&self) -> usize {
        self.repos.len()
    }

    fn checkpoint(cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            tracing::debug!("Cancellation observed, aborting fan-out");
            return Err(FlightError::Cancelled);
        }
        Ok(())
    }

    pub async fn list(&self, cancel: &CancellationToken) -> Result<Flights> {
        Self::checkpoint(cancel)?;
        let mut out = Vec::new();
        for (idx, repo) in self.repos.iter().enumerate() {
            Self::checkpoint(cancel)?;
            let flights = repo.list(cancel).await.inspect_err(|e| {
                tracing::warn!("List aborted by source #{}: {}", idx, e);
            })?;
            tracing::debug!("Source #{} listed {} flights", idx, flights.len());
            out.extend(flights);
        }
        Ok(out)
    }

    pub async fn find_by_id(&self, cancel: &CancellationToken, id: &str) -> Result<Flight> {
        self.first_hit(cancel, "id", id, |repo| repo.find_by_id(cancel, id))
            .await
    }

    pub async fn find_by_number(&self, cancel: &CancellationToken, number: &str) -> Result<Flight> {
        self.first_hit(cancel, "number", number, |repo| {
            repo.find_by_number(cancel, number)
        })
        .await
    }

    pub async fn find_by_passenger(
        &self,
        cancel: &CancellationToken,
        passenger_name: &str,
    ) -> Result<Flights> {
        self.collect_all(cancel, "passenger", |repo| {
            repo.find_by_passenger(cancel, passenger_name)
        })
        .await
    }

    pub async fn find_by_destination(
        &self,
        cancel: &CancellationToken,
        departure: &str,
        arrival: &str,
    ) -> Result<Flights> {
        self.collect_all(cancel, "destination", |repo| {
            repo.find_by_destination(cancel, departure, arrival)
        })
        .await
    }

    pub async fn find_by_price(&self, cancel: &CancellationToken, price: f64) -> Result<Flights> {
        self.collect_all(cancel, "price", |repo| repo.find_by_price(cancel, price))
            .await
    }

    async fn first_hit<'a, F>(
        &'a self,
        cancel: &'a CancellationToken,
        field: &str,
        key: &str,
        query: F,
    ) -> Result<Flight>
    where
        F: Fn(&'a dyn FlightsRepository) -> BoxFuture<'a, Flight>,
    {
        Self::checkpoint(cancel)?;
        for (idx, repo) in self.repos.iter().enumerate() {
            Self::checkpoint(cancel)?;
            match query(repo.as_ref()).await {
                Ok(flight) if !flight.id().is_empty() => {
                    tracing::debug!("Source #{} matched {} '{}'", idx, field, key);
                    return Ok(flight);
                }
                Ok(_) => {
                    tracing::debug!("Source #{} returned an empty record for {} '{}'", idx, field, key);
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!("Source #{} has no flight with {} '{}'", idx, field, key);
                }
                Err(e) => {
                    tracing::warn!("Lookup by {} aborted by source #{}: {}", field, idx, e);
                    return Err(e);
                }
            }
        }
        Err(FlightError::FlightNotFound)
    }

    async fn collect_all<'a, F>(
        &'a self,
        cancel: &'a CancellationToken,
        field: &str,
        query: F,
    ) -> Result<Flights>
    where
        F: Fn(&'a dyn FlightsRepository) -> BoxFuture<'a, Flights>,
    {
        Self::checkpoint(cancel)?;
        let mut out = Vec::new();
        for (idx, repo) in self.repos.iter().enumerate() {
            Self::checkpoint(cancel)?;
            match query(repo.as_ref()).await {
                Ok(flights) => {
                    tracing::debug!("Source #{} contributed {} flights by {}", idx, flights.len(), field);
                    out.extend(flights);
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!("Source #{} has no flights by {}", idx, field);
                }
                Err(e) => {
                    tracing::warn!("Search by {} aborted by source #{}: {}", field, idx, e);
                    return Err(e);
                }
            }
        }

        if out.is_empty() {
            return Err(FlightError::FlightsNotFound);
        }
        Ok(out)
    }
}
