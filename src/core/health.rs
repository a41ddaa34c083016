use crate::config::AppConfig;
use crate::domain::ports::ByteFetcher;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: u16,
    pub message: String,
}

impl HealthReport {
    pub fn ok() -> Self {
        Self {
            status: 200,
            message: "Health Ok".to_string(),
        }
    }

    pub fn not_ok(failing: &str) -> Self {
        Self {
            status: 503,
            message: format!("Health Not Ok: {} unavailable", failing),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub struct HealthProbe {
    config: AppConfig,
    fetcher: Arc<dyn ByteFetcher>,
}

impl HealthProbe {
    pub fn new(config: AppConfig, fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Only an exact 200 from each provider counts as healthy. Upstream
    /// failures are reported, never returned as errors.
    pub async fn check(&self, cancel: &CancellationToken) -> HealthReport {
        let endpoints = [
            ("flights", self.config.flights_url()),
            ("flight_to_book", self.config.flight_to_book_url()),
        ];

        for (name, url) in endpoints {
            match self.fetcher.status(url, cancel).await {
                Ok(200) => {}
                Ok(code) => {
                    tracing::warn!("Health check failed for {}: status {}", name, code);
                    return HealthReport::not_ok(name);
                }
                Err(e) => {
                    tracing::warn!("Health check failed for {}: {}", name, e);
                    return HealthReport::not_ok(name);
                }
            }
        }
        HealthReport::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HttpFetcher;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn probe(a: String, b: String) -> HealthProbe {
        let fetcher = HttpFetcher::new(Duration::from_secs(2), 64).unwrap();
        HealthProbe::new(AppConfig::new(a, b), Arc::new(fetcher))
    }

    #[tokio::test]
    async fn test_both_providers_up() {
        let server = MockServer::start();
        let a = server.mock(|when, then| {
            when.method(GET).path("/flights");
            then.status(200).body("[]");
        });
        let b = server.mock(|when, then| {
            when.method(GET).path("/flight_to_book");
            then.status(200).body("[]");
        });

        let report = probe(server.url("/flights"), server.url("/flight_to_book"))
            .check(&CancellationToken::new())
            .await;

        a.assert();
        b.assert();
        assert_eq!(report, HealthReport::ok());
    }

    #[tokio::test]
    async fn test_non_200_success_is_unhealthy() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/flights");
            then.status(204);
        });
        let b = server.mock(|when, then| {
            when.method(GET).path("/flight_to_book");
            then.status(200).body("[]");
        });

        let report = probe(server.url("/flights"), server.url("/flight_to_book"))
            .check(&CancellationToken::new())
            .await;

        assert_eq!(report, HealthReport::not_ok("flights"));
        b.assert_hits(0);
    }

    #[tokio::test]
    async fn test_second_provider_down() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/flights");
            then.status(200).body("[]");
        });
        server.mock(|when, then| {
            when.method(GET).path("/flight_to_book");
            then.status(500);
        });

        let report = probe(server.url("/flights"), server.url("/flight_to_book"))
            .check(&CancellationToken::new())
            .await;

        assert!(!report.is_ok());
        assert_eq!(report.status, 503);
        assert!(report.message.contains("flight_to_book"));
    }
}
