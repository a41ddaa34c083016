use crate::domain::ports::ByteFetcher;
use crate::utils::error::{FlightError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Timed GET against a provider endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    error_body_limit: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, error_body_limit: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlightError::ConfigValidationError {
                field: "http".to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            error_body_limit,
        })
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FlightError::transport(url, format!("do request: {}", e)))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let snippet = self.error_snippet(url, response).await;
            return Err(FlightError::transport(
                url,
                format!("unexpected status {}: {}", status.as_u16(), snippet),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FlightError::transport(url, format!("read body: {}", e)))?;
        Ok(body.to_vec())
    }

    /// Reads at most `error_body_limit` bytes of a failed response.
    async fn error_snippet(&self, url: &str, mut response: Response) -> String {
        let mut buf: Vec<u8> = Vec::new();
        while buf.len() < self.error_body_limit {
            match response.chunk().await {
                Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Failed to read error body from {}: {}", url, e);
                    if buf.is_empty() {
                        return format!("<body unreadable: {}>", e);
                    }
                    break;
                }
            }
        }
        buf.truncate(self.error_body_limit);
        String::from_utf8_lossy(&buf).into_owned()
    }

    async fn get_status(&self, url: &str) -> Result<u16> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FlightError::transport(url, format!("do request: {}", e)))?;
        // body is dropped unread
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl ByteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FlightError::Cancelled),
            result = self.get(url) => result,
        }
    }

    async fn status(&self, url: &str, cancel: &CancellationToken) -> Result<u16> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FlightError::Cancelled),
            result = self.get_status(url) => result,
        }
    }
}
