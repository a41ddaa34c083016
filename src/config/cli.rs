use crate::config::{AppConfig, LogFormat};
use crate::core::ranking::SortOrder;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "flight-aggregator")]
#[command(about = "Query itineraries merged from the flights and flight_to_book providers")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "FLIGHT_AGGREGATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the flights provider endpoint
    #[arg(long)]
    pub flights_url: Option<String>,

    /// Override the flight_to_book provider endpoint
    #[arg(long)]
    pub flight_to_book_url: Option<String>,

    /// Override the upstream request timeout
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every itinerary from both providers
    List,
    /// Look up one itinerary by booking id / reference
    Id { id: String },
    /// Look up one itinerary containing a flight number
    Number { number: String },
    /// Find itineraries for a passenger name (exact match)
    Passenger { name: String },
    /// Find itineraries with a leg from departure to arrival
    Destination { departure: String, arrival: String },
    /// Find itineraries with an exact total price
    Price { price: f64 },
    /// List every itinerary in a ranked order
    Sorted {
        #[arg(long, value_parser = parse_sort_order)]
        by: SortOrder,
    },
    /// Probe both providers
    Health,
}

fn parse_sort_order(s: &str) -> std::result::Result<SortOrder, String> {
    s.parse().map_err(|e: crate::utils::error::FlightError| e.to_string())
}

impl CliConfig {
    /// 合併設定: 設定檔 (或環境變數) 為基礎，命令列參數覆蓋
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => match (&self.flights_url, &self.flight_to_book_url) {
                (Some(a), Some(b)) => AppConfig::new(a.clone(), b.clone()),
                _ => AppConfig::from_env()?,
            },
        };

        if let Some(url) = &self.flights_url {
            config.sources.flights.endpoint = url.clone();
        }
        if let Some(url) = &self.flight_to_book_url {
            config.sources.flight_to_book.endpoint = url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.http.timeout_seconds = timeout;
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }

        Ok(config)
    }
}
