pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::AppConfig;
pub use core::{
    health::{HealthProbe, HealthReport},
    multi::MultiRepository,
    pipeline::{FlightPipeline, FlightService},
    ranking::{Ranking, SortOrder},
    repository::SourceRepository,
};
pub use domain::model::{Flight, Flights, Segment, Source, Total};
pub use utils::error::{FlightError, Result};
