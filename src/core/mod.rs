pub mod health;
pub mod multi;
pub mod pipeline;
pub mod ranking;
pub mod repository;

pub use crate::domain::model::{Flight, Flights, Segment, Source, Total};
pub use crate::domain::ports::{ByteFetcher, FlightsRepository, SourceDecoder};
pub use crate::utils::error::Result;
