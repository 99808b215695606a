//! Lambda proxy that authenticates EnvironW weather-station observations and
//! forwards them to the Windy PWS ingestion API.

pub mod config;
pub mod error;
pub mod forward;
pub mod handler;
pub mod observation;
pub mod windy;

pub use config::{Config, StationCredential};
pub use error::{ConfigError, ProxyError};
pub use forward::{DestinationReply, PostObservation, WindyClient};
pub use handler::forward_observation;
pub use observation::{Observation, RawObservation};
pub use windy::WindyObservation;
