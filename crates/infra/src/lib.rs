//! Infrastructure layer: artifact files, historical data, configuration.

pub mod artifact;
pub mod config;
pub mod context;
pub mod error;
pub mod history;

pub use artifact::load_model;
pub use config::AppConfig;
pub use context::PredictionContext;
pub use error::{InfraError, ProfileError};
pub use history::{HistoricalDataset, HourSource, HourlyPoint, HourlyProfile};
