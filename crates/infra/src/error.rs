//! Failures of the file-backed collaborators.

use std::path::PathBuf;

use thiserror::Error;

use wattcast_ai::AiError;

/// Loading failures. Each one names the artifact it concerns.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("model file `{}` not found; save the trained model artifact there or point --model at it", .path.display())]
    ModelMissing { path: PathBuf },

    #[error("failed to load model `{}`: {source}", .path.display())]
    ModelMalformed {
        path: PathBuf,
        #[source]
        source: AiError,
    },

    #[error("failed to read {artifact} `{}`: {source}", .path.display())]
    Io {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read dataset `{}`: {reason}", .path.display())]
    DatasetMalformed { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Reasons the hourly profile cannot be built. None of these affect prediction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("no historical dataset loaded")]
    NoDataset,

    #[error("dataset has no numeric `{0}` column")]
    MissingColumn(String),

    #[error("cannot determine the hour of each row (no `hour` column, timestamp index, or `DateTime` column)")]
    HourUndeterminable,
}
