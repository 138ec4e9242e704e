use serde::Serialize;
use thiserror::Error;

use wattcast_core::{FeatureRecord, FeatureSpec, SpecSource};

use crate::reconcile::ResolutionTier;

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted global active power, in kilowatts.
    pub value: f64,

    /// The exact row handed to the model.
    pub record: FeatureRecord,

    /// Tier that produced each value, parallel to `record`.
    pub tiers: Vec<ResolutionTier>,

    pub spec_source: SpecSource,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AiError {
    #[error("invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("schema introspection failed: {0}")]
    Schema(String),

    #[error("record does not match model schema: {0}")]
    SchemaMismatch(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

/// A failed inference, with what the model expected and what it was given.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{source}\n  expected features: {expected}\n  constructed record: {record}")]
pub struct PredictionError {
    pub source: AiError,
    pub expected: FeatureSpec,
    pub record: FeatureRecord,
}
