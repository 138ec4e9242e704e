//! `wattcast-ai`
//!
//! **Responsibility:** turn a model, its feature schema and a handful of user
//! inputs into one prediction.
//!
//! This crate does no I/O:
//! - Model artifacts arrive as JSON strings or already-built values.
//! - Historical statistics arrive as a [`wattcast_core::DefaultTable`].
//! - Loading, caching and presentation belong to `wattcast-infra` and the CLI.

pub mod job;
pub mod model;
pub mod reconcile;
pub mod result;

pub use job::{AiJob, PredictionJob};
pub use model::{
    ForestModel, LinearModel, Model, ModelArtifact, Regressor, SchemaProvider,
    resolve_feature_spec,
};
pub use reconcile::{
    CategoryFallback, DayOfWeekResolver, DefaultTableResolver, FeatureResolver, Reconciler,
    ResolutionTier, ResolveContext, TracedRecord, UserInputResolver, reconcile,
};
pub use result::{AiError, Prediction, PredictionError};
