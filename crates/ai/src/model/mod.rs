//! Model capabilities and the bundled model kinds.
//!
//! A model is anything that can score a numeric row ([`Regressor`]). Some
//! models also report the ordered feature names they were trained on
//! ([`SchemaProvider`]); when they do, that list is authoritative.

pub mod forest;
pub mod linear;

use serde::{Deserialize, Serialize};
use tracing::warn;

use wattcast_core::{FeatureRecord, FeatureSpec, SpecSource};

use crate::result::AiError;

pub use forest::{ForestModel, Node, Tree};
pub use linear::LinearModel;

/// Optional schema introspection.
pub trait SchemaProvider {
    /// Ordered feature names, or `None` when the model does not know them.
    fn feature_names(&self) -> Option<&[String]>;
}

/// Scores one numeric row.
pub trait Regressor {
    /// Number of columns the model consumes.
    fn n_features(&self) -> usize;

    /// `row.len()` is guaranteed to equal [`Regressor::n_features`].
    fn predict_row(&self, row: &[f64]) -> Result<f64, AiError>;
}

/// A regressor with optional introspection: what the prediction path needs.
pub trait Model: SchemaProvider + Regressor {
    /// Check `record` against the model, then score it.
    fn predict(&self, record: &FeatureRecord) -> Result<f64, AiError> {
        if let Some(expected) = self.feature_names().filter(|n| !n.is_empty()) {
            if expected != record.names() {
                return Err(AiError::SchemaMismatch(format!(
                    "model expects [{}], record has [{}]",
                    expected.join(", "),
                    record.names().join(", ")
                )));
            }
        }

        if record.len() != self.n_features() {
            return Err(AiError::SchemaMismatch(format!(
                "model consumes {} features, record has {}",
                self.n_features(),
                record.len()
            )));
        }

        let value = self.predict_row(&record.to_row())?;
        if !value.is_finite() {
            return Err(AiError::InferenceFailed(format!(
                "model produced a non-finite prediction ({value})"
            )));
        }
        Ok(value)
    }
}

impl<T: SchemaProvider + Regressor + ?Sized> Model for T {}

/// Effective feature spec for `model`.
///
/// Uses the model's own names when it reports a non-empty list, otherwise the
/// built-in fallback spec. A reported list that is not a valid spec (blank or
/// duplicate names) is an introspection failure.
pub fn resolve_feature_spec<M>(model: &M) -> Result<(FeatureSpec, SpecSource), AiError>
where
    M: SchemaProvider + ?Sized,
{
    match model.feature_names() {
        Some(names) if !names.is_empty() => {
            let spec = FeatureSpec::new(names.iter().cloned())
                .map_err(|e| AiError::Schema(e.to_string()))?;
            Ok((spec, SpecSource::Model))
        }
        _ => {
            warn!("model does not report feature names; using fallback feature spec");
            Ok((FeatureSpec::fallback(), SpecSource::Fallback))
        }
    }
}

/// Serialized model artifact, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl ModelArtifact {
    /// Parse and validate an artifact.
    pub fn from_json(json: &str) -> Result<Self, AiError> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).map_err(|e| AiError::InvalidModel(e.to_string()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), AiError> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::Forest(m) => m.validate(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::Forest(_) => "forest",
        }
    }
}

impl SchemaProvider for ModelArtifact {
    fn feature_names(&self) -> Option<&[String]> {
        match self {
            ModelArtifact::Linear(m) => m.feature_names(),
            ModelArtifact::Forest(m) => m.feature_names(),
        }
    }
}

impl Regressor for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::Linear(m) => m.n_features(),
            ModelArtifact::Forest(m) => m.n_features(),
        }
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, AiError> {
        match self {
            ModelArtifact::Linear(m) => m.predict_row(row),
            ModelArtifact::Forest(m) => m.predict_row(row),
        }
    }
}

/// Reject a `feature_names` list whose length disagrees with the model width.
pub(crate) fn check_names_width(names: Option<&[String]>, width: usize) -> Result<(), AiError> {
    match names {
        Some(names) if !names.is_empty() && names.len() != width => Err(AiError::InvalidModel(
            format!(
                "feature_names lists {} columns but the model consumes {width}",
                names.len()
            ),
        )),
        _ => Ok(()),
    }
}
