use serde::{Deserialize, Serialize};

use crate::model::{Regressor, SchemaProvider, check_names_width};
use crate::result::AiError;

/// Ordinary linear regression: `intercept + Σ coefficients[i] * x[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
            feature_names: None,
        }
    }

    pub fn with_feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<(), AiError> {
        if self.coefficients.is_empty() {
            return Err(AiError::InvalidModel(
                "linear model has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AiError::InvalidModel(
                "linear model parameters must be finite".to_string(),
            ));
        }
        check_names_width(self.feature_names.as_deref(), self.coefficients.len())
    }
}

impl SchemaProvider for LinearModel {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, AiError> {
        if row.len() != self.coefficients.len() {
            return Err(AiError::InferenceFailed(format!(
                "expected {} values, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        let dot: f64 = self.coefficients.iter().zip(row).map(|(c, x)| c * x).sum();
        Ok(self.intercept + dot)
    }
}
