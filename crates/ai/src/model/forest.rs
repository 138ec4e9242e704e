//! Regression forest: the mean of independent regression trees.
//!
//! Trees are stored as flat node arrays rooted at index 0. A split sends a row
//! left when `row[feature] <= threshold`, right otherwise. Children always
//! sit at a higher index than their parent, which keeps traversal acyclic.

use serde::{Deserialize, Serialize};

use crate::model::{Regressor, SchemaProvider, check_names_width};
use crate::result::AiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {i} splits on feature {feature} but the model has {n_features}"
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {i} has a NaN threshold"));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {i} has invalid child index {child}"));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {i} has a non-finite value"));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> Result<f64, AiError> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).copied().ok_or_else(|| {
                        AiError::InferenceFailed(format!("row has no column {feature}"))
                    })?;
                    idx = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(AiError::InferenceFailed(format!(
                        "tree traversal reached missing node {idx}"
                    )));
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<Tree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl ForestModel {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.n_features == 0 {
            return Err(AiError::InvalidModel("forest has zero features".to_string()));
        }
        if self.trees.is_empty() {
            return Err(AiError::InvalidModel("forest has no trees".to_string()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| AiError::InvalidModel(format!("tree {t}: {e}")))?;
        }
        check_names_width(self.feature_names.as_deref(), self.n_features)
    }
}

impl SchemaProvider for ForestModel {
    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

impl Regressor for ForestModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64, AiError> {
        if self.trees.is_empty() {
            return Err(AiError::InferenceFailed("forest has no trees".to_string()));
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(row)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}
