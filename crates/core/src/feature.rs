//! Feature schema and reconciled feature rows.
//!
//! A [`FeatureSpec`] is the ordered list of columns a model consumes. A
//! [`FeatureRecord`] is one row of values for exactly those columns, in exactly
//! that order (regressors are column-order sensitive).

use std::collections::HashSet;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Hour-of-day column (0–23).
pub const HOUR: &str = "hour";
/// Calendar month column (1–12).
pub const MONTH: &str = "month";
/// Day-of-week column (0 = Monday).
pub const DAY_OF_WEEK: &str = "day_of_week";
/// Weekend flag column (0/1).
pub const IS_WEEKEND: &str = "is_weekend";
/// Sub-metering circuit carrying the high-power appliances (water heater, AC).
pub const SUB_METERING_3: &str = "Sub_metering_3";
/// Substring shared by every sub-metering column.
pub const SUB_METERING: &str = "Sub_metering";

/// Columns used when the model does not report its own schema.
const FALLBACK_FEATURES: [&str; 7] = [
    "Global_reactive_power",
    "Voltage",
    SUB_METERING_3,
    HOUR,
    DAY_OF_WEEK,
    MONTH,
    IS_WEEKEND,
];

/// Where a [`FeatureSpec`] came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecSource {
    /// Reported by the model artifact.
    Model,
    /// Hard-coded fallback list.
    Fallback,
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecSource::Model => f.write_str("model"),
            SpecSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// Ordered, unique, non-empty list of feature names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSpec {
    names: Vec<String>,
}

impl ValueObject for FeatureSpec {}

impl FeatureSpec {
    pub fn new<I, S>(names: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(DomainError::validation("feature spec must not be empty"));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.trim().is_empty() {
                return Err(DomainError::validation("feature names must not be blank"));
            }
            if !seen.insert(name.as_str()) {
                return Err(DomainError::validation(format!(
                    "duplicate feature name in spec: {name}"
                )));
            }
        }

        Ok(Self { names })
    }

    /// The seven-column spec the bundled training notebook produced.
    pub fn fallback() -> Self {
        Self {
            names: FALLBACK_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for FeatureSpec {
    type Error = DomainError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureSpec> for Vec<String> {
    fn from(value: FeatureSpec) -> Self {
        value.names
    }
}

impl fmt::Display for FeatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names.join(", "))
    }
}

/// A single resolved feature value.
///
/// User inputs and the semantic calendar fallbacks are integers; statistics and
/// generic fallbacks are floats.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl ValueObject for FeatureValue {}

impl FeatureValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Int(v) => v as f64,
            FeatureValue::Float(v) => v,
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Int(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Float(value)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            // Debug keeps the trailing `.0` so floats read as floats.
            FeatureValue::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// One row of feature values, keyed and ordered by a [`FeatureSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    names: Vec<String>,
    values: Vec<FeatureValue>,
}

impl ValueObject for FeatureRecord {}

impl FeatureRecord {
    /// Pair `values` positionally with the names of `spec`.
    pub fn new(spec: &FeatureSpec, values: Vec<FeatureValue>) -> DomainResult<Self> {
        if values.len() != spec.len() {
            return Err(DomainError::invariant(format!(
                "record has {} values but spec has {} features",
                values.len(),
                spec.len()
            )));
        }

        Ok(Self {
            names: spec.names().to_vec(),
            values,
        })
    }

    /// Build a record by resolving every name of `spec` in order.
    ///
    /// Total by construction: the result always has exactly the spec's columns.
    pub fn from_fn<F>(spec: &FeatureSpec, mut resolve: F) -> Self
    where
        F: FnMut(&str) -> FeatureValue,
    {
        let values = spec.iter().map(&mut resolve).collect();
        Self {
            names: spec.names().to_vec(),
            values,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Numeric row in column order, as regressors consume it.
    pub fn to_row(&self) -> Vec<f64> {
        self.values.iter().map(FeatureValue::as_f64).collect()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}
