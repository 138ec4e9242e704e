//! Fallback statistics keyed by feature name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Per-column fallback values, usually medians of a historical dataset.
///
/// Entries may be NaN (a column with no numeric samples). Use [`DefaultTable::get`]
/// to read only usable values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultTable {
    values: HashMap<String, f64>,
}

impl ValueObject for DefaultTable {}

impl DefaultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Present, non-NaN entry for `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().filter(|v| !v.is_nan())
    }

    /// Raw entry, NaN included.
    pub fn raw(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries sorted by name.
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for DefaultTable {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_entries_read_as_absent() {
        let table = DefaultTable::new().with("Voltage", f64::NAN).with("hour", 12.0);
        assert_eq!(table.get("Voltage"), None);
        assert!(table.raw("Voltage").is_some_and(f64::is_nan));
        assert_eq!(table.get("hour"), Some(12.0));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn sorted_is_by_name() {
        let table: DefaultTable = [("b", 2.0), ("a", 1.0)].into_iter().collect();
        assert_eq!(table.sorted(), vec![("a", 1.0), ("b", 2.0)]);
    }
}
