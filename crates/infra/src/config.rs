//! Runtime configuration.
//!
//! Defaults match the file names the dashboard has always used, relative to the
//! working directory. Each field can be overridden from the environment; the
//! CLI layers its own flags on top.

use std::path::PathBuf;

use wattcast_observability::LogFormat;

use crate::error::InfraError;

pub const MODEL_PATH_ENV: &str = "WATTCAST_MODEL_PATH";
pub const HISTORY_PATH_ENV: &str = "WATTCAST_HISTORY_PATH";
pub const LOG_FORMAT_ENV: &str = "WATTCAST_LOG_FORMAT";

pub const DEFAULT_MODEL_PATH: &str = "energy_model.json";
pub const DEFAULT_HISTORY_PATH: &str = "hourly_data.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub history_path: PathBuf,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, InfraError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfraError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(MODEL_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(HISTORY_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            config.history_path = PathBuf::from(path);
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.log_format = format.parse().map_err(|_| {
                InfraError::Config(format!(
                    "{LOG_FORMAT_ENV} must be `text` or `json`, got `{format}`"
                ))
            })?;
        }

        Ok(config)
    }

    /// Model and dataset point at the same file, which is never what the
    /// caller meant. Checked after all overrides are applied.
    pub fn paths_collide(&self) -> bool {
        self.model_path == self.history_path
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model_path, PathBuf::from("energy_model.json"));
        assert_eq!(config.history_path, PathBuf::from("hourly_data.csv"));
    }

    #[test]
    fn environment_overrides_paths_and_format() {
        let config = AppConfig::from_lookup(lookup(&[
            (MODEL_PATH_ENV, "/models/rf.json"),
            (HISTORY_PATH_ENV, "/data/h.csv"),
            (LOG_FORMAT_ENV, "json"),
        ]))
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/models/rf.json"));
        assert_eq!(config.history_path, PathBuf::from("/data/h.csv"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_paths_are_ignored_and_bad_format_is_rejected() {
        let config = AppConfig::from_lookup(lookup(&[(MODEL_PATH_ENV, "  ")])).unwrap();
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));

        let err = AppConfig::from_lookup(lookup(&[(LOG_FORMAT_ENV, "xml")])).unwrap_err();
        assert!(matches!(err, InfraError::Config(_)));
    }

    #[test]
    fn detects_model_and_dataset_on_the_same_file() {
        let config = AppConfig::from_lookup(lookup(&[(HISTORY_PATH_ENV, "energy_model.json")]))
            .unwrap();
        assert!(config.paths_collide());

        let config = config.with_history_path("hourly_data.csv");
        assert!(!config.paths_collide());
    }
}
