//! The loaded state a prediction runs against.

use tracing::info;

use wattcast_ai::{
    AiJob, ModelArtifact, Prediction, PredictionError, PredictionJob, resolve_feature_spec,
};
use wattcast_core::{DefaultTable, FeatureSpec, SpecSource, UserInputs};

use crate::artifact::load_model;
use crate::config::AppConfig;
use crate::error::{InfraError, ProfileError};
use crate::history::{HistoricalDataset, HourlyProfile};

/// Model, schema, history and derived defaults, built once per process.
///
/// Nothing here changes after [`PredictionContext::load`]; handlers borrow it.
#[derive(Debug, Clone)]
pub struct PredictionContext {
    model: ModelArtifact,
    spec: FeatureSpec,
    spec_source: SpecSource,
    dataset: Option<HistoricalDataset>,
    defaults: DefaultTable,
}

impl PredictionContext {
    /// Load the model (required) and the dataset (optional).
    pub fn load(config: &AppConfig) -> Result<Self, InfraError> {
        let model = load_model(&config.model_path)?;
        let dataset = HistoricalDataset::load_optional(&config.history_path)?;
        Self::from_parts(model, dataset).map_err(|source| InfraError::ModelMalformed {
            path: config.model_path.clone(),
            source,
        })
    }

    /// Assemble a context from already-loaded parts.
    pub fn from_parts(
        model: ModelArtifact,
        dataset: Option<HistoricalDataset>,
    ) -> Result<Self, wattcast_ai::AiError> {
        let (spec, spec_source) = resolve_feature_spec(&model)?;
        let defaults = dataset
            .as_ref()
            .map(HistoricalDataset::default_table)
            .unwrap_or_default();

        info!(
            features = spec.len(),
            spec_source = %spec_source,
            defaults = defaults.len(),
            "prediction context ready"
        );

        Ok(Self {
            model,
            spec,
            spec_source,
            dataset,
            defaults,
        })
    }

    pub fn model(&self) -> &ModelArtifact {
        &self.model
    }

    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    pub fn spec_source(&self) -> SpecSource {
        self.spec_source
    }

    pub fn defaults(&self) -> &DefaultTable {
        &self.defaults
    }

    pub fn dataset(&self) -> Option<&HistoricalDataset> {
        self.dataset.as_ref()
    }

    pub fn predict(&self, inputs: UserInputs) -> Result<Prediction, PredictionError> {
        PredictionJob::new(
            &self.model,
            &self.spec,
            self.spec_source,
            inputs,
            &self.defaults,
        )
        .run()
    }

    pub fn hourly_profile(&self) -> Result<HourlyProfile, ProfileError> {
        self.dataset
            .as_ref()
            .ok_or(ProfileError::NoDataset)?
            .hourly_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use wattcast_core::FeatureValue;

    const HISTORY: &str = "DateTime,Global_active_power,Global_reactive_power,Voltage,Sub_metering_3\n\
        2007-01-01 18:00:00,2.0,0.10,240.0,17\n\
        2007-01-01 19:00:00,3.0,0.12,240.5,18\n\
        2007-01-01 20:00:00,2.5,0.20,241.0,1\n";

    fn write_fixture(dir: &std::path::Path, model: &str, history: Option<&str>) -> AppConfig {
        let config = AppConfig::default()
            .with_model_path(dir.join("energy_model.json"))
            .with_history_path(dir.join("hourly_data.csv"));
        fs::write(&config.model_path, model).unwrap();
        if let Some(history) = history {
            fs::write(&config.history_path, history).unwrap();
        }
        config
    }

    #[test]
    fn loads_model_and_history_and_predicts() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(
            dir.path(),
            r#"{"kind":"linear","intercept":0.0,"coefficients":[0,0,0.1,0,0,0,0]}"#,
            Some(HISTORY),
        );

        let ctx = PredictionContext::load(&config).unwrap();
        assert_eq!(ctx.spec_source(), SpecSource::Fallback);
        assert_eq!(ctx.defaults().get("Voltage"), Some(240.5));

        let inputs = UserInputs::new(19, 1, false, 10).unwrap();
        let prediction = ctx.predict(inputs).unwrap();
        assert!((prediction.value - 1.0).abs() < 1e-12);
        assert_eq!(
            prediction.record.get("Global_reactive_power"),
            Some(FeatureValue::Float(0.12))
        );
        assert_eq!(prediction.record.get("Sub_metering_3"), Some(FeatureValue::Int(10)));

        let profile = ctx.hourly_profile().unwrap();
        assert_eq!(profile.points[19].mean, Some(3.0));
    }

    #[test]
    fn missing_history_degrades_to_empty_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(
            dir.path(),
            r#"{"kind":"linear","intercept":1.0,"coefficients":[1,1,0,0,0,0,0]}"#,
            None,
        );

        let ctx = PredictionContext::load(&config).unwrap();
        assert!(ctx.defaults().is_empty());
        assert!(ctx.dataset().is_none());
        assert_eq!(ctx.hourly_profile(), Err(ProfileError::NoDataset));

        let prediction = ctx.predict(UserInputs::default()).unwrap();
        assert_eq!(prediction.value, 1.0);
    }

    #[test]
    fn model_schema_is_authoritative() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(
            dir.path(),
            r#"{"kind":"linear","intercept":0.0,"coefficients":[1.0,1.0],"feature_names":["Voltage","Humidity_Index"]}"#,
            Some(HISTORY),
        );

        let ctx = PredictionContext::load(&config).unwrap();
        assert_eq!(ctx.spec_source(), SpecSource::Model);
        let prediction = ctx.predict(UserInputs::default()).unwrap();
        assert_eq!(prediction.value, 240.5);
        assert_eq!(prediction.record.get("Humidity_Index"), Some(FeatureValue::Float(0.0)));
    }

    #[test]
    fn missing_model_halts() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default().with_model_path(dir.path().join("nope.json"));
        assert!(matches!(
            PredictionContext::load(&config),
            Err(InfraError::ModelMissing { .. })
        ));
    }

    #[test]
    fn duplicate_reported_names_halt_with_model_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(
            dir.path(),
            r#"{"kind":"linear","intercept":0.0,"coefficients":[1.0,1.0],"feature_names":["hour","hour"]}"#,
            None,
        );
        let err = PredictionContext::load(&config).unwrap_err();
        assert!(matches!(err, InfraError::ModelMalformed { .. }));
    }
}
