use tracing::{info, warn};

use wattcast_core::{DefaultTable, FeatureSpec, SpecSource, UserInputs};

use crate::model::Model;
use crate::reconcile::Reconciler;
use crate::result::{Prediction, PredictionError};

/// A single synchronous inference unit.
///
/// Jobs receive every input up front; they never load files or hold state.
pub trait AiJob {
    /// Execute inference. Must not mutate its inputs.
    fn run(&self) -> Result<Prediction, PredictionError>;
}

/// Reconcile user inputs against a model's schema and score the result.
pub struct PredictionJob<'a, M: Model + ?Sized> {
    model: &'a M,
    spec: &'a FeatureSpec,
    spec_source: SpecSource,
    inputs: UserInputs,
    defaults: &'a DefaultTable,
    reconciler: Reconciler,
}

impl<'a, M: Model + ?Sized> PredictionJob<'a, M> {
    pub fn new(
        model: &'a M,
        spec: &'a FeatureSpec,
        spec_source: SpecSource,
        inputs: UserInputs,
        defaults: &'a DefaultTable,
    ) -> Self {
        Self {
            model,
            spec,
            spec_source,
            inputs,
            defaults,
            reconciler: Reconciler::standard(),
        }
    }

    pub fn with_reconciler(mut self, reconciler: Reconciler) -> Self {
        self.reconciler = reconciler;
        self
    }
}

impl<M: Model + ?Sized> AiJob for PredictionJob<'_, M> {
    fn run(&self) -> Result<Prediction, PredictionError> {
        let traced = self
            .reconciler
            .reconcile_traced(self.spec, &self.inputs, self.defaults);

        match self.model.predict(&traced.record) {
            Ok(value) => {
                info!(
                    prediction = value,
                    features = self.spec.len(),
                    spec_source = %self.spec_source,
                    "prediction complete"
                );
                Ok(Prediction {
                    value,
                    record: traced.record,
                    tiers: traced.tiers,
                    spec_source: self.spec_source,
                })
            }
            Err(source) => {
                warn!(
                    error = %source,
                    expected = %self.spec,
                    record = %traced.record,
                    "prediction failed"
                );
                Err(PredictionError {
                    source,
                    expected: self.spec.clone(),
                    record: traced.record,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearModel, resolve_feature_spec};
    use crate::reconcile::{ResolutionTier, UserInputResolver};
    use crate::result::AiError;
    use wattcast_core::FeatureValue;

    #[test]
    fn runs_fallback_spec_through_linear_model() {
        // Only hour and Sub_metering_3 carry weight.
        let model = LinearModel::new(0.5, vec![0.0, 0.0, 0.1, 0.05, 0.0, 0.0, 0.0]);
        let (spec, source) = resolve_feature_spec(&model).unwrap();
        let defaults = DefaultTable::new().with("Voltage", 240.5);
        let inputs = UserInputs::new(19, 1, false, 10).unwrap();

        let prediction = PredictionJob::new(&model, &spec, source, inputs, &defaults)
            .run()
            .unwrap();

        assert!((prediction.value - 2.45).abs() < 1e-9);
        assert_eq!(prediction.spec_source, SpecSource::Fallback);
        assert_eq!(prediction.record.get("Voltage"), Some(FeatureValue::Float(240.5)));
        assert_eq!(prediction.tiers[1], ResolutionTier::DefaultTable);
    }

    #[test]
    fn failure_carries_schema_and_record() {
        let model = LinearModel::new(0.0, vec![1.0, 1.0]);
        let spec = FeatureSpec::new(["hour", "month", "Voltage"]).unwrap();
        let defaults = DefaultTable::new();

        let err = PredictionJob::new(
            &model,
            &spec,
            SpecSource::Model,
            UserInputs::default(),
            &defaults,
        )
        .run()
        .unwrap_err();

        assert!(matches!(err.source, AiError::SchemaMismatch(_)));
        assert_eq!(err.expected, spec);
        assert_eq!(err.record.get("hour"), Some(FeatureValue::Int(19)));

        let message = err.to_string();
        assert!(message.contains("expected features: [hour, month, Voltage]"));
        assert!(message.contains("constructed record: {hour: 19, month: 1, Voltage: 0.0}"));
    }

    #[test]
    fn custom_chain_skips_historical_medians() {
        let model = LinearModel::new(0.0, vec![1.0, 1.0]);
        let spec = FeatureSpec::new(["Voltage", "hour"]).unwrap();
        let defaults = DefaultTable::new().with("Voltage", 240.5);
        let inputs = UserInputs::new(7, 3, false, 0).unwrap();

        let prediction = PredictionJob::new(&model, &spec, SpecSource::Model, inputs, &defaults)
            .with_reconciler(Reconciler::new(vec![Box::new(UserInputResolver)]))
            .run()
            .unwrap();

        assert_eq!(prediction.record.get("Voltage"), Some(FeatureValue::Float(0.0)));
        assert_eq!(
            prediction.tiers,
            vec![ResolutionTier::CategoryFallback, ResolutionTier::UserInput]
        );
        assert!((prediction.value - 7.0).abs() < 1e-9);
    }
}
