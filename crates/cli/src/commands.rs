//! Subcommand handlers. Each returns the text to print on stdout.

use anyhow::{Context, Result};
use tracing::warn;

use wattcast_core::UserInputs;
use wattcast_infra::{AppConfig, HistoricalDataset, PredictionContext};

use crate::render::{self, PredictionView};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PredictOptions {
    pub explain: bool,
    pub chart: bool,
    pub json: bool,
}

/// Predict consumption for one set of inputs.
///
/// Warnings about the hourly chart go to `warnings` and never fail the command.
pub fn predict(
    ctx: &PredictionContext,
    inputs: UserInputs,
    opts: PredictOptions,
    warnings: &mut Vec<String>,
) -> Result<String> {
    let prediction = ctx
        .predict(inputs)
        .context("prediction failed (check that the model was trained on these features)")?;

    let mut hourly_error = None;
    let hourly = if opts.chart {
        match ctx.hourly_profile() {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "hourly chart unavailable");
                warnings.push(format!("hourly chart unavailable: {e}"));
                hourly_error = Some(e.to_string());
                None
            }
        }
    } else {
        None
    };

    if opts.json {
        let view = PredictionView {
            prediction_kw: prediction.value,
            inputs: &inputs,
            spec_source: prediction.spec_source,
            record: &prediction.record,
            sources: opts.explain.then(|| render::feature_sources(&prediction)),
            hourly: hourly.as_ref(),
            hourly_error,
        };
        let mut json = serde_json::to_string_pretty(&view)?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = render::prediction_text(&prediction, &inputs);
    if opts.explain {
        out.push('\n');
        out.push_str(&render::explanation_text(&prediction));
    }
    if let Some(profile) = &hourly {
        out.push('\n');
        out.push_str(&render::hourly_text(profile));
    }
    Ok(out)
}

/// Hourly profile only; needs the dataset but not the model.
pub fn hourly(config: &AppConfig, json: bool) -> Result<String> {
    let dataset = HistoricalDataset::load_optional(&config.history_path)?.with_context(|| {
        format!(
            "historical dataset `{}` not found",
            config.history_path.display()
        )
    })?;
    let profile = dataset
        .hourly_profile()
        .with_context(|| format!("cannot chart `{}`", config.history_path.display()))?;

    if json {
        let mut out = serde_json::to_string_pretty(&profile)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(render::hourly_text(&profile))
    }
}

/// The effective feature schema and the medians that would fill it.
pub fn schema(ctx: &PredictionContext, json: bool) -> Result<String> {
    if json {
        let defaults: serde_json::Map<String, serde_json::Value> = ctx
            .defaults()
            .sorted()
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
            .collect();
        let view = serde_json::json!({
            "model_kind": ctx.model().kind(),
            "spec_source": ctx.spec_source(),
            "features": ctx.spec(),
            "defaults": defaults,
        });
        let mut out = serde_json::to_string_pretty(&view)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = format!("{} model\n", ctx.model().kind());
    out.push_str(&render::schema_text(ctx.spec(), ctx.spec_source()));
    if ctx.defaults().is_empty() {
        out.push_str("\nno historical medians (dataset missing)\n");
    } else {
        out.push_str("\nhistorical medians:\n");
        for (name, value) in ctx.defaults().sorted() {
            if value.is_nan() {
                out.push_str(&format!("  {name}: (no samples)\n"));
            } else {
                out.push_str(&format!("  {name}: {value}\n"));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MODEL: &str = r#"{"kind":"forest","n_features":7,"trees":[
        {"nodes":[{"split":{"feature":3,"threshold":17.5,"left":1,"right":2}},{"leaf":{"value":0.5}},{"leaf":{"value":2.0}}]},
        {"nodes":[{"split":{"feature":2,"threshold":5.0,"left":1,"right":2}},{"leaf":{"value":1.0}},{"leaf":{"value":3.0}}]}
    ]}"#;

    const HISTORY: &str = "DateTime,Global_active_power,Voltage\n\
        2007-01-01 00:00:00,1.0,240.0\n\
        2007-01-01 01:00:00,2.0,241.0\n";

    fn setup(history: Option<&str>) -> (tempfile::TempDir, AppConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default()
            .with_model_path(dir.path().join("energy_model.json"))
            .with_history_path(dir.path().join("hourly_data.csv"));
        fs::write(&config.model_path, MODEL).unwrap();
        if let Some(h) = history {
            fs::write(&config.history_path, h).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn predict_text_with_explanation_and_chart() {
        let (_dir, config) = setup(Some(HISTORY));
        let ctx = PredictionContext::load(&config).unwrap();
        let mut warnings = Vec::new();

        let out = predict(
            &ctx,
            UserInputs::default(),
            PredictOptions {
                explain: true,
                chart: true,
                json: false,
            },
            &mut warnings,
        )
        .unwrap();

        // hour 19 -> 2.0, usage 10 -> 3.0
        assert!(out.starts_with("Predicted energy consumption: 2.500 kW"));
        assert!(out.contains("historical median"));
        assert!(out.contains("Average Global_active_power by hour of day"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn chart_failure_is_a_warning_not_an_error() {
        let (_dir, config) = setup(None);
        let ctx = PredictionContext::load(&config).unwrap();
        let mut warnings = Vec::new();

        let out = predict(
            &ctx,
            UserInputs::default(),
            PredictOptions {
                chart: true,
                ..PredictOptions::default()
            },
            &mut warnings,
        )
        .unwrap();

        assert!(out.contains("2.500 kW"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("no historical dataset"));
    }

    #[test]
    fn predict_json_is_parseable() {
        let (_dir, config) = setup(Some(HISTORY));
        let ctx = PredictionContext::load(&config).unwrap();
        let out = predict(
            &ctx,
            UserInputs::default(),
            PredictOptions {
                json: true,
                explain: true,
                ..PredictOptions::default()
            },
            &mut Vec::new(),
        )
        .unwrap();

        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["prediction_kw"], 2.5);
        assert_eq!(v["record"]["Voltage"], 240.5);
        assert_eq!(v["sources"][1]["tier"], "default_table");
        let keys: Vec<&String> = v["record"].as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "Global_reactive_power");
        assert_eq!(keys[6], "is_weekend");
    }

    #[test]
    fn hourly_requires_dataset() {
        let (_dir, config) = setup(None);
        let err = hourly(&config, false).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn hourly_json_has_24_points() {
        let (_dir, config) = setup(Some(HISTORY));
        let v: serde_json::Value = serde_json::from_str(&hourly(&config, true).unwrap()).unwrap();
        assert_eq!(v["points"].as_array().unwrap().len(), 24);
        assert_eq!(v["points"][1]["mean"], 2.0);
    }

    #[test]
    fn schema_lists_fallback_features_and_medians() {
        let (_dir, config) = setup(Some(HISTORY));
        let ctx = PredictionContext::load(&config).unwrap();
        let out = schema(&ctx, false).unwrap();
        assert!(out.starts_with("forest model\n7 features (fallback schema)"));
        assert!(out.contains("  Voltage: 240.5"));

        let v: serde_json::Value = serde_json::from_str(&schema(&ctx, true).unwrap()).unwrap();
        assert_eq!(v["model_kind"], "forest");
        assert_eq!(v["spec_source"], "fallback");
        assert_eq!(v["features"].as_array().unwrap().len(), 7);
    }
}
