//! Plain-text and JSON presentation.

use std::fmt::Write as _;

use serde::Serialize;

use wattcast_ai::{Prediction, ResolutionTier};
use wattcast_core::{FeatureSpec, FeatureValue, SpecSource, UserInputs};
use wattcast_infra::HourlyProfile;

const BAR_WIDTH: usize = 40;

/// JSON shape of `wattcast predict --json`.
#[derive(Debug, Serialize)]
pub struct PredictionView<'a> {
    pub prediction_kw: f64,
    pub inputs: &'a UserInputs,
    pub spec_source: SpecSource,
    pub record: &'a wattcast_core::FeatureRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<FeatureSource<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<&'a HourlyProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeatureSource<'a> {
    pub feature: &'a str,
    pub value: FeatureValue,
    pub tier: ResolutionTier,
}

pub fn feature_sources(prediction: &Prediction) -> Vec<FeatureSource<'_>> {
    prediction
        .record
        .iter()
        .zip(prediction.tiers.iter().copied())
        .map(|((feature, value), tier)| FeatureSource {
            feature,
            value,
            tier,
        })
        .collect()
}

pub fn prediction_text(prediction: &Prediction, inputs: &UserInputs) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Predicted energy consumption: {:.3} kW",
        prediction.value
    );
    let _ = writeln!(
        out,
        "  hour {}, month {}, {}, appliance usage {}/30",
        inputs.hour(),
        inputs.month(),
        if inputs.is_weekend() { "weekend" } else { "weekday" },
        inputs.appliance_usage()
    );
    let _ = writeln!(
        out,
        "  {} features ({} schema)",
        prediction.record.len(),
        prediction.spec_source
    );
    out
}

/// Table of every feature, its value and which rule produced it.
pub fn explanation_text(prediction: &Prediction) -> String {
    let sources = feature_sources(prediction);
    let name_width = sources
        .iter()
        .map(|s| s.feature.len())
        .max()
        .unwrap_or(0)
        .max("feature".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<name_width$}  {:>12}  source", "feature", "value");
    for s in &sources {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>12}  {}",
            s.feature,
            s.value.to_string(),
            s.tier
        );
    }
    out
}

/// Horizontal bar chart of the mean per hour.
pub fn hourly_text(profile: &HourlyProfile) -> String {
    let max = profile.max_mean().unwrap_or(0.0);
    let mut out = String::new();
    let _ = writeln!(out, "Average {} by hour of day", profile.column);

    for point in &profile.points {
        match point.mean {
            Some(mean) => {
                let len = if max > 0.0 {
                    ((mean / max) * BAR_WIDTH as f64).round().max(0.0) as usize
                } else {
                    0
                };
                let _ = writeln!(
                    out,
                    "{:>2}  {:<BAR_WIDTH$}  {:.3}",
                    point.hour,
                    "#".repeat(len.min(BAR_WIDTH)),
                    mean
                );
            }
            None => {
                let _ = writeln!(out, "{:>2}  {:<BAR_WIDTH$}  -", point.hour, "");
            }
        }
    }
    out
}

pub fn schema_text(spec: &FeatureSpec, source: SpecSource) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} features ({} schema)", spec.len(), source);
    for (i, name) in spec.iter().enumerate() {
        let _ = writeln!(out, "{:>3}  {name}", i);
    }
    out
}
