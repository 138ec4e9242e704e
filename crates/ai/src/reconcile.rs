//! Feature reconciliation.
//!
//! Maps a model's [`FeatureSpec`] plus the live [`UserInputs`] and the
//! historical [`DefaultTable`] onto exactly one [`FeatureRecord`].
//!
//! Each column is resolved by an ordered chain of [`FeatureResolver`]s; the
//! first one that answers wins. The chain always ends in [`CategoryFallback`],
//! which answers for every name, so reconciliation cannot fail.
//!
//! Standard precedence:
//! 1. [`UserInputResolver`]: the four user-controlled columns.
//! 2. [`DayOfWeekResolver`]: `day_of_week`, pinned to 0.
//! 3. [`DefaultTableResolver`]: present, non-NaN historical statistic.
//! 4. [`CategoryFallback`]: zero, typed by column category.

use serde::{Deserialize, Serialize};
use tracing::debug;

use wattcast_core::{
    DAY_OF_WEEK, DefaultTable, FeatureRecord, FeatureSpec, FeatureValue, HOUR, IS_WEEKEND, MONTH,
    SUB_METERING, SUB_METERING_3, UserInputs,
};

/// Which rule produced a value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    UserInput,
    DayOfWeek,
    DefaultTable,
    CategoryFallback,
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolutionTier::UserInput => "user input",
            ResolutionTier::DayOfWeek => "day of week",
            ResolutionTier::DefaultTable => "historical median",
            ResolutionTier::CategoryFallback => "fallback",
        };
        f.write_str(s)
    }
}

/// Everything a resolver may consult.
#[derive(Debug, Copy, Clone)]
pub struct ResolveContext<'a> {
    pub inputs: &'a UserInputs,
    pub defaults: &'a DefaultTable,
}

/// One step of the precedence chain.
pub trait FeatureResolver: Send + Sync {
    fn tier(&self) -> ResolutionTier;

    /// `None` passes the name on to the next resolver.
    fn resolve(&self, name: &str, ctx: &ResolveContext<'_>) -> Option<FeatureValue>;
}

/// Live user intent. The only path by which the form reaches the record.
#[derive(Debug, Default, Copy, Clone)]
pub struct UserInputResolver;

impl FeatureResolver for UserInputResolver {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::UserInput
    }

    fn resolve(&self, name: &str, ctx: &ResolveContext<'_>) -> Option<FeatureValue> {
        let inputs = ctx.inputs;
        let value = match name {
            HOUR => i64::from(inputs.hour()),
            MONTH => i64::from(inputs.month()),
            IS_WEEKEND => inputs.weekend_flag(),
            SUB_METERING_3 => i64::from(inputs.appliance_usage()),
            _ => return None,
        };
        Some(FeatureValue::Int(value))
    }
}

/// Pins `day_of_week` to 0 (Monday).
///
/// The day of week is not collected from the user and is not derived from the
/// chosen month either. This matches what the dashboard has always sent; it is
/// a known gap, left as-is so predictions stay comparable.
#[derive(Debug, Default, Copy, Clone)]
pub struct DayOfWeekResolver;

impl FeatureResolver for DayOfWeekResolver {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::DayOfWeek
    }

    fn resolve(&self, name: &str, _ctx: &ResolveContext<'_>) -> Option<FeatureValue> {
        if name != DAY_OF_WEEK {
            return None;
        }
        debug!("day_of_week is not collected; pinning to 0");
        Some(FeatureValue::Int(0))
    }
}

/// Historical statistic for the column, when one exists and is not NaN.
#[derive(Debug, Default, Copy, Clone)]
pub struct DefaultTableResolver;

impl FeatureResolver for DefaultTableResolver {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::DefaultTable
    }

    fn resolve(&self, name: &str, ctx: &ResolveContext<'_>) -> Option<FeatureValue> {
        ctx.defaults.get(name).map(FeatureValue::Float)
    }
}

/// Terminal rule: zero, typed by category.
#[derive(Debug, Default, Copy, Clone)]
pub struct CategoryFallback;

impl CategoryFallback {
    pub fn resolve(&self, name: &str) -> FeatureValue {
        if name.contains(SUB_METERING) {
            return FeatureValue::Float(0.0);
        }
        match name {
            HOUR | MONTH | DAY_OF_WEEK | IS_WEEKEND => FeatureValue::Int(0),
            _ => FeatureValue::Float(0.0),
        }
    }
}

/// A reconciled record plus the tier that produced each of its values.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedRecord {
    pub record: FeatureRecord,
    /// Parallel to `record.names()`.
    pub tiers: Vec<ResolutionTier>,
}

impl TracedRecord {
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue, ResolutionTier)> {
        self.record
            .iter()
            .zip(self.tiers.iter().copied())
            .map(|((name, value), tier)| (name, value, tier))
    }
}

/// Ordered resolver chain with a total fallback.
pub struct Reconciler {
    resolvers: Vec<Box<dyn FeatureResolver>>,
    fallback: CategoryFallback,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tiers: Vec<ResolutionTier> = self.resolvers.iter().map(|r| r.tier()).collect();
        f.debug_struct("Reconciler")
            .field("resolvers", &tiers)
            .finish()
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::standard()
    }
}

impl Reconciler {
    /// Custom chain. [`CategoryFallback`] is always appended.
    pub fn new(resolvers: Vec<Box<dyn FeatureResolver>>) -> Self {
        Self {
            resolvers,
            fallback: CategoryFallback,
        }
    }

    /// user input > day of week > historical median > category fallback.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(UserInputResolver),
            Box::new(DayOfWeekResolver),
            Box::new(DefaultTableResolver),
        ])
    }

    /// Resolve a single column.
    pub fn resolve_one(
        &self,
        name: &str,
        ctx: &ResolveContext<'_>,
    ) -> (FeatureValue, ResolutionTier) {
        for resolver in &self.resolvers {
            if let Some(value) = resolver.resolve(name, ctx) {
                return (value, resolver.tier());
            }
        }
        (self.fallback.resolve(name), ResolutionTier::CategoryFallback)
    }

    pub fn reconcile(
        &self,
        spec: &FeatureSpec,
        inputs: &UserInputs,
        defaults: &DefaultTable,
    ) -> FeatureRecord {
        self.reconcile_traced(spec, inputs, defaults).record
    }

    pub fn reconcile_traced(
        &self,
        spec: &FeatureSpec,
        inputs: &UserInputs,
        defaults: &DefaultTable,
    ) -> TracedRecord {
        let ctx = ResolveContext { inputs, defaults };
        let mut tiers = Vec::with_capacity(spec.len());

        let record = FeatureRecord::from_fn(spec, |name| {
            let (value, tier) = self.resolve_one(name, &ctx);
            tiers.push(tier);
            value
        });

        debug!(
            features = spec.len(),
            from_defaults = tiers
                .iter()
                .filter(|t| **t == ResolutionTier::DefaultTable)
                .count(),
            from_fallback = tiers
                .iter()
                .filter(|t| **t == ResolutionTier::CategoryFallback)
                .count(),
            "reconciled feature record"
        );

        TracedRecord { record, tiers }
    }
}

/// Reconcile with the standard chain.
pub fn reconcile(
    spec: &FeatureSpec,
    inputs: &UserInputs,
    defaults: &DefaultTable,
) -> FeatureRecord {
    Reconciler::standard().reconcile(spec, inputs, defaults)
}
