//! `wattcast-core`: value types shared by the reconciler and its collaborators.
//!
//! This crate contains **pure** data types (no I/O, no model code).

pub mod defaults;
pub mod error;
pub mod feature;
pub mod inputs;
pub mod value_object;

pub use defaults::DefaultTable;
pub use error::{DomainError, DomainResult};
pub use feature::{
    DAY_OF_WEEK, FeatureRecord, FeatureSpec, FeatureValue, HOUR, IS_WEEKEND, MONTH, SUB_METERING,
    SUB_METERING_3, SpecSource,
};
pub use inputs::UserInputs;
pub use value_object::ValueObject;
