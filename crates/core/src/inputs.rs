//! Live user inputs collected by the front end.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Highest accepted appliance usage level.
pub const MAX_APPLIANCE_USAGE: u8 = 30;

/// The four values a user can set directly.
///
/// Everything else a model needs is filled in from historical statistics or
/// fallbacks by the reconciler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUserInputs")]
pub struct UserInputs {
    hour: u8,
    month: u8,
    is_weekend: bool,
    appliance_usage: u8,
}

impl ValueObject for UserInputs {}

impl UserInputs {
    pub fn new(hour: u8, month: u8, is_weekend: bool, appliance_usage: u8) -> DomainResult<Self> {
        if hour > 23 {
            return Err(DomainError::validation(format!(
                "hour must be in 0..=23, got {hour}"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        if appliance_usage > MAX_APPLIANCE_USAGE {
            return Err(DomainError::validation(format!(
                "appliance usage must be in 0..={MAX_APPLIANCE_USAGE}, got {appliance_usage}"
            )));
        }

        Ok(Self {
            hour,
            month,
            is_weekend,
            appliance_usage,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn is_weekend(&self) -> bool {
        self.is_weekend
    }

    /// Weekend flag as the 0/1 integer models are trained on.
    pub fn weekend_flag(&self) -> i64 {
        i64::from(self.is_weekend)
    }

    pub fn appliance_usage(&self) -> u8 {
        self.appliance_usage
    }
}

#[derive(Deserialize)]
struct RawUserInputs {
    hour: u8,
    month: u8,
    is_weekend: bool,
    appliance_usage: u8,
}

impl TryFrom<RawUserInputs> for UserInputs {
    type Error = DomainError;

    fn try_from(raw: RawUserInputs) -> Result<Self, Self::Error> {
        Self::new(raw.hour, raw.month, raw.is_weekend, raw.appliance_usage)
    }
}

impl Default for UserInputs {
    /// Evening hour in January on a weekday, moderate appliance load.
    fn default() -> Self {
        Self {
            hour: 19,
            month: 1,
            is_weekend: false,
            appliance_usage: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(UserInputs::new(0, 1, false, 0).is_ok());
        assert!(UserInputs::new(23, 12, true, 30).is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(UserInputs::new(24, 1, false, 0).is_err());
        assert!(UserInputs::new(0, 0, false, 0).is_err());
        assert!(UserInputs::new(0, 13, false, 0).is_err());
        assert!(UserInputs::new(0, 1, false, 31).is_err());
    }

    #[test]
    fn weekend_flag_is_zero_or_one() {
        assert_eq!(UserInputs::new(5, 5, true, 5).unwrap().weekend_flag(), 1);
        assert_eq!(UserInputs::new(5, 5, false, 5).unwrap().weekend_flag(), 0);
    }

    #[test]
    fn deserializing_applies_the_same_range_checks() {
        let ok: UserInputs = serde_json::from_str(
            r#"{"hour":7,"month":12,"is_weekend":true,"appliance_usage":25}"#,
        )
        .unwrap();
        assert_eq!(ok, UserInputs::new(7, 12, true, 25).unwrap());

        for json in [
            r#"{"hour":99,"month":1,"is_weekend":false,"appliance_usage":10}"#,
            r#"{"hour":7,"month":0,"is_weekend":false,"appliance_usage":10}"#,
            r#"{"hour":7,"month":1,"is_weekend":false,"appliance_usage":200}"#,
        ] {
            let err = serde_json::from_str::<UserInputs>(json).unwrap_err();
            assert!(err.to_string().contains("must be in"), "{err}");
        }
    }

    #[test]
    fn serialized_inputs_read_back() {
        let inputs = UserInputs::new(23, 6, false, 30).unwrap();
        let json = serde_json::to_string(&inputs).unwrap();
        assert_eq!(serde_json::from_str::<UserInputs>(&json).unwrap(), inputs);
    }

    #[test]
    fn default_matches_form_defaults() {
        let d = UserInputs::default();
        assert_eq!((d.hour(), d.month(), d.is_weekend(), d.appliance_usage()), (19, 1, false, 10));
    }
}
