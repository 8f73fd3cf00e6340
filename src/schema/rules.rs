//! Cross-field rules
//!
//! The fee-consistency rule is defined exactly once, here. The client
//! pre-check, the request handler fast-reject and the validator all call
//! into [`FEES_WITHIN_TOTAL`], so the three layers cannot drift apart.

use serde_json::{Map, Value};

/// Message reported when the fee-consistency rule fails
pub const FEES_EXCEEDED_MESSAGE: &str = "Fees paid cannot be more than total fees";

/// A rule comparing two numeric fields of the same record: `field <= bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossFieldRule {
    /// Field that must not exceed the bound
    pub field: &'static str,
    /// Field holding the bound
    pub bound: &'static str,
    /// Message on violation
    pub message: &'static str,
}

/// `feesPaid <= feesTotal`
pub const FEES_WITHIN_TOTAL: CrossFieldRule = CrossFieldRule {
    field: "feesPaid",
    bound: "feesTotal",
    message: FEES_EXCEEDED_MESSAGE,
};

impl CrossFieldRule {
    /// Compares two already-extracted values.
    pub fn check_values(&self, value: f64, bound: f64) -> Result<(), &'static str> {
        if value > bound {
            Err(self.message)
        } else {
            Ok(())
        }
    }

    /// Checks the rule against a field set.
    ///
    /// The rule only applies when both fields are present as JSON numbers;
    /// missing or mistyped fields are left to the per-field rules.
    pub fn check(&self, fields: &Map<String, Value>) -> Result<(), &'static str> {
        match (
            fields.get(self.field).and_then(Value::as_f64),
            fields.get(self.bound).and_then(Value::as_f64),
        ) {
            (Some(value), Some(bound)) => self.check_values(value, bound),
            _ => Ok(()),
        }
    }

    /// Whether the rule reads the given field
    pub fn involves(&self, field: &str) -> bool {
        self.field == field || self.bound == field
    }
}

/// Shorthand for the fee-consistency rule on plain numbers.
pub fn check_fees(fees_paid: f64, fees_total: f64) -> Result<(), &'static str> {
    FEES_WITHIN_TOTAL.check_values(fees_paid, fees_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_fees_equal_to_total_pass() {
        assert!(check_fees(1000.0, 1000.0).is_ok());
        assert!(check_fees(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_fees_over_total_fail() {
        assert_eq!(check_fees(1200.0, 1000.0), Err(FEES_EXCEEDED_MESSAGE));
    }

    #[test]
    fn test_check_skips_when_a_field_is_missing() {
        let doc = fields(json!({"feesPaid": 5000}));
        assert!(FEES_WITHIN_TOTAL.check(&doc).is_ok());
    }

    #[test]
    fn test_check_skips_non_numeric_values() {
        let doc = fields(json!({"feesPaid": "1200", "feesTotal": 1000}));
        assert!(FEES_WITHIN_TOTAL.check(&doc).is_ok());
    }

    #[test]
    fn test_check_on_field_set() {
        let doc = fields(json!({"feesPaid": 1200, "feesTotal": 1000}));
        assert_eq!(FEES_WITHIN_TOTAL.check(&doc), Err(FEES_EXCEEDED_MESSAGE));

        let doc = fields(json!({"feesPaid": 999.5, "feesTotal": 1000}));
        assert!(FEES_WITHIN_TOTAL.check(&doc).is_ok());
    }

    #[test]
    fn test_involves() {
        assert!(FEES_WITHIN_TOTAL.involves("feesPaid"));
        assert!(FEES_WITHIN_TOTAL.involves("feesTotal"));
        assert!(!FEES_WITHIN_TOTAL.involves("name"));
    }
}
