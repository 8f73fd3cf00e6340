//! Form conversion and pre-check
//!
//! Form inputs arrive as strings. Amounts are converted to numbers the way
//! the browser does it: an empty amount is zero, an unparseable `feesPaid`
//! falls back to zero, a missing or unparseable `feesTotal` is sent as
//! `null` and left for the server to reject.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::schema::check_fees;

/// Shown before any request is issued
pub const FEES_PRECHECK_MESSAGE: &str = "Fees paid cannot be more than total fees!";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{}", FEES_PRECHECK_MESSAGE)]
    FeesExceeded,

    #[error("Form must be a JSON object")]
    NotAnObject,
}

/// Converts a submitted student form into a request body.
///
/// # Errors
///
/// `FeesExceeded` when the converted amounts break the fee rule; no request
/// should be sent.
pub fn prepare_student(form: &Value) -> Result<Value, ClientError> {
    let mut body: Map<String, Value> = form.as_object().cloned().ok_or(ClientError::NotAnObject)?;

    let paid = body
        .get("feesPaid")
        .and_then(to_number)
        .unwrap_or(0.0);
    let total = body.get("feesTotal").and_then(to_number);

    body.insert("feesPaid".to_string(), number_value(paid));
    body.insert(
        "feesTotal".to_string(),
        total.map_or(Value::Null, number_value),
    );

    if let Some(total) = total {
        check_fees(paid, total).map_err(|_| ClientError::FeesExceeded)?;
    }
    Ok(Value::Object(body))
}

/// Numeric reading of a form value. Blank text reads as zero.
fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Null => Some(0.0),
        _ => None,
    }
}

/// Whole amounts are sent as integers.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}
