//! Schema validator
//!
//! Validation semantics:
//! - Undeclared fields are dropped, never stored
//! - Values are cast to the declared type (numeric strings to numbers,
//!   numbers and booleans to text); uncastable values are violations
//! - Trim and lowercase run before any constraint
//! - Required fields must be present, non-null and non-empty
//! - Defaults apply only when a record is created
//! - Cross-field rules run last, and only over fields that passed
//!
//! The validator never touches storage: uniqueness is the store's job.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use super::errors::{SchemaError, SchemaResult, Violation};
use super::types::{Constraint, DefaultValue, FieldRule, FieldType, Schema};

/// Whether the candidate is a new record or a merged update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Evaluates a schema's rule table against candidate field sets.
///
/// Validator does not mutate its input; it returns the normalized document.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates a candidate field set.
    ///
    /// # Errors
    ///
    /// - `NotAnObject` if the candidate is not a JSON object
    /// - `ValidationFailed` with every violation, in rule-table order
    pub fn validate(&self, candidate: &Value, mode: Mode) -> SchemaResult<Map<String, Value>> {
        self.validate_at(candidate, mode, Utc::now())
    }

    /// Same as [`validate`](Self::validate) with an explicit clock for
    /// time-based defaults.
    pub fn validate_at(
        &self,
        candidate: &Value,
        mode: Mode,
        now: DateTime<Utc>,
    ) -> SchemaResult<Map<String, Value>> {
        let obj = candidate
            .as_object()
            .ok_or_else(|| SchemaError::NotAnObject(json_type_name(candidate)))?;

        let mut normalized = Map::new();
        let mut violations = Vec::new();

        for rule in &self.schema.fields {
            match check_field(rule, obj.get(&rule.name), mode, now) {
                Ok(Some(value)) => {
                    normalized.insert(rule.name.clone(), value);
                }
                Ok(None) => {}
                Err(violation) => violations.push(violation),
            }
        }

        for rule in &self.schema.cross_field {
            if violations.iter().any(|v| rule.involves(&v.field)) {
                continue;
            }
            if let Err(message) = rule.check(&normalized) {
                violations.push(Violation::new(rule.field, message));
            }
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(SchemaError::ValidationFailed(violations))
        }
    }
}

/// Checks one field. `Ok(None)` means the field is absent from the result.
fn check_field(
    rule: &FieldRule,
    raw: Option<&Value>,
    mode: Mode,
    now: DateTime<Utc>,
) -> Result<Option<Value>, Violation> {
    let value = match raw.filter(|v| !v.is_null()) {
        Some(raw) => cast_value(rule, raw)?,
        None => None,
    };

    let value = match value {
        Some(value) => value,
        None => {
            if let Some(message) = &rule.required {
                return Err(Violation::new(rule.name.clone(), message.clone()));
            }
            return Ok(match (mode, &rule.default) {
                (Mode::Create, Some(default)) => Some(resolve_default(default, now)),
                _ => None,
            });
        }
    };

    for constraint in &rule.constraints {
        check_constraint(rule, constraint, &value)?;
    }

    Ok(Some(value))
}

/// Casts a raw value to the field's type. Empty input casts to `None`.
fn cast_value(rule: &FieldRule, raw: &Value) -> Result<Option<Value>, Violation> {
    match &rule.field_type {
        FieldType::String => Ok(cast_text(rule, raw)?.map(Value::String)),
        FieldType::Enum { values } => match cast_text(rule, raw)? {
            Some(text) if values.contains(&text) => Ok(Some(Value::String(text))),
            Some(text) => Err(Violation::new(
                rule.name.clone(),
                format!(
                    "`{}` is not a valid enum value for `{}`. Expected one of: {}",
                    text,
                    rule.name,
                    values.join(", ")
                ),
            )),
            None => Ok(None),
        },
        FieldType::Number => match raw {
            Value::Number(n) if n.as_f64().map_or(false, f64::is_finite) => {
                Ok(Some(Value::Number(n.clone())))
            }
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                parse_number(s)
                    .map(|n| Some(Value::Number(n)))
                    .ok_or_else(|| type_error(rule))
            }
            _ => Err(type_error(rule)),
        },
        FieldType::Timestamp => {
            let parsed = match raw {
                Value::String(s) if s.trim().is_empty() => return Ok(None),
                Value::String(s) => parse_timestamp(s.trim()),
                Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
                _ => None,
            };
            parsed
                .map(|dt| Some(Value::String(format_timestamp(&dt))))
                .ok_or_else(|| type_error(rule))
        }
    }
}

fn cast_text(rule: &FieldRule, raw: &Value) -> Result<Option<String>, Violation> {
    let mut text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(type_error(rule)),
    };
    if rule.trim {
        text = text.trim().to_string();
    }
    if rule.lowercase {
        text = text.to_lowercase();
    }
    if text.is_empty() && rule.is_required() {
        return Ok(None);
    }
    Ok(Some(text))
}

fn check_constraint(
    rule: &FieldRule,
    constraint: &Constraint,
    value: &Value,
) -> Result<(), Violation> {
    let ok = match constraint {
        Constraint::MaxLength { max, .. } => value
            .as_str()
            .map_or(true, |s| s.chars().count() <= *max),
        Constraint::Min { min, .. } => value.as_f64().map_or(true, |n| n >= *min),
        Constraint::Pattern { regex, .. } => value.as_str().map_or(true, |s| regex.is_match(s)),
    };
    if ok {
        return Ok(());
    }
    let message = match constraint {
        Constraint::MaxLength { message, .. }
        | Constraint::Min { message, .. }
        | Constraint::Pattern { message, .. } => message,
    };
    Err(Violation::new(rule.name.clone(), message.clone()))
}

fn resolve_default(default: &DefaultValue, now: DateTime<Utc>) -> Value {
    match default {
        DefaultValue::Value(value) => value.clone(),
        DefaultValue::Now => Value::String(format_timestamp(&now)),
    }
}

/// Parses an integer when possible so integral input stays integral.
fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Canonical wire form of a timestamp: RFC 3339, UTC, millisecond precision.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(rule: &FieldRule) -> Violation {
    let message = match rule.field_type {
        FieldType::Timestamp => format!("`{}` must be a valid date", rule.name),
        ref other => format!("`{}` must be a {}", rule.name, other.type_name()),
    };
    Violation::new(rule.name.clone(), message)
}
