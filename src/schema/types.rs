//! Schema type definitions
//!
//! A schema is an explicit rule table: one [`FieldRule`] per declared field,
//! in the order violations are reported, plus the cross-field rules that
//! run once every field has been checked.
//!
//! Supported types:
//! - string: UTF-8 string (numbers and booleans are cast to text)
//! - number: JSON number (numeric strings are cast)
//! - enum: string restricted to a fixed set of values
//! - timestamp: RFC 3339 date-time, `YYYY-MM-DD`, or epoch milliseconds

use regex::Regex;
use serde_json::Value;

use super::rules::CrossFieldRule;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Enum { values: Vec<String> },
    Timestamp,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Enum { .. } => "string",
            FieldType::Timestamp => "date",
        }
    }
}

/// Value applied to an absent field when a record is created
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// A fixed JSON value
    Value(Value),
    /// The creation time
    Now,
}

/// A single constraint on a field value
#[derive(Debug, Clone)]
pub enum Constraint {
    /// String length (in characters) must not exceed `max`
    MaxLength { max: usize, message: String },
    /// Number must be at least `min`
    Min { min: f64, message: String },
    /// String must match the pattern
    Pattern { regex: Regex, message: String },
}

/// Rule metadata for one field
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub field_type: FieldType,
    /// Message reported when a required field is absent or empty
    pub required: Option<String>,
    pub constraints: Vec<Constraint>,
    /// Strip surrounding whitespace before validation
    pub trim: bool,
    /// Lowercase before validation
    pub lowercase: bool,
    /// Enforced by the store at write time
    pub unique: bool,
    pub default: Option<DefaultValue>,
}

impl FieldRule {
    fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: None,
            constraints: Vec::new(),
            trim: false,
            lowercase: false,
            unique: false,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Timestamp)
    }

    pub fn one_of(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(
            name,
            FieldType::Enum {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        )
    }

    /// Marks the field required with the default message.
    pub fn required(self) -> Self {
        let message = format!("Please add a `{}`.", self.name);
        self.required_with(message)
    }

    /// Marks the field required with a custom message.
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    /// Adds a maximum length with the default message.
    pub fn max_length(self, max: usize) -> Self {
        let message = format!(
            "`{}` cannot be more than {} characters.",
            capitalize(&self.name),
            max
        );
        self.max_length_with(max, message)
    }

    pub fn max_length_with(mut self, max: usize, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint::MaxLength {
            max,
            message: message.into(),
        });
        self
    }

    pub fn min_with(mut self, min: f64, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Min {
            min,
            message: message.into(),
        });
        self
    }

    pub fn pattern_with(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    pub fn default_now(mut self) -> Self {
        self.default = Some(DefaultValue::Now);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }
}

/// Complete rule table for one record kind
#[derive(Debug, Clone)]
pub struct Schema {
    /// Schema identifier (the collection name)
    pub schema_id: String,
    pub fields: Vec<FieldRule>,
    pub cross_field: Vec<CrossFieldRule>,
}

impl Schema {
    pub fn new(schema_id: impl Into<String>, fields: Vec<FieldRule>) -> Self {
        Self {
            schema_id: schema_id.into(),
            fields,
            cross_field: Vec::new(),
        }
    }

    pub fn with_cross_field(mut self, rule: CrossFieldRule) -> Self {
        self.cross_field.push(rule);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields the store must keep unique
    pub fn unique_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.unique)
            .map(|f| f.name.clone())
            .collect()
    }
}

/// Uppercases the first character: `email` -> `Email`
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
