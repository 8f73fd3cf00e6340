//! Schema validation subsystem
//!
//! Schemas are explicit rule tables enforced on every write.
//!
//! # Design Principles
//!
//! - One generic validation routine, parameterized by per-field rule metadata
//! - Violations are collected, not short-circuited
//! - Cross-field rules are shared values, reused outside the validator
//! - Deterministic validation

mod errors;
pub mod rules;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, Violation};
pub use rules::{check_fees, CrossFieldRule, FEES_EXCEEDED_MESSAGE, FEES_WITHIN_TOTAL};
pub use types::{capitalize, Constraint, DefaultValue, FieldRule, FieldType, Schema};
pub use validator::{format_timestamp, Mode, SchemaValidator};
