//! Response envelope
//!
//! Every response body, success or failure, is one [`Envelope`]:
//! `{ success, count?, message?, data?, error? }`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::repository::Record;

/// `error` is a single string, or the list of validation messages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Messages(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl Envelope {
    fn ok(message: Option<String>, data: Value) -> Self {
        Self {
            success: true,
            count: None,
            message,
            data: Some(data),
            error: None,
        }
    }

    pub fn list(records: &[Record]) -> Self {
        let data = records.iter().map(Record::to_json).collect();
        Self {
            count: Some(records.len()),
            ..Self::ok(None, Value::Array(data))
        }
    }

    pub fn record(record: &Record) -> Self {
        Self::ok(None, record.to_json())
    }

    pub fn created(label: &str, record: &Record) -> Self {
        Self::ok(Some(format!("{} created successfully", label)), record.to_json())
    }

    pub fn updated(label: &str, record: &Record) -> Self {
        Self::ok(Some(format!("{} updated successfully", label)), record.to_json())
    }

    pub fn deleted(label: &str) -> Self {
        Self::ok(
            Some(format!("{} deleted successfully", label)),
            Value::Object(Map::new()),
        )
    }

    pub fn failure(error: ErrorDetail, message: Option<String>) -> Self {
        Self {
            success: false,
            count: None,
            message,
            data: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deleted_has_empty_data() {
        let value = serde_json::to_value(Envelope::deleted("Note")).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "Note deleted successfully", "data": {}})
        );
    }

    #[test]
    fn test_list_counts() {
        let value = serde_json::to_value(Envelope::list(&[])).unwrap();
        assert_eq!(value, json!({"success": true, "count": 0, "data": []}));
    }

    #[test]
    fn test_error_detail_shapes() {
        let single = Envelope::failure(ErrorDetail::Message("Route not found".into()), None);
        assert_eq!(
            serde_json::to_value(single).unwrap(),
            json!({"success": false, "error": "Route not found"})
        );

        let list = Envelope::failure(
            ErrorDetail::Messages(vec!["a".into(), "b".into()]),
            Some("Validation error".into()),
        );
        assert_eq!(
            serde_json::to_value(list).unwrap(),
            json!({"success": false, "message": "Validation error", "error": ["a", "b"]})
        );
    }
}
