//! Student record rules

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::schema::{FieldRule, Schema, FEES_WITHIN_TOTAL};

use super::ResourceDef;

/// `local@domain.tld`, ASCII word characters only
pub const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$";

pub const STATUSES: [&str; 2] = ["Active", "Inactive"];

pub(super) fn definition() -> ResourceDef {
    let email = Regex::new(EMAIL_PATTERN).expect("valid email pattern");

    let schema = Schema::new(
        "students",
        vec![
            FieldRule::string("name")
                .required_with("Please add a student name")
                .trim()
                .max_length_with(50, "Name cannot be more than 50 characters"),
            FieldRule::string("email")
                .required_with("Please add an email")
                .unique()
                .lowercase()
                .trim()
                .pattern_with(email, "Please add a valid email"),
            FieldRule::string("phone")
                .required_with("Please add a phone number")
                .max_length_with(15, "Phone number cannot be longer than 15 characters"),
            FieldRule::string("standard")
                .required_with("Please add a standard/class")
                .trim(),
            FieldRule::string("subject")
                .required_with("Please add a subject")
                .trim(),
            FieldRule::number("feesPaid")
                .default_value(0)
                .min_with(0.0, "Fees paid cannot be negative"),
            FieldRule::number("feesTotal")
                .required_with("Please add total fees")
                .min_with(0.0, "Total fees cannot be negative"),
            FieldRule::one_of("status", &STATUSES).default_value("Active"),
            FieldRule::timestamp("admissionDate").default_now(),
            FieldRule::string("remarks")
                .max_length_with(200, "Remarks cannot be more than 200 characters"),
        ],
    )
    .with_cross_field(FEES_WITHIN_TOTAL);

    ResourceDef {
        collection: "students",
        label: "Student",
        schema,
        derive: derive_balance,
    }
}

/// `feesBalance = feesTotal - feesPaid`, computed on every read.
fn derive_balance(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut derived = Map::new();
    if let Some(balance) = fees_balance(fields) {
        derived.insert("feesBalance".to_string(), balance);
    }
    derived
}

/// Integer inputs give an integer balance.
pub fn fees_balance(fields: &Map<String, Value>) -> Option<Value> {
    let total = fields.get("feesTotal")?;
    let paid = fields.get("feesPaid")?;

    if let (Some(total), Some(paid)) = (total.as_i64(), paid.as_i64()) {
        if let Some(balance) = total.checked_sub(paid) {
            return Some(Value::Number(balance.into()));
        }
    }
    let balance = total.as_f64()? - paid.as_f64()?;
    Number::from_f64(balance).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Mode, SchemaValidator};
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "name": "Asha",
            "email": "asha@school.com",
            "phone": "9876543210",
            "standard": "10",
            "subject": "Math",
            "feesTotal": 1000,
        })
    }

    #[test]
    fn test_email_pattern() {
        let re = Regex::new(EMAIL_PATTERN).unwrap();
        assert!(re.is_match("a@x.com"));
        assert!(re.is_match("first.last-1@mail.school.org"));
        assert!(re.is_match("a_b@x.co.in"));
        assert!(!re.is_match("a@x"));
        assert!(!re.is_match("a@x.comma"));
        assert!(!re.is_match("@x.com"));
        assert!(!re.is_match("a b@x.com"));
    }

    #[test]
    fn test_defaults_on_create() {
        let def = definition();
        let doc = SchemaValidator::new(&def.schema)
            .validate(&valid(), Mode::Create)
            .unwrap();
        assert_eq!(doc["feesPaid"], 0);
        assert_eq!(doc["status"], "Active");
        assert!(doc["admissionDate"].is_string());
        assert!(!doc.contains_key("remarks"));
    }

    #[test]
    fn test_field_messages() {
        let def = definition();
        let err = SchemaValidator::new(&def.schema)
            .validate(&json!({}), Mode::Create)
            .unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "Please add a student name",
                "Please add an email",
                "Please add a phone number",
                "Please add a standard/class",
                "Please add a subject",
                "Please add total fees",
            ]
        );
    }

    #[test]
    fn test_length_limits() {
        let def = definition();
        let mut doc = valid();
        doc["name"] = json!("n".repeat(51));
        doc["phone"] = json!("1".repeat(16));
        doc["remarks"] = json!("r".repeat(201));

        let err = SchemaValidator::new(&def.schema)
            .validate(&doc, Mode::Create)
            .unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "Name cannot be more than 50 characters",
                "Phone number cannot be longer than 15 characters",
                "Remarks cannot be more than 200 characters",
            ]
        );
    }

    #[test]
    fn test_fee_rules() {
        let def = definition();
        let validator = SchemaValidator::new(&def.schema);

        let mut over = valid();
        over["feesPaid"] = json!(1200);
        assert_eq!(
            validator.validate(&over, Mode::Create).unwrap_err().messages(),
            vec!["Fees paid cannot be more than total fees"]
        );

        let mut negative = valid();
        negative["feesTotal"] = json!(-1);
        assert_eq!(
            validator.validate(&negative, Mode::Create).unwrap_err().messages(),
            vec!["Total fees cannot be negative"]
        );
    }

    #[test]
    fn test_fees_balance() {
        let fields = valid().as_object().cloned().unwrap();
        let mut fields = fields;
        fields.insert("feesPaid".into(), json!(250));
        assert_eq!(fees_balance(&fields), Some(json!(750)));

        fields.insert("feesPaid".into(), json!(250.5));
        assert_eq!(fees_balance(&fields), Some(json!(749.5)));

        fields.remove("feesPaid");
        assert_eq!(fees_balance(&fields), None);
    }
}
