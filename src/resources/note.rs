//! Note record rules

use serde_json::{Map, Value};

use crate::schema::{FieldRule, Schema};

use super::ResourceDef;

pub(super) fn definition() -> ResourceDef {
    let schema = Schema::new(
        "notes",
        vec![
            FieldRule::string("title")
                .required_with("Please add a title")
                .trim()
                .max_length_with(100, "Title cannot be more than 100 characters"),
            FieldRule::string("content")
                .required_with("Please add content")
                .max_length_with(5000, "Content cannot be more than 5000 characters"),
        ],
    );

    ResourceDef {
        collection: "notes",
        label: "Note",
        schema,
        derive: no_derived,
    }
}

fn no_derived(_: &Map<String, Value>) -> Map<String, Value> {
    Map::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Mode, SchemaValidator};
    use serde_json::json;

    #[test]
    fn test_required_messages() {
        let def = definition();
        let err = SchemaValidator::new(&def.schema)
            .validate(&json!({"title": "  "}), Mode::Create)
            .unwrap_err();
        assert_eq!(err.messages(), vec!["Please add a title", "Please add content"]);
    }

    #[test]
    fn test_limits() {
        let def = definition();
        let err = SchemaValidator::new(&def.schema)
            .validate(
                &json!({"title": "t".repeat(101), "content": "c".repeat(5001)}),
                Mode::Create,
            )
            .unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "Title cannot be more than 100 characters",
                "Content cannot be more than 5000 characters",
            ]
        );
    }

    #[test]
    fn test_content_is_not_trimmed() {
        let def = definition();
        let doc = SchemaValidator::new(&def.schema)
            .validate(&json!({"title": " Groceries ", "content": "  milk\n"}), Mode::Create)
            .unwrap();
        assert_eq!(doc["title"], "Groceries");
        assert_eq!(doc["content"], "  milk\n");
    }
}
