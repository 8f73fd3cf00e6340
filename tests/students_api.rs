//! Student API Tests
//!
//! Drives the full router (handler → validator → repository → store):
//! - Fee consistency is enforced on create and update
//! - Duplicate emails are rejected, never stored twice
//! - Lists are newest first and carry the derived balance
//! - Missing and malformed identifiers are 404

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use recordhub::api::HttpServer;
use recordhub::config::HttpConfig;
use recordhub::storage::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

fn app() -> Router {
    HttpServer::with_store(HttpConfig::default(), Arc::new(MemoryStore::new()))
        .unwrap()
        .router()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn student(email: &str) -> Value {
    json!({
        "name": "A",
        "email": email,
        "phone": "1",
        "standard": "10",
        "subject": "Math",
        "feesTotal": 1000,
        "feesPaid": 250,
    })
}

async fn count(app: &Router) -> u64 {
    let (_, body) = send(app, "GET", "/api/students", None).await;
    body["count"].as_u64().unwrap()
}

// =============================================================================
// Fee Consistency
// =============================================================================

/// Paid over total is a 400 and nothing is stored.
#[tokio::test]
async fn test_fees_over_total_rejected_on_create() {
    let app = app();
    let mut body = student("a@x.com");
    body["feesPaid"] = json!(1200);

    let (status, resp) = send(&app, "POST", "/api/students", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["success"], false);
    assert_eq!(resp["message"], "Validation error");
    assert_eq!(resp["error"], json!(["Fees paid cannot be more than total fees"]));
    assert_eq!(count(&app).await, 0);
}

/// String amounts skip the fast reject but not the validator.
#[tokio::test]
async fn test_fees_over_total_as_strings_rejected() {
    let app = app();
    let mut body = student("a@x.com");
    body["feesPaid"] = json!("1200");
    body["feesTotal"] = json!("1000");

    let (status, resp) = send(&app, "POST", "/api/students", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], json!(["Fees paid cannot be more than total fees"]));
    assert_eq!(count(&app).await, 0);
}

/// An update touching only feesPaid is checked against the stored total.
#[tokio::test]
async fn test_update_checks_merged_record() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/students", Some(student("a@x.com"))).await;
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let (status, resp) = send(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(json!({"feesPaid": 1100})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], json!(["Fees paid cannot be more than total fees"]));

    let (_, current) = send(&app, "GET", &format!("/api/students/{}", id), None).await;
    assert_eq!(current["data"]["feesPaid"], 250);
}

// =============================================================================
// Create / Read
// =============================================================================

/// Created records carry defaults and the derived balance.
#[tokio::test]
async fn test_create_applies_defaults() {
    let app = app();
    let mut body = student("  Asha@School.COM ");
    body.as_object_mut().unwrap().remove("feesPaid");

    let (status, resp) = send(&app, "POST", "/api/students", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["success"], true);
    assert_eq!(resp["message"], "Student created successfully");

    let data = &resp["data"];
    assert_eq!(data["email"], "asha@school.com");
    assert_eq!(data["feesPaid"], 0);
    assert_eq!(data["feesBalance"], 1000);
    assert_eq!(data["status"], "Active");
    assert!(data["admissionDate"].is_string());
    assert!(data["createdAt"].is_string());
    assert_eq!(data["createdAt"], data["updatedAt"]);
}

/// Every missing required field is reported, in rule order.
#[tokio::test]
async fn test_create_reports_all_violations() {
    let app = app();
    let (status, resp) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"email": "not-an-email", "status": "Graduated", "feesTotal": 10})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = resp["error"].as_array().unwrap();
    assert_eq!(errors[0], "Please add a student name");
    assert_eq!(errors[1], "Please add a valid email");
    assert_eq!(errors[2], "Please add a phone number");
    assert_eq!(errors.len(), 6);
    assert!(errors[5].as_str().unwrap().contains("Graduated"));
}

/// The same email twice: second is Duplicate, one record stored.
#[tokio::test]
async fn test_duplicate_email() {
    let app = app();
    let (status, _) = send(&app, "POST", "/api/students", Some(student("a@x.com"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, resp) = send(&app, "POST", "/api/students", Some(student("a@x.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp,
        json!({"success": false, "message": "Email already exists", "error": "Duplicate email"})
    );

    let (_, list) = send(&app, "GET", "/api/students", None).await;
    let with_email: Vec<_> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["email"] == "a@x.com")
        .collect();
    assert_eq!(with_email.len(), 1);
}

/// A just-created record is first in the next list.
#[tokio::test]
async fn test_list_newest_first() {
    let app = app();
    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        send(&app, "POST", "/api/students", Some(student(email))).await;
    }

    let (status, list) = send(&app, "GET", "/api/students", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["success"], true);
    assert_eq!(list["count"], 3);
    let emails: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["c@x.com", "b@x.com", "a@x.com"]);

    for s in list["data"].as_array().unwrap() {
        assert_eq!(
            s["feesBalance"].as_i64().unwrap(),
            s["feesTotal"].as_i64().unwrap() - s["feesPaid"].as_i64().unwrap()
        );
    }
}

/// Malformed and unknown ids are 404 on every id route.
#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = app();
    for uri in [
        "/api/students/123",
        "/api/students/00000000-0000-0000-0000-000000000000",
    ] {
        let (status, resp) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(resp, json!({"success": false, "error": "Student not found"}));

        let (status, _) = send(&app, "PUT", uri, Some(json!({"name": "B"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Update / Delete
// =============================================================================

/// Fields present in the body overwrite; the rest are kept.
#[tokio::test]
async fn test_update_merges_fields() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/students", Some(student("a@x.com"))).await;
    let id = created["data"]["_id"].as_str().unwrap().to_string();

    let (status, resp) = send(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(json!({"status": "Inactive", "feesPaid": 1000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Student updated successfully");
    assert_eq!(resp["data"]["status"], "Inactive");
    assert_eq!(resp["data"]["name"], "A");
    assert_eq!(resp["data"]["feesBalance"], 0);
    assert_eq!(resp["data"]["createdAt"], created["data"]["createdAt"]);
}

/// Updating into another record's email is a Duplicate.
#[tokio::test]
async fn test_update_duplicate_email() {
    let app = app();
    send(&app, "POST", "/api/students", Some(student("a@x.com"))).await;
    let (_, b) = send(&app, "POST", "/api/students", Some(student("b@x.com"))).await;
    let id = b["data"]["_id"].as_str().unwrap();

    let (status, resp) = send(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(json!({"email": "A@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Duplicate email");
}

#[tokio::test]
async fn test_delete() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/students", Some(student("a@x.com"))).await;
    let uri = format!("/api/students/{}", created["data"]["_id"].as_str().unwrap());

    let (status, resp) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp,
        json!({"success": true, "message": "Student deleted successfully", "data": {}})
    );

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(count(&app).await, 0);
}

// =============================================================================
// Request Bodies
// =============================================================================

/// URL-encoded forms are accepted; every value arrives as text.
#[tokio::test]
async fn test_form_encoded_create() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/students")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(
            "name=Asha&email=asha%40x.com&phone=12345&standard=9&subject=Art&feesTotal=500&feesPaid=100",
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let resp: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(resp["data"]["feesTotal"], 500);
    assert_eq!(resp["data"]["feesBalance"], 400);
}

/// Unparseable JSON is a 400 with the parser's message.
#[tokio::test]
async fn test_malformed_json() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/students")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let resp: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(resp["success"], false);
    assert_eq!(resp["message"], "Invalid request body");
    assert!(resp["error"].is_string());
}
