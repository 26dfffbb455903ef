//! Router-level tests: real router, in-memory store.

use crate::error::ErrorKind;
use crate::middleware::RequestOutcome;
use crate::repository::memory::MemoryRepository;
use crate::routes::app;
use crate::service::QnaService;
use crate::state::AppState;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const USER_ID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3de91";

fn setup() -> (Router, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let state = AppState {
        service: QnaService::new(repo.clone(), repo.clone()),
    };
    (app(state), repo)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn validation(desc: &str) -> Value {
    json!({"status": "Bad Request", "error": {"code": "VALIDATION_FAILED", "desc": desc}})
}

fn parse_failure() -> Value {
    json!({"status": "Bad Request", "error": {"code": "JSON_PARSING_FAILED", "desc": "Invalid request body"}})
}

fn internal() -> Value {
    json!({"status": "Internal Server Error", "error": {"code": "INTERNAL_SERVER_ERROR", "desc": "internal server error"}})
}

async fn create_user(router: &Router, name: &str) -> String {
    let (status, body) = send(router, Method::POST, "/users/", Some(&json!({"name": name}).to_string())).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["user_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn question_answer_scenario() {
    let (router, _) = setup();
    let user_id = create_user(&router, "ann").await;

    let (status, body) = send(&router, Method::POST, "/questions/", Some(r#"{"text":"what?"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "data": {"question_id": 1}}));

    let answer = json!({"user_id": user_id, "text": "42"}).to_string();
    let (status, body) = send(&router, Method::POST, "/questions/1/answers/", Some(&answer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "data": {"answer_id": 1}}));

    let (status, body) = send(&router, Method::GET, "/questions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "OK",
            "data": {
                "question": {"id": 1, "text": "what?"},
                "answers": [{"id": 1, "question_id": 1, "user_id": user_id, "text": "42"}]
            }
        })
    );

    let (status, body) = send(&router, Method::GET, "/answers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "42");
}

#[tokio::test]
async fn empty_name_is_rejected_before_the_store() {
    let (router, repo) = setup();
    let (status, body) = send(&router, Method::POST, "/users/", Some(r#"{"name":""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, validation("field \"name\" must not be empty"));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn missing_field_counts_as_empty() {
    let (router, repo) = setup();
    let (status, body) = send(&router, Method::POST, "/questions/", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, validation("field \"text\" must not be empty"));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn malformed_json_short_circuits_validation() {
    let (router, repo) = setup();
    for (uri, body) in [
        ("/users/", r#"{"name": "#),
        ("/questions/", r#"{"text": "x""#),
        // Invalid path id too: the body is decoded first.
        ("/questions/slovo/answers/", r#"{"user_id": "x", "text": ""#),
    ] {
        let (status, value) = send(&router, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(value, parse_failure(), "{uri}");
    }
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn wrong_field_type_is_a_parse_failure() {
    let (router, _) = setup();
    let (status, body) = send(&router, Method::POST, "/users/", Some(r#"{"name": 7}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, parse_failure());
}

#[tokio::test]
async fn create_answer_validation_order() {
    let (router, repo) = setup();
    let cases = [
        ("slovo", json!({"user_id": USER_ID, "text": "t"}), "invalid ID format for \"id\""),
        ("0", json!({"user_id": USER_ID, "text": "t"}), "ID must be a positive integer"),
        ("1", json!({"user_id": "not-uuid", "text": ""}), "field \"text\" must not be empty"),
        ("1", json!({"user_id": "not-uuid", "text": "t"}), "invalid UUID format for \"user_id\""),
    ];
    for (id, body, desc) in cases {
        let uri = format!("/questions/{id}/answers/");
        let (status, value) = send(&router, Method::POST, &uri, Some(&body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{desc}");
        assert_eq!(value, validation(desc));
    }
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn path_ids_are_validated() {
    let (router, repo) = setup();
    let cases = [
        (Method::GET, "/questions/abc", "invalid ID format for \"id\""),
        (Method::DELETE, "/questions/-1", "ID must be a positive integer"),
        (Method::GET, "/answers/0", "ID must be a positive integer"),
        (Method::DELETE, "/answers/1e3", "invalid ID format for \"id\""),
        (Method::DELETE, "/users/42", "invalid UUID format for \"id\""),
    ];
    for (method, uri, desc) in cases {
        let (status, value) = send(&router, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(value, validation(desc), "{uri}");
    }
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn missing_entities_are_internal_errors() {
    let (router, _) = setup();
    let missing_user = format!("/users/{USER_ID}");
    for (method, uri) in [
        (Method::DELETE, missing_user.as_str()),
        (Method::DELETE, "/questions/9"),
        (Method::DELETE, "/answers/9"),
        (Method::GET, "/questions/9"),
        (Method::GET, "/answers/9"),
    ] {
        let (status, value) = send(&router, method, uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(value, internal(), "{uri}");
    }
}

#[tokio::test]
async fn missing_entity_is_logged_as_not_found() {
    let (router, _) = setup();
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/answers/9")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let outcome = response.extensions().get::<RequestOutcome>().cloned().unwrap_or_default();
    assert_eq!(outcome.kind, Some(ErrorKind::NotFound));
    assert_eq!(outcome.errors, vec!["QnaService::delete_answer: answer 9 not found".to_string()]);
}

#[tokio::test]
async fn second_delete_fails() {
    let (router, _) = setup();
    send(&router, Method::POST, "/questions/", Some(r#"{"text":"q"}"#)).await;
    let (status, body) = send(&router, Method::DELETE, "/questions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK"}));
    let (status, body) = send(&router, Method::DELETE, "/questions/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, internal());
}

#[tokio::test]
async fn deleting_question_cascades_to_answers() {
    let (router, _) = setup();
    let user_id = create_user(&router, "bob").await;
    send(&router, Method::POST, "/questions/", Some(r#"{"text":"q"}"#)).await;
    let answer = json!({"user_id": user_id, "text": "a"}).to_string();
    send(&router, Method::POST, "/questions/1/answers/", Some(&answer)).await;

    let (status, _) = send(&router, Method::DELETE, "/questions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&router, Method::GET, "/answers/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, internal());
}

#[tokio::test]
async fn created_user_is_listed_and_deletable() {
    let (router, _) = setup();
    let user_id = create_user(&router, "carol").await;
    let (status, body) = send(&router, Method::GET, "/users/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK", "data": [{"id": user_id, "name": "carol"}]}));

    let (status, _) = send(&router, Method::DELETE, &format!("/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&router, Method::GET, "/users/", None).await;
    assert_eq!(body, json!({"status": "OK", "data": []}));
}

#[tokio::test]
async fn answer_to_unknown_question_is_internal_error() {
    let (router, _) = setup();
    let body = json!({"user_id": USER_ID, "text": "orphan"}).to_string();
    let (status, value) = send(&router, Method::POST, "/questions/5/answers/", Some(&body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value, internal());
}

#[tokio::test]
async fn store_outage_is_internal_error() {
    let (router, repo) = setup();
    repo.set_unavailable(true);
    let (status, value) = send(&router, Method::GET, "/questions/", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["error"]["code"], "INTERNAL_SERVER_ERROR");
    assert!(value.get("data").is_none());
}

#[tokio::test]
async fn unknown_route_uses_the_envelope() {
    let (router, _) = setup();
    for uri in ["/nope", "/health", "/version"] {
        let (status, body) = send(&router, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            body,
            json!({"status": "Not Found", "error": {"code": "VALIDATION_FAILED", "desc": "route not found"}}),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn wrong_method_uses_the_envelope() {
    let (router, repo) = setup();
    for (method, uri) in [(Method::PUT, "/users/"), (Method::POST, "/answers/1"), (Method::GET, "/questions/1/answers/")] {
        let (status, body) = send(&router, method, uri, Some("{}")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(
            body,
            json!({"status": "Method Not Allowed", "error": {"code": "VALIDATION_FAILED", "desc": "method not allowed"}}),
            "{uri}"
        );
    }
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn undecodable_path_segment_is_a_validation_failure() {
    let (router, repo) = setup();
    for (method, uri, desc) in [
        (Method::GET, "/answers/%FF", "invalid ID format for \"id\""),
        (Method::DELETE, "/questions/%FF", "invalid ID format for \"id\""),
        (Method::DELETE, "/users/%FF", "invalid UUID format for \"id\""),
    ] {
        let (status, body) = send(&router, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, validation(desc), "{uri}");
    }
    let body = json!({"user_id": USER_ID, "text": "t"}).to_string();
    let (status, value) = send(&router, Method::POST, "/questions/%FF/answers/", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, validation("invalid ID format for \"id\""));
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn oversized_body_is_a_parse_failure() {
    let (router, repo) = setup();
    let name = "a".repeat(2 * 1024 * 1024);
    let body = json!({ "name": name }).to_string();
    let (status, value) = send(&router, Method::POST, "/users/", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, parse_failure());
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn responses_are_json_with_cors() {
    let (router, _) = setup();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/questions/")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
