//! HTTP backend integration tests
//!
//! Exercises `HttpBackend` against a `wiremock` server: the three history
//! payload shapes, session scoping, reply field preference, and error
//! mapping for non-success statuses.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unichat::api::{ChatBackend, HistoryPayload, SendRequest};
use unichat::UnichatError;

mod common;

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_fetch_history_bare_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::record_json(1, "s1", "Where is the library?", Some("Building C."), "2024-09-01T08:00:00Z"),
            common::record_json(2, "s2", "Exam dates?", None, "2024-09-02T08:00:00Z"),
        ])))
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let payload = backend.fetch_history(None).await.expect("fetch should succeed");

    assert_eq!(payload.records().len(), 2);
    let catalog = payload.catalog();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].session_id, "s2");
    assert_eq!(catalog[1].title, "Where is the library?");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_fetch_history_wrapped_object_scoped_to_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/chat/history"))
        .and(query_param("session_id", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                common::record_json(2, "s1", "second", Some("two"), "2024-09-01T08:05:00Z"),
                common::record_json(1, "s1", "first", Some("- **Hours**: 8 to 5"), "2024-09-01T08:00:00"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let payload = backend
        .fetch_history(Some("s1"))
        .await
        .expect("fetch should succeed");

    let transcript = payload.transcript("s1");
    assert_eq!(transcript.title, "first");
    assert_eq!(transcript.messages.len(), 4);
    assert_eq!(transcript.messages[0].id, "1-user");
    assert_eq!(transcript.messages[1].content, "<h4>Hours</h4>8 to 5");
    assert_eq!(transcript.messages[3].content, "two");
}

#[tokio::test]
async fn test_fetch_history_legacy_sessions_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [
                {"session_id": "old", "title": "Old chat", "created_at": "2024-01-01T00:00:00Z"},
                {"session_id": "new", "title": "", "created_at": "2024-01-01T00:00:00Z",
                 "updated_at": "2024-03-01T00:00:00Z"},
                {"session_id": "", "title": "orphan", "created_at": "2024-05-01T00:00:00Z"},
            ]
        })))
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let payload = backend.fetch_history(None).await.expect("fetch should succeed");

    assert!(matches!(payload, HistoryPayload::Sessions(_)));
    let catalog = payload.catalog();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].session_id, "new");
    assert_eq!(catalog[0].display_title(), "new...");
    assert!(payload.transcript("old").is_empty());
}

#[tokio::test]
async fn test_fetch_history_unrecognised_body_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let payload = backend.fetch_history(None).await.expect("fetch should succeed");
    assert_eq!(payload, HistoryPayload::Empty);
    assert!(payload.catalog().is_empty());
}

#[tokio::test]
async fn test_fetch_history_server_error_maps_to_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let err = backend.fetch_history(None).await.unwrap_err();

    match err.downcast_ref::<UnichatError>() {
        Some(UnichatError::Backend { status, message }) => {
            assert_eq!(*status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_history_unreachable_server_is_transport_error() {
    let backend = common::backend_for("http://127.0.0.1:1");
    let err = backend.fetch_history(None).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<UnichatError>(),
        Some(UnichatError::Transport(_))
    ));
}

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_send_posts_request_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "When is the add/drop deadline?",
            "model": "default",
            "session_id": "s1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bot_response": "September 12.",
            "session_id": "s1",
            "detected_intent": "deadlines",
            "confidence_score": 0.87,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let response = backend
        .send(&SendRequest {
            message: "When is the add/drop deadline?".to_string(),
            model: "default".to_string(),
            session_id: "s1".to_string(),
        })
        .await
        .expect("send should succeed");

    assert_eq!(response.reply_text(), Some("September 12."));
    assert_eq!(response.session_id(), Some("s1"));
    assert_eq!(response.detected_intent.as_deref(), Some("deadlines"));
}

#[tokio::test]
async fn test_send_falls_back_to_older_reply_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bot_response": "",
            "message": "from message",
        })))
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let response = backend
        .send(&SendRequest {
            message: "hi".to_string(),
            model: "default".to_string(),
            session_id: "s1".to_string(),
        })
        .await
        .expect("send should succeed");

    assert_eq!(response.reply_text(), Some("from message"));
    assert_eq!(response.session_id(), None);
}

#[tokio::test]
async fn test_send_invalid_json_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let err = backend
        .send(&SendRequest {
            message: "hi".to_string(),
            model: "default".to_string(),
            session_id: "s1".to_string(),
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid send response"));
}

#[tokio::test]
async fn test_send_error_without_body_uses_reason_phrase() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    let err = backend
        .send(&SendRequest {
            message: "hi".to_string(),
            model: "default".to_string(),
            session_id: "s1".to_string(),
        })
        .await
        .unwrap_err();

    match err.downcast_ref::<UnichatError>() {
        Some(UnichatError::Backend { status, message }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_session_sends_scoped_delete() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/chat/history"))
        .and(query_param("session_id", "s1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = common::backend_for(&server.uri());
    backend
        .delete_session("s1")
        .await
        .expect("delete should succeed");
}
