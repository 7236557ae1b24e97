#![allow(clippy::unwrap_used)]
// Integration tests for `RecordService` using wiremock.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tablero_api::{ApiClient, Error, RecordService};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Activity {
    id: i64,
    title: String,
    description: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
struct ActivityPayload {
    title: String,
    description: String,
    #[serde(rename = "type")]
    kind: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RecordService<Activity, ActivityPayload>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
    let service = RecordService::new(client, "activities");
    (server, service)
}

fn sample_payload() -> ActivityPayload {
    ActivityPayload {
        title: "Taller de lectura".into(),
        description: "Sesión semanal".into(),
        kind: "NON_DIGITAL".into(),
    }
}

// ── List / get ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_all_returns_whole_collection() {
    let (server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "A", "description": "first", "type": "DIGITAL" },
            { "id": 2, "title": "B", "description": "second", "type": "NON_DIGITAL" }
        ])))
        .mount(&server)
        .await;

    let items = service.list_all().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[1].title, "B");
}

#[tokio::test]
async fn get_by_id_hits_id_path() {
    let (server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/activities/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            { "id": 7, "title": "Séptima", "description": "x", "type": "DIGITAL" }
        )))
        .mount(&server)
        .await;

    let item = service.get_by_id(7).await.unwrap();
    assert_eq!(item.id, 7);
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let (server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/activities/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Actividad no existe" })),
        )
        .mount(&server)
        .await;

    let result = service.get_by_id(99).await;

    match result {
        Err(ref e @ Error::NotFound { ref message }) => {
            assert!(e.is_not_found());
            assert_eq!(message, "Actividad no existe");
        }
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

// ── Create / update ─────────────────────────────────────────────────

#[tokio::test]
async fn create_posts_payload_and_returns_persisted_record() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .and(body_json(json!({
            "title": "Taller de lectura",
            "description": "Sesión semanal",
            "type": "NON_DIGITAL"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3,
            "title": "Taller de lectura",
            "description": "Sesión semanal",
            "type": "NON_DIGITAL"
        })))
        .mount(&server)
        .await;

    let created = service.create(&sample_payload()).await.unwrap();
    assert_eq!(created.id, 3);
}

#[tokio::test]
async fn create_surfaces_server_message() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let result = service.create(&sample_payload()).await;

    match result {
        Err(Error::Api { ref message, status }) => {
            assert_eq!(message, "db down");
            assert_eq!(status, 500);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn create_without_message_field_falls_back_to_http_description() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = service.create(&sample_payload()).await;

    match result {
        Err(Error::Api { ref message, status }) => {
            assert!(message.contains("502"), "got: {message}");
            assert_eq!(status, 502);
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn multibyte_error_body_is_truncated_on_a_char_boundary() {
    let (server, service) = setup().await;

    // 300 bytes of accented text, no `message` field: the fallback
    // description must cut the body without splitting a character.
    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(500).set_body_string("€".repeat(100)))
        .mount(&server)
        .await;

    let result = service.create(&sample_payload()).await;

    match result {
        Err(Error::Api { ref message, status }) => {
            assert_eq!(status, 500);
            assert!(message.starts_with("HTTP 500"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn update_puts_to_id_path() {
    let (server, service) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/activities/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "title": "Taller de lectura",
            "description": "Sesión semanal",
            "type": "NON_DIGITAL"
        })))
        .mount(&server)
        .await;

    let updated = service.update(2, &sample_payload()).await.unwrap();
    assert_eq!(updated.id, 2);
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let (server, service) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/activities/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no existe" })))
        .mount(&server)
        .await;

    let result = service.update(42, &sample_payload()).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_accepts_204_no_content() {
    let (server, service) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/activities/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    service.delete(2).await.unwrap();
}

#[tokio::test]
async fn repeated_delete_reports_not_found_not_success() {
    let (server, service) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/activities/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "ya eliminado" })))
        .mount(&server)
        .await;

    let result = service.delete(2).await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

// ── Auth header ─────────────────────────────────────────────────────

#[tokio::test]
async fn requests_carry_bearer_token_once_set() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
    client.set_token(secrecy::SecretString::from("tok-123".to_string()));
    let service: RecordService<Activity, ActivityPayload> =
        RecordService::new(client, "activities");

    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let items = service.list_all().await.unwrap();
    assert!(items.is_empty());
}
