use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use notice_board::{
    create_router, notice_dispatcher, AppState, Config, InMemoryNoticeStore, StorageBackend,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        storage: StorageBackend::Memory,
        max_connections: 1,
    };
    let dispatcher = notice_dispatcher(Arc::new(InMemoryNoticeStore::new())).unwrap();
    create_router(AppState::new(dispatcher, Arc::new(config)))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Option<Value>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, json)
}

#[tokio::test]
async fn notice_lifecycle_over_http() {
    let app = app();

    let (status, body) = call(&app, "GET", "/api/v1/notices", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/notices",
        Some(json!({ "title": "Hello", "message": "World" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created = body.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["title"], "Hello");
    assert!(created.get("created_at").is_some());
    assert!(created.get("active").is_none());

    let (status, body) = call(&app, "GET", &format!("/api/v1/notices/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let notice = body.unwrap();
    assert_eq!(notice["active"], true);
    assert_eq!(notice["updated_at"], Value::Null);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/v1/notices/{}", id),
        Some(json!({ "message": "Updated" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());

    let (status, body) = call(&app, "GET", "/api/v1/notices", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["message"], "Updated");
    assert_eq!(list[0]["title"], "Hello");

    let (status, _) = call(&app, "DELETE", &format!("/api/v1/notices/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", "/api/v1/notices", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, "GET", &format!("/api/v1/notices/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["active"], false);
}

#[tokio::test]
async fn missing_notice_is_404() {
    let app = app();

    let (status, _) = call(&app, "GET", "/api/v1/notices/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", "/api/v1/notices/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        "PUT",
        "/api/v1/notices/999",
        Some(json!({ "message": "nobody home" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_400_with_every_error() {
    let app = app();

    let (status, body) = call(&app, "GET", "/api/v1/notices/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.unwrap(),
        json!({ "errors": [{ "field": "id", "message": "id must be greater than zero" }] })
    );

    let (status, body) = call(&app, "POST", "/api/v1/notices", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body.unwrap()["errors"].as_array().unwrap().clone();
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["message", "title"]);

    let (status, _) = call(
        &app,
        "PUT",
        "/api/v1/notices/-4",
        Some(json!({ "message": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nul_in_message_is_400_not_stored() {
    let app = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/notices",
        Some(json!({ "title": "a", "message": "b\0c" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.unwrap(),
        json!({ "errors": [{ "field": "message", "message": "message must not contain NUL characters" }] })
    );

    let (status, _) = call(&app, "GET", "/api/v1/notices", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn openapi_document_lists_notice_routes() {
    let app = app();

    let (status, body) = call(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let doc = body.unwrap();
    assert!(doc["paths"].get("/api/v1/notices").is_some());
    assert!(doc["paths"].get("/api/v1/notices/{id}").is_some());

    let bad_request = &doc["paths"]["/api/v1/notices/{id}"]["get"]["responses"]["400"];
    assert_eq!(
        bad_request["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/ValidationErrorBody"
    );
    let schemas = &doc["components"]["schemas"];
    assert!(schemas.get("ValidationErrorBody").is_some());
    assert!(schemas.get("ErrorBody").is_some());
    assert!(schemas.get("Notice").is_none());
}
