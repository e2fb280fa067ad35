mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use common::{blank_png_data_uri, body_json, get, mock_app, post_json};

fn json_body(value: serde_json::Value) -> Body {
    Body::from(value.to_string())
}

#[tokio::test]
async fn get_text_returns_engine_text_verbatim() {
    let (app, factory) = mock_app().await;

    let response = app
        .oneshot(post_json(
            "/api/get-text",
            json_body(json!({ "base64_image": blank_png_data_uri() })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({ "success": true, "result": { "text": "HELLO WORLD\n" } })
    );
    assert_eq!(factory.calls(), 1);
}

#[tokio::test]
async fn get_bboxes_page_level_returns_one_box() {
    let (app, _) = mock_app().await;

    let response = app
        .oneshot(post_json(
            "/api/get-bboxes",
            json_body(json!({ "base64_image": blank_png_data_uri(), "bbox_type": "page" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(
        json["result"]["bboxes"],
        json!([{ "x_min": 0, "y_min": 0, "x_max": 200, "y_max": 100 }])
    );
}

#[tokio::test]
async fn get_bboxes_word_level_keeps_reading_order() {
    let (app, _) = mock_app().await;

    let response = app
        .oneshot(post_json(
            "/api/get-bboxes",
            json_body(json!({ "base64_image": blank_png_data_uri(), "bbox_type": "word" })),
        ))
        .await
        .unwrap();

    let json = body_json(response).await;
    let bboxes = json["result"]["bboxes"].as_array().expect("bboxes array");
    assert_eq!(bboxes.len(), 2);
    assert_eq!(bboxes[0]["x_min"], 10);
    assert_eq!(bboxes[1]["x_min"], 60);
    assert_eq!(bboxes[1]["x_max"], 100);
}

#[tokio::test]
async fn get_bboxes_with_empty_image_is_bad_request() {
    let (app, factory) = mock_app().await;

    let response = app
        .oneshot(post_json(
            "/api/get-bboxes",
            json_body(json!({ "base64_image": "", "bbox_type": "paragraph" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["message"], "Invalid base64_image or bbox_type.");
    assert!(json.get("result").is_none());
    assert_eq!(factory.calls(), 0);
}

#[tokio::test]
async fn get_bboxes_rejects_unknown_type_before_decoding() {
    let (app, factory) = mock_app().await;

    let response = app
        .oneshot(post_json(
            "/api/get-bboxes",
            json_body(json!({ "base64_image": "not even base64", "bbox_type": "sentence" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid bbox_type.");
    assert_eq!(factory.calls(), 0);
}

#[tokio::test]
async fn get_text_missing_image_is_bad_request() {
    let (app, _) = mock_app().await;

    let response = app
        .oneshot(post_json("/api/get-text", json_body(json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid base64_image.");
}

#[tokio::test]
async fn get_text_rejects_non_image_payload() {
    let (app, factory) = mock_app().await;

    // "hello world" is valid base64 content but not an image
    let response = app
        .oneshot(post_json(
            "/api/get-text",
            json_body(json!({ "base64_image": "data:image/png;base64,aGVsbG8gd29ybGQ=" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["message"], "Invalid base64_image.");
    assert_eq!(factory.calls(), 0);
}

#[tokio::test]
async fn get_text_rejects_payload_without_data_uri_prefix() {
    let (app, _) = mock_app().await;

    let response = app
        .oneshot(post_json(
            "/api/get-text",
            json_body(json!({ "base64_image": "iVBORw0KGgo=" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid base64_image.");
}

#[tokio::test]
async fn malformed_json_gets_error_envelope() {
    let (app, _) = mock_app().await;

    let response = app
        .oneshot(post_json("/api/get-text", "{\"base64_image\":"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]["message"].is_string());
}

#[tokio::test]
async fn wrong_field_type_names_the_field() {
    let (app, _) = mock_app().await;

    let response = app
        .oneshot(post_json(
            "/api/get-bboxes",
            json_body(json!({ "base64_image": blank_png_data_uri(), "bbox_type": 3 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Invalid bbox_type.");
}

#[tokio::test]
async fn health_reports_engine_state() {
    let (app, _) = mock_app().await;

    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["result"]["status"], "ok");
    assert_eq!(json["result"]["engine"]["name"], "mock");
    assert_eq!(json["result"]["engine"]["state"], "ready");
    assert_eq!(json["result"]["engine"]["sessions"], 1);
    assert_eq!(json["result"]["engine"]["capacity"], 5);
    assert_eq!(json["result"]["engine"]["in_flight"], 0);
}

#[tokio::test]
async fn openapi_json_is_valid() {
    let (app, _) = mock_app().await;

    let response = app.oneshot(get("/api/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let version = json["openapi"]
        .as_str()
        .expect("openapi field should be a string");
    assert!(
        version.starts_with('3'),
        "OpenAPI version should start with 3, got: {version}"
    );
    assert!(json["paths"]["/api/get-bboxes"].is_object());
}

async fn assert_too_large_envelope(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "got {content_type}");
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["message"], "Request body too large");
}

fn oversized_body() -> String {
    let oversized = "A".repeat(lector::config::DEFAULT_BODY_LIMIT_BYTES + 1);
    json!({ "base64_image": format!("data:image/png;base64,{oversized}") }).to_string()
}

#[tokio::test]
async fn streamed_body_over_limit_gets_error_envelope() {
    let (app, factory) = mock_app().await;

    let response = app
        .oneshot(post_json("/api/get-text", oversized_body()))
        .await
        .unwrap();

    assert_too_large_envelope(response).await;
    assert_eq!(factory.calls(), 0);
}

#[tokio::test]
async fn declared_length_over_limit_gets_error_envelope() {
    let (app, factory) = mock_app().await;
    let body = oversized_body();

    let request = Request::builder()
        .method("POST")
        .uri("/api/get-bboxes")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_too_large_envelope(response).await;
    assert_eq!(factory.calls(), 0);
}
