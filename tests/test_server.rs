//! Integration test: HTTP endpoints

use automl_pipeline::pipeline::Pipeline;
use automl_pipeline::server::{create_router, AppState, ServerConfig};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "automl-test-boundary";

fn test_app() -> (axum::Router, Arc<Pipeline>) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_upload_size: 10 * 1024 * 1024,
    };
    let pipeline = Arc::new(Pipeline::default());
    let state = Arc::new(AppState::new(config, Arc::clone(&pipeline)));
    (create_router(state), pipeline)
}

fn training_csv() -> String {
    let mut csv = String::from("height,weight,animal\n");
    for i in 0..20 {
        if i % 2 == 0 {
            csv.push_str(&format!("{},{},cat\n", 20 + i, 4 + i));
        } else {
            csv.push_str(&format!("{},{},dog\n", 60 + i, 30 + i));
        }
    }
    csv
}

fn multipart_body(field: &str, filename: &str, content: &str) -> String {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        filename = filename,
        content = content,
    )
}

fn train_request(body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/train")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "healthy", "service": "ML Pipeline" }));
}

#[tokio::test]
async fn test_train_then_predict() {
    let (app, pipeline) = test_app();

    let response = app
        .clone()
        .oneshot(train_request(multipart_body("file", "animals.csv", &training_csv())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Model trained successfully");
    assert_eq!(body["metrics"]["model_type"], "classification");
    assert_eq!(body["metrics"]["n_samples"], 20);
    assert_eq!(body["metrics"]["features"], json!(["height", "weight"]));
    assert!(body["metrics"].get("mse").is_none());
    assert!(pipeline.is_trained());

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/predict", json!({ "features": [20, "4"] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["model_type"], "classification");
    let prediction = body["predictions"][0].as_str().unwrap();
    assert!(prediction == "cat" || prediction == "dog");

    let response = app
        .oneshot(Request::builder().uri("/model-info").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "model_type": "classification",
            "features": ["height", "weight"],
            "model_class": "RandomForestClassifier",
        })
    );
}

#[tokio::test]
async fn test_train_without_multipart() {
    let (app, _) = test_app();
    let response = app
        .oneshot(json_request(Method::POST, "/train", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No file provided" }));
}

#[tokio::test]
async fn test_train_without_file_part() {
    let (app, _) = test_app();
    let response = app
        .oneshot(train_request(multipart_body("upload", "data.csv", &training_csv())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file provided");
}

#[tokio::test]
async fn test_train_empty_filename() {
    let (app, _) = test_app();
    let response = app
        .oneshot(train_request(multipart_body("file", "", &training_csv())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No file selected");
}

#[tokio::test]
async fn test_train_too_small_is_server_error() {
    let (app, pipeline) = test_app();
    let response = app
        .oneshot(train_request(multipart_body("file", "tiny.csv", "a,b\n1,2\n3,4\n")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Training failed:"), "{}", error);
    assert!(!pipeline.is_trained());
}

#[tokio::test]
async fn test_predict_without_features() {
    let (app, _) = test_app();
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/predict", json!({ "values": [1, 2] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No features provided" }));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/predict")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_before_training() {
    let (app, _) = test_app();
    let response = app
        .oneshot(json_request(Method::POST, "/predict", json!({ "features": [1, 2] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Model not trained yet");
}

#[tokio::test]
async fn test_model_info_untrained() {
    let (app, _) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/model-info").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "No model trained" }));
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let (app, _) = test_app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Not found");

    let response = app
        .oneshot(Request::builder().uri("/train").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
