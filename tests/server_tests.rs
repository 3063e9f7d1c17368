mod common;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use handle_check::core::engine::Engine;
use handle_check::server::{app_router, AppState};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn test_server(mock: &MockServer) -> TestServer {
    let engine = Engine::new(common::mock_config(mock, 2000)).unwrap();
    TestServer::new(app_router(AppState::new(engine))).unwrap()
}

#[tokio::test]
async fn check_returns_records_in_order() {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path("/youtube/codexly");
        then.status(404);
    })
    .await;
    mock.mock_async(|when, then| {
        when.method(GET).path("/youtube/logiqo");
        then.status(200);
    })
    .await;

    let server = test_server(&mock);
    let response = server
        .post("/check")
        .json(&json!({ "names": ["Codexly", " Logiqo "], "platforms": ["youtube"] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(
        body,
        json!({
            "results": [
                { "name": "Codexly", "youtube": true },
                { "name": "Logiqo", "youtube": false }
            ]
        })
    );
}

#[tokio::test]
async fn check_without_platforms_probes_all_four() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);
    let response = server
        .post("/check")
        .json(&json!({ "names": ["codexly"] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    let record = body["results"][0].as_object().unwrap();
    for key in ["name", "instagram", "youtube", "x", "linkedin"] {
        assert!(record.contains_key(key), "missing {key}");
    }
}

#[tokio::test]
async fn invalid_bodies_are_rejected() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);

    for body in [
        json!({}),
        json!({ "names": [] }),
        json!({ "names": "Codexly" }),
        json!({ "names": [1, 2] }),
        json!({ "names": null }),
    ] {
        let response = server.post("/check").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "body {body}");
        let err = response.json::<Value>();
        assert_eq!(err["code"], "validation_error");
        assert!(err["error"].is_string());
    }

    let response = server.post("/check").text("not json").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_platform_is_rejected() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);
    let response = server
        .post("/check")
        .json(&json!({ "names": ["codexly"], "platforms": ["myspace"] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let err = response.json::<Value>();
    assert!(err["error"].as_str().unwrap().contains("myspace"));
}

#[tokio::test]
async fn other_methods_get_405() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);

    let response = server.get("/check").await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    let err = response.json::<Value>();
    assert_eq!(err["error"], "Method not allowed - POST only");

    let response = server.put("/check").await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn preflight_is_answered_with_cors_headers() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);

    let response = server
        .method(Method::OPTIONS, "/check")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://names.example"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
    let allowed = headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_lowercase();
    assert!(allowed.contains("content-type"));
}

#[tokio::test]
async fn bare_options_is_a_no_op() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);
    let response = server.method(Method::OPTIONS, "/check").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn cross_origin_post_carries_allow_origin() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);
    let response = server
        .post("/check")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://names.example"))
        .json(&json!({ "names": ["codexly"], "platforms": ["x"] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn health_reports_ok() {
    let mock = MockServer::start_async().await;
    let server = test_server(&mock);
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "status": "ok" }));
}
