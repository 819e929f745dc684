//! End-to-end tests of the HTTP surface through the full router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use gatelog_core::{GatelogConfig, Student};
use gatelog_server::api::create_router;
use gatelog_server::state::AppState;

fn make_state() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let students = vec![Student {
        id: Uuid::new_v4(),
        enrollment_number: "EN2023001".to_string(),
        name: "Priya Sharma".to_string(),
        department: "Computer Science".to_string(),
        semester: 5,
    }];

    let mut config = GatelogConfig::default();
    config.data_dir = dir.path().to_path_buf();
    config.roster_path = dir.path().join("roster.json");
    std::fs::write(
        &config.roster_path,
        serde_json::to_string(&students).unwrap(),
    )
    .unwrap();

    let state = AppState::new(config).unwrap();
    (dir, state)
}

fn scan_request(enrollment: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/scan")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(
            "{{\"enrollment_number\":\"{enrollment}\"}}"
        )))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_responds() {
    let (_dir, state) = make_state();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn scan_then_duplicate_then_listing() {
    let (_dir, state) = make_state();
    let app = create_router(state);

    // First scan: ENTRY
    let response = app.clone().oneshot(scan_request("EN2023001")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ignored"], false);
    assert_eq!(json["message"], "ENTRY Recorded");
    assert_eq!(json["data"]["action"], "ENTRY");

    // Immediate duplicate: soft success, ignored
    let response = app.clone().oneshot(scan_request("EN2023001")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ignored"], true);
    assert_eq!(json["message"], "Ignored (Cooldown)");

    // Listing shows exactly one event
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library/logs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["pagination"]["total_logs"], 1);
    assert_eq!(json["data"]["logs"][0]["action"], "ENTRY");
}

#[tokio::test]
async fn unknown_student_is_not_found() {
    let (_dir, state) = make_state();
    let app = create_router(state);

    let response = app.oneshot(scan_request("ZZZ999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "STUDENT_NOT_FOUND");
}

#[tokio::test]
async fn student_lookup_roundtrip() {
    let (_dir, state) = make_state();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/students/en2023001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Priya Sharma");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/students/ZZZ999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_returns_csv() {
    let (_dir, state) = make_state();
    let app = create_router(state.clone());

    app.clone().oneshot(scan_request("EN2023001")).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/library/logs/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("\"EN2023001\""));
    assert!(text.contains("\"Active\""));
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let (_dir, state) = make_state();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "gatelog API");
}
