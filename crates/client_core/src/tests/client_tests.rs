use super::*;
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{extract::State, http::StatusCode as ServerStatus, routing::post, Json, Router};
use tokio::{net::TcpListener, sync::Mutex};

use crate::controller::{run_generation, InteractionController, RequestState};

#[derive(Clone)]
struct FakeServiceState {
    status: ServerStatus,
    body: String,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn handle_generate(
    State(state): State<FakeServiceState>,
    Json(payload): Json<serde_json::Value>,
) -> (ServerStatus, String) {
    state.received.lock().await.push(payload);
    (state.status, state.body.clone())
}

async fn hang_forever(Json(_payload): Json<serde_json::Value>) -> String {
    std::future::pending::<()>().await;
    String::new()
}

async fn spawn_generation_server(
    status: ServerStatus,
    body: &str,
) -> Result<(String, Arc<Mutex<Vec<serde_json::Value>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = FakeServiceState {
        status,
        body: body.to_string(),
        received: received.clone(),
    };
    let app = Router::new()
        .route("/generate-test", post(handle_generate))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), received))
}

#[tokio::test]
async fn posts_code_and_returns_generated_tests() {
    let (server_url, received) =
        spawn_generation_server(ServerStatus::OK, r#"{"test_code":"def test_x(): ..."}"#)
            .await
            .expect("spawn server");
    let client = GenerationClient::new(&format!("{server_url}/"));
    assert_eq!(client.endpoint(), format!("{server_url}/generate-test"));

    let generated = client.generate("def x(): pass").await.expect("generate");

    assert_eq!(generated, "def test_x(): ...");
    let received = received.lock().await;
    assert_eq!(received.as_slice(), &[serde_json::json!({ "code": "def x(): pass" })]);
}

#[tokio::test]
async fn error_field_with_success_status_is_application_failure() {
    let (server_url, _) = spawn_generation_server(ServerStatus::OK, r#"{"error":"invalid syntax"}"#)
        .await
        .expect("spawn server");

    let err = GenerationClient::new(&server_url)
        .generate("def broken(:")
        .await
        .expect_err("should fail");

    assert_eq!(err, GenerationError::Application("invalid syntax".to_string()));
}

#[tokio::test]
async fn failing_status_without_message_reports_status_code() {
    let (server_url, _) = spawn_generation_server(ServerStatus::INTERNAL_SERVER_ERROR, "{}")
        .await
        .expect("spawn server");

    let err = GenerationClient::new(&server_url)
        .generate("x = 1")
        .await
        .expect_err("should fail");

    assert_eq!(err, GenerationError::Application("HTTP 500".to_string()));
}

#[tokio::test]
async fn failing_status_ignores_test_code_in_payload() {
    let (server_url, _) = spawn_generation_server(
        ServerStatus::BAD_GATEWAY,
        r#"{"test_code":"import pytest","error":"API Error: 503"}"#,
    )
    .await
    .expect("spawn server");

    let err = GenerationClient::new(&server_url)
        .generate("x = 1")
        .await
        .expect_err("should fail");

    assert_eq!(err.message(), "API Error: 503");
}

#[tokio::test]
async fn unparsable_body_is_transport_failure() {
    let (server_url, _) = spawn_generation_server(ServerStatus::OK, "<html>oops</html>")
        .await
        .expect("spawn server");

    let err = GenerationClient::new(&server_url)
        .generate("x = 1")
        .await
        .expect_err("should fail");

    assert!(err.is_transport());
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn unreachable_service_is_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = GenerationClient::new(&format!("http://{addr}"))
        .generate("x = 1")
        .await
        .expect_err("should fail");

    assert!(err.is_transport());
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn hung_service_leaves_request_in_flight() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/generate-test", post(hang_forever));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = GenerationClient::new(&format!("http://{addr}"));
    let mut controller = InteractionController::new("def f(): pass");
    let ticket = controller.begin_generation().expect("enabled");

    let pending =
        tokio::time::timeout(Duration::from_millis(300), client.generate(&ticket.source)).await;

    assert!(pending.is_err(), "client must not time out on its own");
    assert_eq!(controller.request_state(), RequestState::InFlight);
    assert!(!controller.can_generate());
}

#[tokio::test]
async fn full_round_trip_through_controller() {
    let (server_url, _) = spawn_generation_server(ServerStatus::OK, r#"{"test_code":"import pytest"}"#)
        .await
        .expect("spawn server");
    let client = GenerationClient::new(&server_url);
    let mut controller = InteractionController::with_sample();

    let state = run_generation(&mut controller, &client).await;

    assert_eq!(state, Some(RequestState::Succeeded));
    assert_eq!(controller.generated(), "import pytest");
    assert_eq!(controller.error(), None);
}

#[test]
fn interprets_empty_object_as_empty_success() {
    assert_eq!(interpret_response(StatusCode::OK, b"{}"), Ok(String::new()));
}

#[test]
fn empty_error_string_counts_as_no_error() {
    assert_eq!(
        interpret_response(StatusCode::OK, br#"{"error":"","test_code":"ok"}"#),
        Ok("ok".to_string())
    );
    assert_eq!(
        interpret_response(StatusCode::NOT_FOUND, br#"{"error":""}"#),
        Err(GenerationError::Application("HTTP 404".to_string()))
    );
}

#[test]
fn raw_payload_does_not_affect_outcome() {
    assert_eq!(
        interpret_response(
            StatusCode::OK,
            br#"{"error":"Unexpected response format","raw":{"choices":[]}}"#
        ),
        Err(GenerationError::Application(
            "Unexpected response format".to_string()
        ))
    );
}
