//! HttpBackend against a mock HTTP server.

use mockito::{Matcher, Server};
use std::time::Duration;
use tts_console::{BackendConfig, Error, HttpBackend, SpeechBackend};

fn backend_for(url: &str) -> HttpBackend {
    let config = BackendConfig::new(url)
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    HttpBackend::new(config).unwrap()
}

#[tokio::test]
async fn test_status_ok() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/status")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","message":"API connection OK"}"#)
        .create_async()
        .await;

    let report = backend_for(&server.url()).status().await.unwrap();
    assert!(report.is_ok());
    assert_eq!(report.message.as_deref(), Some("API connection OK"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_problem_is_not_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/status")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"error","message":"API key is not configured"}"#)
        .create_async()
        .await;

    let report = backend_for(&server.url()).status().await.unwrap();
    assert!(!report.is_ok());
    assert_eq!(report.message.as_deref(), Some("API key is not configured"));
}

#[tokio::test]
async fn test_status_malformed_body_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/status")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = backend_for(&server.url()).status().await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn test_status_unreachable_is_transport_error() {
    // Nothing listens on port 1.
    let err = backend_for("http://127.0.0.1:1").status().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_synthesize_posts_json_and_returns_audio() {
    let mut server = Server::new_async().await;
    let audio = vec![0x49u8, 0x44, 0x33, 0x04, 0x00];
    let mock = server
        .mock("POST", "/tts")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({ "text": "こんにちは" })))
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(audio.clone())
        .create_async()
        .await;

    let payload = backend_for(&server.url())
        .synthesize("こんにちは")
        .await
        .unwrap();
    assert_eq!(payload.data.as_ref(), audio.as_slice());
    assert_eq!(payload.content_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(payload.extension(), "mp3");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_synthesize_failure_carries_server_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tts")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"boom"}"#)
        .create_async()
        .await;

    let err = backend_for(&server.url()).synthesize("hi").await.unwrap_err();
    match err {
        Error::Synthesis { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_synthesize_failure_without_message_uses_default() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/tts")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let err = backend_for(&server.url()).synthesize("hi").await.unwrap_err();
    match err {
        Error::Synthesis { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Speech generation failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_custom_paths_are_used() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let config = BackendConfig::new(&server.url())
        .unwrap()
        .with_status_path("api/health");
    let backend = HttpBackend::new(config).unwrap();
    assert!(backend.status().await.unwrap().is_ok());
    mock.assert_async().await;
}
