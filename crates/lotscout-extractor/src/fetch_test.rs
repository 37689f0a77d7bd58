use super::*;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_UA: &str = "lotscout-test/1.0";

async fn gateway() -> FetchGateway {
    FetchGateway::new(2, TEST_UA).expect("client builds")
}

#[tokio::test]
async fn classifies_success_with_body_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                "<html><title>2021 Honda Accord</title></html>",
                "text/html; charset=utf-8",
            ),
        )
        .mount(&server)
        .await;

    let outcome = gateway().await.fetch(&format!("{}/listing", server.uri())).await;
    match outcome {
        FetchOutcome::Success {
            body,
            status,
            content_type,
            ..
        } => {
            assert_eq!(status, 200);
            assert!(body.contains("Honda Accord"));
            assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn classifies_403_as_http_error_not_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let outcome = gateway().await.fetch(&server.uri()).await;
    match outcome {
        FetchOutcome::HttpError { status, .. } => assert_eq!(status, 403),
        other => panic!("expected HttpError, got {other:?}"),
    }
}

#[tokio::test]
async fn classifies_challenge_body_as_blocked_with_real_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body>Please verify you are a human to continue.</body></html>",
        ))
        .mount(&server)
        .await;

    let outcome = gateway().await.fetch(&server.uri()).await;
    match outcome {
        FetchOutcome::Blocked { status, reason, .. } => {
            assert_eq!(status, 200, "real status must be preserved");
            assert_eq!(reason, "human verification page");
        }
        other => panic!("expected Blocked, got {other:?}"),
    }
}

#[tokio::test]
async fn classifies_timeout_as_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let outcome = gateway().await.fetch(&server.uri()).await;
    match outcome {
        FetchOutcome::Failed { error_type, .. } => {
            assert_eq!(error_type, lotscout_core::types::ErrorType::Timeout);
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn classifies_connection_refused_as_failed() {
    // Port 1 is closed on any sane test host.
    let outcome = gateway().await.fetch("http://127.0.0.1:1/listing").await;
    assert!(matches!(outcome, FetchOutcome::Failed { .. }));
}

#[test]
fn detects_cloudflare_markers() {
    assert_eq!(
        detect_bot_block("<title>Attention Required! | Cloudflare</title>"),
        Some("cloudflare challenge")
    );
    assert_eq!(
        detect_bot_block(r#"<script src="/cdn-cgi/challenge-platform/h/b"></script>"#),
        Some("cloudflare challenge")
    );
}

#[test]
fn just_a_moment_alone_is_not_a_block() {
    assert_eq!(detect_bot_block("<title>Just a moment...</title>"), None);
    assert_eq!(
        detect_bot_block("<title>Just a moment...</title>Please enable Cookies"),
        Some("cloudflare challenge")
    );
}

#[test]
fn real_listing_content_is_not_a_block() {
    let body = "<html><body><h1>2021 Honda Accord EX-L</h1>Price: $24,500</body></html>";
    assert_eq!(detect_bot_block(body), None);
}
