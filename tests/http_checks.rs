//! HttpProber against live mock backends.

mod common;

use prober::checks::http::{HttpProber, MAX_RESPONSE_BYTES};
use prober::Prober;
use reqwest::StatusCode;
use url::Url;

fn url(addr: std::net::SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}/health")).unwrap()
}

#[tokio::test]
async fn test_expected_status_passes() {
    let addr = common::start_mock_backend("all good").await;
    let prober = HttpProber::new(url(addr));
    assert!(prober.probe().await.is_ok());
}

#[tokio::test]
async fn test_body_substring_required() {
    let addr = common::start_mock_backend("<html>Welcome to Example</html>").await;

    assert!(HttpProber::new(url(addr)).expect_body("Example").probe().await.is_ok());

    let err = HttpProber::new(url(addr))
        .expect_body("Goodbye")
        .probe()
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("response doesn't contain \"Goodbye\""));
}

#[tokio::test]
async fn test_unexpected_status_fails() {
    let addr = common::start_programmable_backend(|| async { (503, "down".to_string()) }).await;

    let err = HttpProber::new(url(addr)).probe().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected HTTP response: 503 Service Unavailable (want 200 OK)"
    );
}

#[tokio::test]
async fn test_custom_expected_status() {
    let addr = common::start_programmable_backend(|| async { (404, String::new()) }).await;
    let prober = HttpProber::new(url(addr)).expect_status(StatusCode::NOT_FOUND);
    assert!(prober.probe().await.is_ok());
}

#[tokio::test]
async fn test_body_beyond_limit_is_ignored() {
    let addr = common::start_programmable_backend(|| async {
        let mut body = "x".repeat(MAX_RESPONSE_BYTES);
        body.push_str("NEEDLE");
        (200, body)
    })
    .await;

    let result = HttpProber::new(url(addr)).expect_body("NEEDLE").probe().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unreachable_target_fails() {
    let err = HttpProber::new(url(common::closed_addr()))
        .probe()
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("failed to send HTTP request"));
}
