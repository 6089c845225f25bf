mod common;

use axum::http::{header, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn each_address_is_limited_separately() {
    let app = TestApp::with_env(&[("RATE_LIMIT_MAX", "3"), ("RATE_LIMIT_WINDOW_SECS", "600")]).await;

    for remaining in ["2", "1", "0"] {
        let reply = app.get_from("10.0.0.1:4000", "/health").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.headers["x-ratelimit-limit"], "3");
        assert_eq!(reply.headers["x-ratelimit-remaining"], remaining);
    }

    let limited = app.get_from("10.0.0.1:4001", "/api/dashboard/public/stats").await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        limited.body,
        json!({
            "success": false,
            "message": "Too many requests from this IP, please try again later.",
        })
    );
    let retry_after: u64 = limited.headers[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=600).contains(&retry_after));
    assert_eq!(limited.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let other = app.get_from("10.0.0.2:4000", "/health").await;
    assert_eq!(other.status, StatusCode::OK);
}

#[tokio::test]
async fn default_budget_is_a_hundred_requests() {
    let app = TestApp::new().await;

    for _ in 0..100 {
        assert_eq!(app.get_from("192.0.2.7:5000", "/health").await.status, StatusCode::OK);
    }
    let reply = app.get_from("192.0.2.7:5000", "/health").await;
    assert_eq!(reply.status, StatusCode::TOO_MANY_REQUESTS);
}
