mod common;

use axum::http::StatusCode;
use common::{argocd_body, firing_alert_body, gateway, tags_by_request, MockRelay};
use futures::future::join_all;
use serde_json::json;
use std::future::IntoFuture;

#[tokio::test]
async fn test_concurrent_requests_get_their_own_response() {
    let cases: Vec<(&str, String, StatusCode, &str)> = vec![
        ("/sms", firing_alert_body(), StatusCode::OK, "alert forwarded"),
        ("/sms", json!({"alerts": []}).to_string(), StatusCode::BAD_REQUEST, "invalid alert format"),
        ("/argocd", argocd_body(), StatusCode::OK, "notification forwarded"),
        ("/argocd/webhook", "garbage".to_string(), StatusCode::BAD_REQUEST, "invalid ArgoCD notification format"),
        ("/healthz", String::new(), StatusCode::OK, "OK"),
        ("/readyz", String::new(), StatusCode::OK, "Ready"),
        ("/unknown", firing_alert_body(), StatusCode::NOT_FOUND, "Not Found"),
    ];
    let rounds = 8;

    let mut relay = MockRelay::new();
    relay.expect_kind().return_const("mock");
    relay.expect_send().times(2 * rounds).returning(|_, _| Ok(()));
    let gw = gateway(relay);

    let requests = (0..rounds).flat_map(|_| cases.iter()).map(|(path, body, status, text)| {
        let server = &gw.server;
        async move {
            let response = server.post(path).text(body.clone()).await;
            (*path, response.status_code(), response.text(), *status, *text)
        }
    });

    for (path, got_status, got_text, status, text) in join_all(requests).await {
        assert_eq!(got_status, status, "{}", path);
        assert_eq!(got_text, text, "{}", path);
    }

    assert_eq!(tags_by_request(&gw.audit).len(), cases.len() * rounds);
}

#[tokio::test]
async fn test_repeated_request_yields_independent_audit_sequences() {
    let mut relay = MockRelay::new();
    relay.expect_kind().return_const("mock");
    relay.expect_send().times(2).returning(|_, _| Ok(()));
    let gw = gateway(relay);

    let (first, second) = tokio::join!(
        gw.server.post("/sms").text(firing_alert_body()).into_future(),
        gw.server.post("/sms").text(firing_alert_body()).into_future(),
    );
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);

    let grouped = tags_by_request(&gw.audit);
    assert_eq!(grouped.len(), 2);
    for tags in grouped.values() {
        assert_eq!(
            tags,
            &vec!["request", "route", "received", "parsed", "dispatch", "delivered"]
        );
    }
}
