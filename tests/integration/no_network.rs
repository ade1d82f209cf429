//! Integration tests for the no-network mode
//!
//! Requests fail immediately with the same message shape as unmocked
//! requests, and neither the filesystem nor the transport is touched.

use std::sync::Arc;

use super::common::transports::{ForbiddenStore, RecordingTransport};
use mocktree::{
    Dispatcher, InterceptError, Method, Mode, RequestDescriptor, ResponseDescriptor, ScopeOptions,
    SignalKind,
};
use serde_json::json;

fn forbidden_dispatcher() -> (Dispatcher, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new(ResponseDescriptor::new(200));
    let dispatcher = Dispatcher::with_store(transport.clone(), Arc::new(ForbiddenStore));
    (dispatcher, transport)
}

/// A POST with a JSON body reports method, URL and body
#[tokio::test]
async fn test_post_reports_method_url_and_body() {
    let (dispatcher, transport) = forbidden_dispatcher();
    let request = RequestDescriptor::post("https://api.example.com/items/")
        .unwrap()
        .with_json(&json!({"a": 1}));

    let err = dispatcher
        .without_internet(dispatcher.intercept(&request))
        .await
        .unwrap_err();

    assert!(matches!(err, InterceptError::NetworkDisabled(_)));
    let message = err.to_string();
    assert!(message.contains("POST https://api.example.com/items/"), "{message}");
    assert!(message.contains(r#"{"a":1}"#), "{message}");
    assert!(transport.seen().is_empty());
}

/// Both "request not satisfied" errors expose the same fields
#[tokio::test]
async fn test_signal_shape_matches_not_mocked() {
    let (dispatcher, _) = forbidden_dispatcher();
    let request = RequestDescriptor::new(Method::Put, "https://api.example.com/items/3?force=1")
        .unwrap()
        .with_body("payload");

    let err = dispatcher
        .scoped_async(
            Mode::NoNetworkSimulation,
            ScopeOptions::default(),
            dispatcher.intercept(&request),
        )
        .await
        .unwrap_err();

    let signal = err.signal().expect("network-disabled errors carry a signal");
    assert_eq!(signal.kind, SignalKind::NetworkDisabled);
    assert_eq!(signal.method, Method::Put);
    assert_eq!(signal.url, "https://api.example.com/items/3?force=1");
    assert_eq!(signal.body.as_deref(), Some("payload"));
    assert_eq!(
        err.to_string(),
        "network disabled: PUT https://api.example.com/items/3?force=1 payload"
    );
}

/// No-network nested inside capture still blocks and never records
#[tokio::test]
async fn test_no_network_inside_capture() {
    let (dispatcher, transport) = forbidden_dispatcher();
    let request = RequestDescriptor::get("https://api.example.com/ping").unwrap();

    let result = dispatcher
        .capture_requests(
            ScopeOptions::rooted("/nonexistent/should-not-be-created"),
            dispatcher.without_internet(dispatcher.intercept(&request)),
        )
        .await;

    assert!(matches!(result, Err(InterceptError::NetworkDisabled(_))));
    assert!(transport.seen().is_empty());
    assert_eq!(dispatcher.current_mode(), Mode::Inactive);
}
