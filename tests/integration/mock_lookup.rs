//! Integration tests for mock lookup
//!
//! Fixtures on disk answer requests; misses surface as `RequestNotMocked`
//! with the probed path in the message.

use super::common::fixtures::FixtureTree;
use super::common::logging::init_test_logging;
use super::common::transports::RecordingTransport;
use mocktree::{
    encode, Dispatcher, InterceptError, MediaType, Method, RequestDescriptor, ResponseDescriptor,
    SignalKind,
};
use pretty_assertions::assert_eq;

const SHOW_BOB: &str = "https://api.example.com/users/show.json?screen_name=bob";

fn offline_dispatcher() -> (Dispatcher, std::sync::Arc<RecordingTransport>) {
    init_test_logging();
    let transport = RecordingTransport::new(ResponseDescriptor::new(599));
    (Dispatcher::new(transport.clone()), transport)
}

/// A missing fixture fails with the method, full URL and probed path
#[tokio::test]
async fn test_missing_fixture_reports_probed_path() {
    let (dispatcher, transport) = offline_dispatcher();
    let tree = FixtureTree::new();
    let request = RequestDescriptor::get(SHOW_BOB).unwrap();

    let err = dispatcher
        .with_mock_api(tree.options(), dispatcher.intercept(&request))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(
        message.contains(&format!("GET {SHOW_BOB}")),
        "unexpected message: {message}"
    );
    assert!(
        message.contains("api.example.com/users/show.json-1befe4.json"),
        "unexpected message: {message}"
    );
    let signal = err.signal().expect("not-mocked errors carry a signal");
    assert_eq!(signal.kind, SignalKind::NotMocked);
    assert_eq!(signal.url, SHOW_BOB);
    assert!(transport.seen().is_empty(), "mock lookup must not reach the network");
}

/// A simplified JSON fixture is served as a 200 JSON response
#[tokio::test]
async fn test_simplified_fixture_is_served() {
    let (dispatcher, _) = offline_dispatcher();
    let tree = FixtureTree::new();
    let request = RequestDescriptor::get(SHOW_BOB).unwrap();
    tree.write_for(&request, r#"{"name":"Bob"}"#);

    let response = dispatcher
        .with_mock_api(tree.options(), dispatcher.intercept(&request))
        .await
        .expect("fixture should be found");

    assert_eq!(response.status, 200);
    assert_eq!(response.media_type(), Some(MediaType::Json));
    assert_eq!(response.body, br#"{"name":"Bob"}"#.to_vec());
}

/// Query parameter order does not change which fixture is used
#[tokio::test]
async fn test_query_order_is_irrelevant() {
    let (dispatcher, _) = offline_dispatcher();
    let tree = FixtureTree::new();
    let first = RequestDescriptor::get("https://api.example.com/search?q=rust&page=2").unwrap();
    let second = RequestDescriptor::get("https://api.example.com/search?page=2&q=rust").unwrap();
    assert_eq!(encode(&first), encode(&second));

    tree.write_for(&first, "[]");
    let response = dispatcher
        .with_mock_api(tree.options(), dispatcher.intercept(&second))
        .await
        .unwrap();
    assert_eq!(response.text(), Some("[]"));
}

/// Non-JSON simplified fixtures are found through the candidate list
#[tokio::test]
async fn test_other_media_types_are_probed() {
    let (dispatcher, _) = offline_dispatcher();
    let tree = FixtureTree::new();
    tree.write("docs.example.com/guide/intro.html", "<h1>Intro</h1>");
    tree.write("data.example.com/export.tsv", "a\tb\n1\t2\n");

    let html = RequestDescriptor::get("https://docs.example.com/guide/intro").unwrap();
    let tsv = RequestDescriptor::get("https://data.example.com/export").unwrap();

    let (html, tsv) = dispatcher
        .with_mock_api(tree.options(), async {
            (
                dispatcher.intercept(&html).await,
                dispatcher.intercept(&tsv).await,
            )
        })
        .await;

    assert_eq!(html.unwrap().media_type(), Some(MediaType::Html));
    assert_eq!(tsv.unwrap().media_type(), Some(MediaType::Tsv));
}

/// Full-descriptor fixtures simulate redirects and error statuses
#[tokio::test]
async fn test_full_descriptor_fixture() {
    let (dispatcher, _) = offline_dispatcher();
    let tree = FixtureTree::new();
    tree.write(
        "api.example.com/old-DELETE.response",
        r#"{
  "status": 301,
  "headers": { "Location": "https://api.example.com/new" }
}"#,
    );
    tree.write(
        "api.example.com/broken.response",
        r#"{"status": 503, "headers": {"Retry-After": "30"}, "body": "down"}"#,
    );

    let moved = RequestDescriptor::new(Method::Delete, "https://api.example.com/old").unwrap();
    let broken = RequestDescriptor::get("https://api.example.com/broken").unwrap();

    let (moved, broken) = dispatcher
        .with_mock_api(tree.options(), async {
            (
                dispatcher.intercept(&moved).await.unwrap(),
                dispatcher.intercept(&broken).await.unwrap(),
            )
        })
        .await;

    assert_eq!(moved.status, 301);
    assert_eq!(moved.headers.get("location"), Some("https://api.example.com/new"));
    assert!(moved.body.is_empty());
    assert_eq!(broken.status, 503);
    assert_eq!(broken.headers.get("Retry-After"), Some("30"));
    assert_eq!(broken.text(), Some("down"));
}

/// A fixture that exists but cannot be parsed is a decode error, not a miss
#[tokio::test]
async fn test_corrupt_fixture_is_decode_error() {
    let (dispatcher, _) = offline_dispatcher();
    let tree = FixtureTree::new();
    tree.write("api.example.com/corrupt.response", "status: 200");
    let request = RequestDescriptor::get("https://api.example.com/corrupt").unwrap();

    let err = dispatcher
        .with_mock_api(tree.options(), dispatcher.intercept(&request))
        .await
        .unwrap_err();
    assert!(matches!(err, InterceptError::FixtureDecode { .. }), "{err}");
}

/// Later roots are consulted when earlier ones have no fixture
#[tokio::test]
async fn test_roots_are_searched_in_order() {
    let (dispatcher, _) = offline_dispatcher();
    let primary = FixtureTree::new();
    let shared = FixtureTree::new();
    shared.write("api.example.com/status.json", r#"{"ok":true}"#);
    let request = RequestDescriptor::get("https://api.example.com/status").unwrap();

    let options = shared.options().prepend_root(primary.root());
    let response = dispatcher
        .with_mock_api(options.clone(), dispatcher.intercept(&request))
        .await
        .unwrap();
    assert_eq!(response.json().unwrap()["ok"], true);

    primary.write("api.example.com/status.json", r#"{"ok":false}"#);
    let response = dispatcher
        .with_mock_api(options, dispatcher.intercept(&request))
        .await
        .unwrap();
    assert_eq!(response.json().unwrap()["ok"], false);
}
