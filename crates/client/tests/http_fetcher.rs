//! Tests for HttpFetcher against a local mock server.
//!
//! Verifies status mapping, size limits, and naming hints, and that the
//! fetcher plugs into the asset cache end to end.

use blogvault_client::{FetchConfig, HttpFetcher};
use blogvault_core::{AssetCache, Error, FetchError, Fetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(FetchConfig::default()).unwrap()
}

#[tokio::test]
async fn fetch_returns_body_and_hints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/AVvXsEg/s1600"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xFFu8, 0xD8, 0xFF, 0xE0])
                .insert_header("content-type", "image/jpeg")
                .insert_header("content-disposition", "inline; filename=\"IMG_3765.jpg\""),
        )
        .mount(&server)
        .await;

    let fetched = fetcher().fetch(&format!("{}/img/AVvXsEg/s1600", server.uri())).await.unwrap();

    assert_eq!(fetched.bytes.as_ref(), &[0xFFu8, 0xD8, 0xFF, 0xE0]);
    assert_eq!(fetched.name.as_deref(), Some("IMG_3765.jpg"));
    assert_eq!(fetched.extension.as_deref(), Some("jpg"));
}

#[tokio::test]
async fn fetch_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = fetcher().fetch(&format!("{}/gone.jpg", server.uri())).await;
    assert!(matches!(result, Err(FetchError::NotFound { .. })));
}

#[tokio::test]
async fn fetch_maps_server_error_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = fetcher().fetch(&format!("{}/busy.jpg", server.uri())).await;
    assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
}

#[tokio::test]
async fn fetch_rejects_oversized_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .mount(&server)
        .await;

    let small = HttpFetcher::new(FetchConfig { max_bytes: 16, ..Default::default() }).unwrap();
    let result = small.fetch(&format!("{}/huge.png", server.uri())).await;
    assert!(matches!(result, Err(FetchError::TooLarge { size: 64, limit: 16, .. })));
}

#[tokio::test]
async fn fetch_unreachable_is_transport_error() {
    // nothing listens on port 1
    let result = fetcher().fetch("http://127.0.0.1:1/a.jpg").await;
    assert!(matches!(result, Err(FetchError::Transport { .. })));
}

#[tokio::test]
async fn cache_fetches_through_http_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 500]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = AssetCache::open(dir.path()).await.unwrap();
    let http = fetcher();
    let url = format!("{}/img/photo.jpg", server.uri());

    let first = cache.ensure(&url, &http).await.unwrap();
    let second = cache.ensure(&url, &http).await.unwrap();

    assert_eq!(first.local_name, "photo.jpg");
    assert_eq!(first.local_path, second.local_path);
    assert_eq!(std::fs::read(&first.local_path).unwrap().len(), 500);
}

#[tokio::test]
async fn cache_propagates_http_errors_without_recording() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = AssetCache::open(dir.path()).await.unwrap();
    let url = format!("{}/img/missing.jpg", server.uri());

    let result = cache.ensure(&url, &fetcher()).await;

    assert!(matches!(result, Err(Error::Fetch(FetchError::NotFound { .. }))));
    assert!(!cache.is_known(&url).await.unwrap());
    assert!(cache.is_empty().await);
}
