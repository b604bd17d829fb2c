//! `HttpFetcher` against a local HTTP server

use std::time::Duration;

use kodegen_tools_bookmeta::{
    AbortSignal, CatalogConfig, CatalogSource, FetchError, Fetcher, HttpFetcher, IdentifyOutcome,
    IdentifyRequest,
};
use mockito::Matcher;
use tokio::sync::mpsc;

mod common;
use common::{BookFixture, detail_page, results_page};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn fetch_returns_body_with_user_agent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/dp/B001")
        .match_header("user-agent", "bookmeta-test/1.0")
        .with_status(200)
        .with_body("<html>ok</html>")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new("bookmeta-test/1.0").unwrap();
    let body = fetcher
        .fetch(&format!("{}/dp/B001", server.url()), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(body, b"<html>ok</html>");
    mock.assert_async().await;
}

#[tokio::test]
async fn fetch_classifies_error_statuses() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/missing").with_status(404).create_async().await;
    server.mock("GET", "/broken").with_status(503).create_async().await;
    let fetcher = HttpFetcher::new("bookmeta-test").unwrap();

    let missing = format!("{}/missing", server.url());
    assert_eq!(
        fetcher.fetch(&missing, TIMEOUT).await,
        Err(FetchError::NotFound(missing.clone()))
    );

    let broken = format!("{}/broken", server.url());
    assert_eq!(
        fetcher.fetch(&broken, TIMEOUT).await,
        Err(FetchError::Status {
            url: broken.clone(),
            status: 503
        })
    );
}

#[tokio::test]
async fn probe_reports_status_without_body() {
    let mut server = mockito::Server::new_async().await;
    let head = server
        .mock("HEAD", "/P/B001.01.MAIN._SCRM_.jpg")
        .with_status(200)
        .create_async()
        .await;
    server.mock("HEAD", "/P/B002.01.MAIN._SCRM_.jpg").with_status(404).create_async().await;
    let fetcher = HttpFetcher::new("bookmeta-test").unwrap();

    let found = fetcher
        .probe(&format!("{}/P/B001.01.MAIN._SCRM_.jpg", server.url()), TIMEOUT)
        .await;
    let missing = fetcher
        .probe(&format!("{}/P/B002.01.MAIN._SCRM_.jpg", server.url()), TIMEOUT)
        .await;

    assert_eq!(found, Ok(200));
    assert_eq!(missing, Ok(404));
    head.assert_async().await;
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _hold = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });

    let fetcher = HttpFetcher::new("bookmeta-test").unwrap();
    let result = fetcher
        .fetch(&format!("http://{addr}/slow"), Duration::from_millis(200))
        .await;

    assert!(matches!(result, Err(FetchError::Timeout(_))), "{result:?}");
}

#[tokio::test]
async fn forked_fetcher_still_works() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/page")
        .with_status(200)
        .with_body("x")
        .expect(2)
        .create_async()
        .await;
    let fetcher = HttpFetcher::new("bookmeta-test").unwrap();
    let url = format!("{}/page", server.url());

    assert_eq!(fetcher.fetch(&url, TIMEOUT).await.unwrap(), b"x");
    assert_eq!(fetcher.fork().fetch(&url, TIMEOUT).await.unwrap(), b"x");
}

#[tokio::test]
async fn identify_over_http() {
    let mut server = mockito::Server::new_async().await;
    let book = BookFixture::new("B0HTTP", "三体", &["刘慈欣"]).isbn("9787536692930");
    let search = server
        .mock("GET", "/s/")
        .match_query(Matcher::UrlEncoded("field-isbn".into(), "9787536692930".into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(results_page(&[("/dp/B0HTTP", "三体")]))
        .create_async()
        .await;
    let detail = server
        .mock("GET", "/dp/B0HTTP")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(detail_page(&book))
        .create_async()
        .await;
    server
        .mock("HEAD", "/images/P/B0HTTP.01.MAIN._SCRM_.jpg")
        .with_status(200)
        .create_async()
        .await;

    let config = CatalogConfig::builder()
        .base_url(server.url())
        .image_base_url(format!("{}/images/P/", server.url()))
        .worker_stagger(Duration::from_millis(1))
        .poll_interval(Duration::from_millis(50))
        .build()
        .unwrap();
    let source = CatalogSource::new(config).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let request = IdentifyRequest::new().with_identifier("isbn", "9787536692930");

    let outcome = source
        .identify(&request, &tx, &AbortSignal::new(), TIMEOUT)
        .await;
    drop(tx);

    assert_eq!(outcome, Ok(IdentifyOutcome::Matched { workers: 1 }));
    let record = rx.recv().await.unwrap();
    assert_eq!(record.primary_id, "B0HTTP");
    assert_eq!(record.isbn(), Some("9787536692930"));
    assert_eq!(
        record.cover_url,
        Some(format!("{}/images/P/B0HTTP.01.MAIN._SCRM_.jpg", server.url()))
    );
    search.assert_async().await;
    detail.assert_async().await;
}
