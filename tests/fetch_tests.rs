//! Image acquisition tests.
//!
//! These tests cover:
//! - Local file reads and the size cap
//! - Request headers sent with remote fetches
//! - Status, size and timeout failures against a mock HTTP server

use std::io::Write;
use std::time::Duration;

use trashgang::source::{
    AcquisitionError, FetchOptions, Fetcher, ACCEPT_IMAGES, DEFAULT_USER_AGENT, MAX_IMAGE_BYTES,
};

fn fetcher_with(max_bytes: u64, timeout: Duration) -> Fetcher {
    Fetcher::with_options(FetchOptions {
        max_bytes,
        timeout,
        ..FetchOptions::default()
    })
    .unwrap()
}

// === Local File Tests ===

#[tokio::test]
async fn test_local_file_over_default_cap_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![0u8; MAX_IMAGE_BYTES as usize + 1]).unwrap();
    file.flush().unwrap();

    let err = Fetcher::new()
        .unwrap()
        .load(file.path().to_str().unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, AcquisitionError::FileTooLarge { limit, .. } if limit == MAX_IMAGE_BYTES));
    assert!(err.is_size_exceeded());
}

#[tokio::test]
async fn test_local_file_exactly_at_cap_is_accepted() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[1u8; 128]).unwrap();
    file.flush().unwrap();

    let fetched = fetcher_with(128, Duration::from_secs(5))
        .load(file.path().to_str().unwrap())
        .await
        .unwrap();
    assert_eq!(fetched.bytes, vec![1u8; 128]);
}

// === Mock HTTP Server Tests ===

mod mock_http_tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn header_is(name: &'static str, expected: &'static str) -> impl Fn(&Request) -> bool {
        move |request: &Request| {
            request
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                == Some(expected)
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_accept() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/cat.png"))
            .and(header_is("user-agent", DEFAULT_USER_AGENT))
            .and(header_is("accept", ACCEPT_IMAGES))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 32]))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/cat.png", mock_server.uri());
        let fetched = Fetcher::new().unwrap().load(&url).await.unwrap();

        assert_eq!(fetched.bytes, vec![9u8; 32]);
        assert_eq!(fetched.label, url);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing.png", mock_server.uri());
        let err = Fetcher::new().unwrap().load(&url).await.unwrap_err();

        match err {
            AcquisitionError::Status { status } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_over_default_cap() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; MAX_IMAGE_BYTES as usize + 1]),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/huge.png", mock_server.uri());
        let err = Fetcher::new().unwrap().load(&url).await.unwrap_err();

        assert!(matches!(err, AcquisitionError::RemoteTooLarge { limit, .. } if limit == MAX_IMAGE_BYTES));
        assert!(err.is_size_exceeded());
        assert_eq!(
            err.to_string(),
            format!("remote image too large (> {} bytes)", MAX_IMAGE_BYTES)
        );
    }

    #[tokio::test]
    async fn test_fetch_over_custom_cap() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1025]))
            .mount(&mock_server)
            .await;

        let url = format!("{}/a.png", mock_server.uri());
        let err = fetcher_with(1024, Duration::from_secs(5))
            .load(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::RemoteTooLarge { limit: 1024, .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; 8])
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/slow.png", mock_server.uri());
        let err = fetcher_with(1024, Duration::from_secs(1))
            .load(&url)
            .await
            .unwrap_err();

        assert!(matches!(err, AcquisitionError::Timeout(d) if d == Duration::from_secs(1)));
        assert_eq!(err.to_string(), "http request timed out after 1s");
    }
}
