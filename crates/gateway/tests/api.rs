//! Router-level tests for the gateway against a mock storage node.

use axum::body::Body;
use axum::Router;
use http::header::CONTENT_TYPE;
use http::{Request, StatusCode};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dataset_gateway::{http_server, AppState, Config};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

async fn setup(server: &MockServer) -> (Router, TempDir) {
    let staging = tempfile::tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        storage_url: server.uri(),
        api_key: None,
        bucket: "datasets".to_string(),
        allowed_extensions: vec![
            "txt".to_string(),
            "csv".to_string(),
            "json".to_string(),
            "xml".to_string(),
        ],
        staging_dir: staging.path().to_path_buf(),
        log_level: tracing::Level::INFO,
    };
    let state = AppState::from_config(&config).await.unwrap();
    (http_server::router(state, config.log_level), staging)
}

fn multipart_upload(file_name: &str, content: &[u8], tags: &[(&str, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\ncontent-type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");
    for (name, value) in tags {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v0/datasets")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload_requests_seen(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/buckets/datasets/files")
        .count()
}

fn staging_is_empty(staging: &TempDir) -> bool {
    std::fs::read_dir(staging.path()).unwrap().next().is_none()
}

#[tokio::test]
async fn upload_forwards_and_cleans_staging() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/buckets/datasets/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Name": "data.csv",
            "RootCID": "bafybeiexample",
            "EncodedSize": 262,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (router, staging) = setup(&server).await;
    let content = vec![b'x'; 256];
    let response = router
        .oneshot(multipart_upload(
            "data.csv",
            &content,
            &[("name", "My dataset"), ("domain", "health")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["root_cid"], "bafybeiexample");
    assert_eq!(body["encoded_size"], 262);
    assert_eq!(body["name"], "My dataset");
    assert_eq!(body["mime_type"], "text/csv");

    assert!(staging_is_empty(&staging), "staged file left behind");
}

#[tokio::test]
async fn upload_rejects_disallowed_extension_locally() {
    let server = MockServer::start().await;
    let (router, staging) = setup(&server).await;

    let response = router
        .oneshot(multipart_upload("malware.exe", &vec![b'x'; 256], &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not allowed"));

    assert_eq!(upload_requests_seen(&server).await, 0);
    assert!(staging_is_empty(&staging));
}

#[tokio::test]
async fn upload_rejects_empty_filename() {
    let server = MockServer::start().await;
    let (router, _staging) = setup(&server).await;

    let response = router
        .oneshot(multipart_upload("", &vec![b'x'; 256], &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upload_requests_seen(&server).await, 0);
}

#[tokio::test]
async fn upload_rejects_missing_file_part() {
    let server = MockServer::start().await;
    let (router, _staging) = setup(&server).await;

    let mut body = Vec::new();
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"name\"\r\n\r\ntags only\r\n--{BOUNDARY}--\r\n")
            .as_bytes(),
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v0/datasets")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn undersized_upload_never_reaches_the_node() {
    let server = MockServer::start().await;
    let (router, staging) = setup(&server).await;

    // below the storage node's 127-byte minimum
    let response = router
        .oneshot(multipart_upload("tiny.csv", b"a,b\n", &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("127"));

    assert_eq!(upload_requests_seen(&server).await, 0);
    assert!(staging_is_empty(&staging));
}

#[tokio::test]
async fn failed_forward_still_cleans_staging() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/buckets/datasets/files"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "node offline" })))
        .mount(&server)
        .await;

    let (router, staging) = setup(&server).await;
    let response = router
        .oneshot(multipart_upload("data.csv", &vec![b'x'; 256], &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("node offline"));

    assert!(staging_is_empty(&staging), "staged file left behind");
}

#[tokio::test]
async fn list_proxies_bucket_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/buckets/datasets/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Name": "a.csv", "RootCID": "bafya", "EncodedSize": 200 },
            { "Name": "b.json", "RootCID": "bafyb", "EncodedSize": 300 },
        ])))
        .mount(&server)
        .await;

    let (router, _staging) = setup(&server).await;
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v0/datasets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bucket"], "datasets");
    assert_eq!(body["files"].as_array().unwrap().len(), 2);
    assert_eq!(body["files"][0]["Name"], "a.csv");
}

#[tokio::test]
async fn download_redirects_to_node_url() {
    let server = MockServer::start().await;
    let (router, _staging) = setup(&server).await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v0/datasets/data.csv/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert_eq!(
        location,
        format!("{}/buckets/datasets/files/data.csv/download", server.uri())
    );
}

#[tokio::test]
async fn healthz_and_version_respond() {
    let server = MockServer::start().await;
    let (router, _staging) = setup(&server).await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/_status/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/_status/version")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = MockServer::start().await;
    let (router, _staging) = setup(&server).await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/nope")
                .header("accept", "application/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "not found");
}
