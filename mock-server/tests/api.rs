use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_string(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- ok ---

#[tokio::test]
async fn ok_returns_fixed_json() {
    let resp = app().oneshot(empty_request("GET", "/ok")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_string(resp).await, r#"{"a":1}"#);
}

// --- echo ---

#[tokio::test]
async fn echo_returns_body_and_content_type() {
    let req = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(r#"{"x":1}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_string(resp).await, r#"{"x":1}"#);
}

#[tokio::test]
async fn echo_accepts_delete_with_body() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/echo")
        .header(http::header::CONTENT_TYPE, "text/plain")
        .body("gone".to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_string(resp).await, "gone");
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app()
        .oneshot(empty_request("PATCH", "/status/418"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(resp.headers()["x-mock-status"], "418");
    assert_eq!(body_string(resp).await, "status 418");
}

#[tokio::test]
async fn status_rejects_out_of_range_code() {
    let resp = app()
        .oneshot(empty_request("GET", "/status/42"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_rejects_non_numeric_code() {
    let resp = app()
        .oneshot(empty_request("GET", "/status/teapot"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- headers ---

#[tokio::test]
async fn headers_lists_x_headers_in_order() {
    let req = Request::builder()
        .uri("/headers")
        .header("x-first", "1")
        .header("accept", "*/*")
        .header("x-dup", "a")
        .header("x-dup", "b")
        .header("x-last", "z")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pairs: Vec<(String, String)> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let pairs: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(n, v)| (n.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("x-first", "1"), ("x-dup", "a"), ("x-dup", "b"), ("x-last", "z")]
    );
}

// --- sleep ---

#[tokio::test]
async fn sleep_zero_replies_immediately() {
    let resp = app()
        .oneshot(empty_request("GET", "/sleep/0"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "slept 0");
}

// --- bytes ---

#[tokio::test]
async fn bytes_returns_requested_length() {
    let resp = app()
        .oneshot(empty_request("GET", "/bytes/5"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "aaaaa");
}

// --- method ---

#[tokio::test]
async fn method_reports_request_method() {
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let resp = app()
            .oneshot(empty_request(method, "/method"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, method);
    }
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app()
        .oneshot(empty_request("GET", "/nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
